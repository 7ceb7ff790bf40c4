use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    /// Human-facing label shown next to the name. May be empty.
    #[serde(default)]
    pub display_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            "late" => Some(Self::Late),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Late => "late",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub status: AttendanceStatus,
    #[serde(default)]
    pub note: String,
}

/// All records for one calendar date, keyed by student id.
pub type DayRecords = BTreeMap<String, AttendanceRecord>;

/// Canonical in-memory model. The roster keeps insertion order and is
/// append-only; attendance is keyed by ISO date string, so the BTreeMap's
/// lexicographic order is also chronological order.
#[derive(Debug, Clone, Default)]
pub struct RegisterModel {
    pub students: Vec<Student>,
    pub attendance: BTreeMap<String, DayRecords>,
}

impl RegisterModel {
    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn has_student(&self, id: &str) -> bool {
        self.student(id).is_some()
    }

    /// Records for `date`, creating the day on first write.
    pub fn day_records_mut(&mut self, date: &str) -> &mut DayRecords {
        self.attendance.entry(date.to_string()).or_default()
    }

    pub fn day_records(&self, date: &str) -> Option<&DayRecords> {
        self.attendance.get(date)
    }
}
