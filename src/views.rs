use crate::model::{AttendanceStatus, RegisterModel};
use serde::Serialize;

pub const RECENT_HISTORY_DAYS: usize = 10;
pub const CSV_FILENAME: &str = "attendance.csv";
pub const CSV_MIME: &str = "text/csv;charset=utf-8;";

const RATE_HIGH_MIN: u32 = 75;
const RATE_MEDIUM_MIN: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingTier {
    High,
    Medium,
    Low,
}

impl RatingTier {
    fn for_rate(rate: u32) -> Self {
        if rate >= RATE_HIGH_MIN {
            Self::High
        } else if rate >= RATE_MEDIUM_MIN {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_students: usize,
    pub present_count: usize,
    /// Ready-to-render label, "0%" when the roster is empty.
    pub attendance_pct: String,
    pub days_tracked: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub student_id: String,
    pub display_id: String,
    pub name: String,
    pub present_count: usize,
    pub absent_count: usize,
    pub rate: u32,
    pub tier: RatingTier,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDay {
    pub date: String,
    pub present_count: usize,
    /// Students with any record that date, not the roster size.
    pub recorded_count: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentHistoryEntry {
    pub date: String,
    pub status: AttendanceStatus,
    pub note: String,
}

fn round_pct(numer: usize, denom: usize) -> u32 {
    if denom == 0 {
        return 0;
    }
    ((numer as f64 / denom as f64) * 100.0).round() as u32
}

/// Single-date overview for the stat strip.
pub fn overview(model: &RegisterModel, date: &str) -> Overview {
    let total = model.students.len();
    let present = model
        .day_records(date)
        .map(|records| {
            records
                .values()
                .filter(|r| r.status == AttendanceStatus::Present)
                .count()
        })
        .unwrap_or(0);
    let pct = if total > 0 {
        format!("{}%", round_pct(present, total))
    } else {
        "0%".to_string()
    };
    Overview {
        total_students: total,
        present_count: present,
        attendance_pct: pct,
        days_tracked: model.attendance.len(),
    }
}

/// Whole-roster compliance summary across all tracked dates. Late records
/// count toward neither present nor absent, so the rate denominator is
/// present + absent only.
pub fn student_summaries(model: &RegisterModel) -> Vec<StudentSummary> {
    model
        .students
        .iter()
        .map(|student| {
            let mut present = 0usize;
            let mut absent = 0usize;
            for records in model.attendance.values() {
                match records.get(&student.id).map(|r| r.status) {
                    Some(AttendanceStatus::Present) => present += 1,
                    Some(AttendanceStatus::Absent) => absent += 1,
                    Some(AttendanceStatus::Late) | None => {}
                }
            }
            let rate = round_pct(present, present + absent);
            StudentSummary {
                student_id: student.id.clone(),
                display_id: student.display_id.clone(),
                name: student.name.clone(),
                present_count: present,
                absent_count: absent,
                rate,
                tier: RatingTier::for_rate(rate),
            }
        })
        .collect()
}

/// The most recent tracked dates, newest first. ISO date strings make
/// lexicographic order chronological.
pub fn recent_history(model: &RegisterModel) -> Vec<HistoryDay> {
    model
        .attendance
        .iter()
        .rev()
        .take(RECENT_HISTORY_DAYS)
        .map(|(date, records)| {
            let recorded = records.len();
            let present = records
                .values()
                .filter(|r| r.status == AttendanceStatus::Present)
                .count();
            HistoryDay {
                date: date.clone(),
                present_count: present,
                recorded_count: recorded,
                percentage: round_pct(present, recorded),
            }
        })
        .collect()
}

/// Every record for one student across all dates, newest first.
pub fn student_history(model: &RegisterModel, student_id: &str) -> Vec<StudentHistoryEntry> {
    model
        .attendance
        .iter()
        .rev()
        .filter_map(|(date, records)| {
            records.get(student_id).map(|r| StudentHistoryEntry {
                date: date.clone(),
                status: r.status,
                note: r.note.clone(),
            })
        })
        .collect()
}

fn csv_field(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full cross-product export: one row per (date, student) over every
/// tracked date and every roster student, `not-recorded` where the day has
/// no record for the student. Every field is quote-wrapped.
pub fn export_csv(model: &RegisterModel) -> String {
    let mut out = String::new();
    out.push_str(&csv_row(&["Date", "Student", "Status", "Note"]));
    for (date, records) in &model.attendance {
        for student in &model.students {
            let (status, note) = match records.get(&student.id) {
                Some(r) => (r.status.as_str(), r.note.as_str()),
                None => ("not-recorded", ""),
            };
            out.push_str(&csv_row(&[date.as_str(), student.name.as_str(), status, note]));
        }
    }
    out
}

fn csv_row(fields: &[&str]) -> String {
    let mut row = fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",");
    row.push('\n');
    row
}
