use crate::model::{AttendanceRecord, AttendanceStatus, DayRecords, RegisterModel, Student};
use log::warn;
use rusqlite::Connection;

/// Reads the full persisted snapshot: roster in sort order plus every
/// date's record bundle.
pub fn load(conn: &Connection) -> anyhow::Result<RegisterModel> {
    let mut stmt =
        conn.prepare("SELECT id, display_id, name FROM students ORDER BY sort_order")?;
    let students = stmt
        .query_map([], |r| {
            Ok(Student {
                id: r.get(0)?,
                display_id: r.get(1)?,
                name: r.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut model = RegisterModel {
        students,
        attendance: Default::default(),
    };

    let mut stmt = conn.prepare("SELECT date, records FROM attendance_days")?;
    let days = stmt
        .query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    for (date, raw) in days {
        let records: DayRecords = serde_json::from_str(&raw)?;
        model.attendance.insert(date, records);
    }

    Ok(model)
}

/// Full-replace persist: clears both key-spaces and rewrites every student
/// and every date bundle inside one transaction. O(students + dates) per
/// call, which is fine at roster scale.
pub fn persist(conn: &Connection, model: &RegisterModel) -> anyhow::Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM students", [])?;
    tx.execute("DELETE FROM attendance_days", [])?;
    for (i, s) in model.students.iter().enumerate() {
        tx.execute(
            "INSERT INTO students(id, display_id, name, sort_order) VALUES(?, ?, ?, ?)",
            (&s.id, &s.display_id, &s.name, i as i64),
        )?;
    }
    for (date, records) in &model.attendance {
        tx.execute(
            "INSERT INTO attendance_days(date, records) VALUES(?, ?)",
            (date, serde_json::to_string(records)?),
        )?;
    }
    tx.commit()?;
    Ok(())
}

/// Load with the store's swallow-and-log failure policy: any storage
/// failure leaves the caller with the default empty model.
pub fn load_or_default(conn: Option<&Connection>) -> RegisterModel {
    let Some(conn) = conn else {
        return RegisterModel::default();
    };
    match load(conn) {
        Ok(model) => model,
        Err(e) => {
            warn!("failed to load attendance data: {e:#}");
            RegisterModel::default()
        }
    }
}

/// Persist with the store's swallow-and-log failure policy. Writes are
/// idempotent full-snapshot replacements, so a dropped write is repaired by
/// the next successful one; the in-memory model stays authoritative either
/// way.
pub fn persist_snapshot(conn: Option<&Connection>, model: &RegisterModel) {
    let Some(conn) = conn else {
        warn!("store unavailable, keeping attendance data in memory only");
        return;
    };
    if let Err(e) = persist(conn, model) {
        warn!("failed to persist attendance data: {e:#}");
    }
}

/// Inserts or overwrites the record at `(date, studentId)`, creating the
/// day on first write, then persists the snapshot. Returns false when the
/// student is not on the roster (day record keys stay a subset of roster
/// ids).
pub fn set_record(
    model: &mut RegisterModel,
    conn: Option<&Connection>,
    date: &str,
    student_id: &str,
    status: AttendanceStatus,
    note: String,
) -> bool {
    if !model.has_student(student_id) {
        return false;
    }
    model
        .day_records_mut(date)
        .insert(student_id.to_string(), AttendanceRecord { status, note });
    persist_snapshot(conn, model);
    true
}

/// Overwrites `status` at `date` for every roster student, preserving each
/// student's existing note. One persist for the whole batch. Returns the
/// number of records written; an empty roster is a no-op.
pub fn bulk_set_status(
    model: &mut RegisterModel,
    conn: Option<&Connection>,
    date: &str,
    status: AttendanceStatus,
) -> usize {
    if model.students.is_empty() {
        return 0;
    }
    let ids: Vec<String> = model.students.iter().map(|s| s.id.clone()).collect();
    let records = model.day_records_mut(date);
    for id in &ids {
        let note = records.get(id).map(|r| r.note.clone()).unwrap_or_default();
        records.insert(id.clone(), AttendanceRecord { status, note });
    }
    let updated = ids.len();
    persist_snapshot(conn, model);
    updated
}
