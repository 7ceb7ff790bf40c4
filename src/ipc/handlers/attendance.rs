use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{get_date, get_optional_str, get_required_str, get_status, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::AttendanceStatus;
use crate::store;
use serde_json::json;

/// Roster rows joined with the selected date's records, optionally
/// narrowed to one status. A non-`all` filter keeps only students whose
/// recorded status matches, so unrecorded students drop out of any
/// narrowed view.
fn attendance_day(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let date = get_date(params, "date")?;
    let filter = get_optional_str(params, "filter").unwrap_or_else(|| "all".to_string());
    let filter_status = match filter.as_str() {
        "all" => None,
        other => Some(AttendanceStatus::parse(other).ok_or_else(|| {
            HandlerErr::new(
                "bad_params",
                "filter must be all, present, absent or late",
            )
        })?),
    };

    let records = state.model.day_records(&date);
    let rows: Vec<serde_json::Value> = state
        .model
        .students
        .iter()
        .filter_map(|student| {
            let record = records.and_then(|r| r.get(&student.id));
            if let Some(want) = filter_status {
                if record.map(|r| r.status) != Some(want) {
                    return None;
                }
            }
            Some(json!({
                "id": student.id,
                "displayId": student.display_id,
                "name": student.name,
                "status": record.map(|r| r.status.as_str()),
                "note": record.map(|r| r.note.as_str()).unwrap_or("")
            }))
        })
        .collect();

    Ok(json!({ "date": date, "rows": rows }))
}

fn attendance_set_record(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let date = get_date(params, "date")?;
    let student_id = get_required_str(params, "studentId")?;
    let status = get_status(params, "status")?;
    let note = get_optional_str(params, "note").unwrap_or_default();

    let written = store::set_record(
        &mut state.model,
        state.db.as_ref(),
        &date,
        &student_id,
        status,
        note,
    );
    if !written {
        return Err(HandlerErr::new("not_found", "student not found"));
    }
    Ok(json!({ "ok": true }))
}

fn attendance_bulk_set_status(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let date = get_date(params, "date")?;
    let status = get_status(params, "status")?;
    let updated = store::bulk_set_status(&mut state.model, state.db.as_ref(), &date, status);
    Ok(json!({ "updated": updated }))
}

fn handle_day(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.workspace.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    match attendance_day(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(e) => e.response(&req.id),
    }
}

fn handle_set_record(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.workspace.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    match attendance_set_record(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(e) => e.response(&req.id),
    }
}

fn handle_bulk_set_status(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.workspace.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    match attendance_bulk_set_status(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(e) => e.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.day" => Some(handle_day(state, req)),
        "attendance.setRecord" => Some(handle_set_record(state, req)),
        "attendance.bulkSetStatus" => Some(handle_bulk_set_status(state, req)),
        _ => None,
    }
}
