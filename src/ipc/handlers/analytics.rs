use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{get_date, get_required_str, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::views;
use serde_json::json;

fn overview_get(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let date = get_date(params, "date")?;
    let overview = views::overview(&state.model, &date);
    Ok(serde_json::to_value(&overview).unwrap_or_default())
}

fn summary_rows(state: &AppState) -> serde_json::Value {
    let rows = views::student_summaries(&state.model);
    json!({ "rows": serde_json::to_value(&rows).unwrap_or_default() })
}

fn history_recent(state: &AppState) -> serde_json::Value {
    let days = views::recent_history(&state.model);
    json!({ "days": serde_json::to_value(&days).unwrap_or_default() })
}

fn history_student(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    if !state.model.has_student(&student_id) {
        return Err(HandlerErr::new("not_found", "student not found"));
    }
    let entries = views::student_history(&state.model, &student_id);
    Ok(json!({
        "studentId": student_id,
        "entries": serde_json::to_value(&entries).unwrap_or_default()
    }))
}

fn handle_overview_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.workspace.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    match overview_get(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(e) => e.response(&req.id),
    }
}

fn handle_summary_rows(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.workspace.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    let result = summary_rows(state);
    ok(&req.id, result)
}

fn handle_history_recent(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.workspace.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    let result = history_recent(state);
    ok(&req.id, result)
}

fn handle_history_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.workspace.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    match history_student(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(e) => e.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "overview.get" => Some(handle_overview_get(state, req)),
        "summary.rows" => Some(handle_summary_rows(state, req)),
        "history.recent" => Some(handle_history_recent(state, req)),
        "history.student" => Some(handle_history_student(state, req)),
        _ => None,
    }
}
