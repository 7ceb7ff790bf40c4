use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{get_optional_str, get_required_str, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::Student;
use crate::store;
use serde_json::json;
use uuid::Uuid;

fn roster_add(state: &mut AppState, params: &serde_json::Value) -> Result<Student, HandlerErr> {
    let name = get_required_str(params, "name")?;
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(HandlerErr::new("bad_params", "name must not be blank"));
    }

    let supplied = get_optional_str(params, "id")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    // A supplied id doubles as the human-facing label; a generated one
    // stays internal and the label is left empty.
    let (id, display_id) = if supplied.is_empty() {
        (Uuid::new_v4().to_string(), String::new())
    } else {
        (supplied.clone(), supplied)
    };
    let display_id = get_optional_str(params, "displayId")
        .map(|s| s.trim().to_string())
        .unwrap_or(display_id);

    if state.model.has_student(&id) {
        return Err(HandlerErr::new(
            "id_conflict",
            format!("student id already on roster: {}", id),
        ));
    }

    let student = Student {
        id,
        display_id,
        name,
    };
    state.model.students.push(student.clone());
    store::persist_snapshot(state.db.as_ref(), &state.model);
    Ok(student)
}

fn handle_roster_add(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.workspace.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    match roster_add(state, &req.params) {
        Ok(student) => ok(
            &req.id,
            json!({ "student": serde_json::to_value(&student).unwrap_or_default() }),
        ),
        Err(e) => e.response(&req.id),
    }
}

fn handle_roster_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.workspace.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    ok(
        &req.id,
        json!({
            "students": serde_json::to_value(&state.model.students).unwrap_or_default()
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "roster.add" => Some(handle_roster_add(state, req)),
        "roster.list" => Some(handle_roster_list(state, req)),
        _ => None,
    }
}
