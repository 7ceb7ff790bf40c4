use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::model::RegisterModel;
use crate::store;
use log::warn;
use serde_json::json;
use std::path::PathBuf;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

/// Opens (or creates) the workspace store and loads the snapshot into the
/// in-memory model. Storage failures are logged and swallowed: an
/// unopenable store leaves the process memory-only, a failed read leaves
/// the model empty. Either way the client gets an ok response; the model in
/// memory is authoritative from here on.
fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    match db::open_db(&path) {
        Ok(conn) => {
            state.model = store::load_or_default(Some(&conn));
            state.db = Some(conn);
        }
        Err(e) => {
            warn!("failed to open workspace store at {:?}: {e:#}", path);
            state.model = RegisterModel::default();
            state.db = None;
        }
    }
    state.workspace = Some(path.clone());

    ok(
        &req.id,
        json!({
            "workspacePath": path.to_string_lossy(),
            "storeAvailable": state.db.is_some(),
            "students": state.model.students.len(),
            "daysTracked": state.model.attendance.len()
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
