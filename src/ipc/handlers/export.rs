use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::views;
use serde_json::json;

/// The client owns the actual file save; this just hands back the payload
/// with its download metadata.
fn handle_export_csv(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.workspace.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    let content = views::export_csv(&state.model);
    let data_rows = content.lines().count().saturating_sub(1);
    ok(
        &req.id,
        json!({
            "filename": views::CSV_FILENAME,
            "mimeType": views::CSV_MIME,
            "content": content,
            "dataRows": data_rows
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "export.csv" => Some(handle_export_csv(state, req)),
        _ => None,
    }
}
