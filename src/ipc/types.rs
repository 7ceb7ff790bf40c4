use std::path::PathBuf;

use crate::model::RegisterModel;
use rusqlite::Connection;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Single-threaded application state: the canonical in-memory model plus
/// the storage handle. `db` stays None when the workspace store could not
/// be opened; the model is then memory-only for the process lifetime.
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
    pub model: RegisterModel,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            workspace: None,
            db: None,
            model: RegisterModel::default(),
        }
    }
}
