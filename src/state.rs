use crate::models::JournalData;
use crate::selection::Selection;
use crate::snapshot::Snapshot;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Interaction state that lives only as long as the server process.
#[derive(Debug, Default)]
pub struct Session {
    pub selection: Selection,
    pub pending_import: Option<Snapshot>,
}

/// Lock order: `data` before `session`.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub history_limit: usize,
    pub data: Arc<Mutex<JournalData>>,
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, history_limit: usize, data: JournalData) -> Self {
        Self {
            data_path,
            history_limit,
            data: Arc::new(Mutex::new(data)),
            session: Arc::new(Mutex::new(Session::default())),
        }
    }
}
