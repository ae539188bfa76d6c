pub mod app;
pub mod config;
pub mod entries;
pub mod errors;
pub mod handlers;
pub mod migrate;
pub mod models;
pub mod preferences;
pub mod selection;
pub mod snapshot;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod vocabulary;
pub mod wheel;

pub use app::router;
pub use config::Config;
pub use errors::{AppError, Field, JournalError};
pub use state::AppState;
pub use storage::{load_data, persist_data};
