use crate::errors::AppError;
use crate::migrate::{parse_document, NormalizedDocument};
use crate::models::JournalData;
use chrono::Utc;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info};

/// Reads the journal document, falling back to the seeded defaults when the
/// file is missing.
///
/// An unparseable file is renamed aside before the defaults are returned,
/// so the first write never replaces the user's bytes. Other read errors
/// are returned.
pub async fn load_data(path: &Path) -> io::Result<JournalData> {
    let text = match fs::read_to_string(path).await {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!("no journal at {}, starting fresh", path.display());
            return Ok(JournalData::default());
        }
        Err(err) if err.kind() == ErrorKind::InvalidData => {
            error!("data file is not valid UTF-8: {err}");
            set_aside(path).await?;
            return Ok(JournalData::default());
        }
        Err(err) => return Err(err),
    };

    match parse_document(&text) {
        Ok(document) => Ok(from_document(document)),
        Err(err) => {
            error!("failed to parse data file: {err}");
            set_aside(path).await?;
            Ok(JournalData::default())
        }
    }
}

fn from_document(document: NormalizedDocument) -> JournalData {
    let mut data = JournalData::default();
    if let Some(entries) = document.entries {
        data.entries = entries;
    }
    if let Some(emotions) = document.emotions {
        data.emotions = emotions;
    }
    if let Some(tags) = document.tags {
        data.tags = tags;
    }
    if let Some(preferences) = document.preferences {
        data.preferences = preferences;
    }
    if let Some(next_entry_id) = document.next_entry_id {
        data.next_entry_id = next_entry_id;
    }
    data.reconcile_next_id();
    data
}

async fn set_aside(path: &Path) -> io::Result<PathBuf> {
    let suffix = format!(".corrupt-{}", Utc::now().format("%Y%m%dT%H%M%S%.3fZ"));
    let target = sibling_path(path, &suffix);
    fs::rename(path, &target).await?;
    error!("unreadable journal kept at {}", target.display());
    Ok(target)
}

/// Rewrites the whole document through a sibling temp file.
pub async fn persist_data(path: &Path, data: &JournalData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data)?;
    let staging = staging_path(path);
    fs::write(&staging, payload).await?;
    fs::rename(&staging, path).await?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    sibling_path(path, ".tmp")
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "journal.json".into());
    name.push(suffix);
    path.with_file_name(name)
}
