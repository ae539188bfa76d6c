//! Whole-collection export and import.
//!
//! Import is two-phase: `parse_snapshot` produces a preview without
//! touching the store, `apply_snapshot` overwrites every collection the
//! document carries. Collections the document omits are left alone.

use crate::errors::JournalError;
use crate::migrate::parse_document;
use crate::models::{Entry, ImportPreview, JournalData, VocabularyItem};
use serde::{Deserialize, Serialize};

pub const EXPORT_FILE_NAME: &str = "emotional-wellness-data.json";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<Entry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotions: Option<Vec<VocabularyItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<VocabularyItem>>,
}

impl Snapshot {
    pub fn preview(&self) -> ImportPreview {
        ImportPreview {
            document: self.clone(),
            entries: self.entries.as_ref().map(Vec::len),
            emotions: self.emotions.as_ref().map(Vec::len),
            tags: self.tags.as_ref().map(Vec::len),
        }
    }
}

pub fn export_snapshot(data: &JournalData) -> Snapshot {
    Snapshot {
        entries: Some(data.entries.clone()),
        emotions: Some(data.emotions.clone()),
        tags: Some(data.tags.clone()),
    }
}

pub fn export_json(data: &JournalData) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&export_snapshot(data))
}

/// Parses an uploaded document. Preferences are never part of a snapshot.
pub fn parse_snapshot(text: &str) -> Result<Snapshot, JournalError> {
    let document = parse_document(text)?;
    Ok(Snapshot {
        entries: document.entries,
        emotions: document.emotions,
        tags: document.tags,
    })
}

pub fn apply_snapshot(data: &mut JournalData, snapshot: Snapshot) {
    if let Some(entries) = snapshot.entries {
        data.entries = entries;
        data.reconcile_next_id();
    }
    if let Some(emotions) = snapshot.emotions {
        data.emotions = emotions;
    }
    if let Some(tags) = snapshot.tags {
        data.tags = tags;
    }
}
