use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type EntryId = u64;

/// One journal record. Only `create` and `delete` exist; entries are never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub timestamp: DateTime<Utc>,
    /// Emotion name as spelled in the vocabulary when the entry was created.
    pub emotion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl VocabularyItem {
    pub fn new(name: impl Into<String>, color: Option<&str>) -> Self {
        Self {
            name: name.into(),
            color: color.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VocabularyKind {
    Emotions,
    Tags,
}

impl fmt::Display for VocabularyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Emotions => f.write_str("emotion"),
            Self::Tags => f.write_str("tag"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub theme: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub dark_mode: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: String::new(),
            language: default_language(),
            dark_mode: false,
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

/// The whole persisted document. Every collection is owned here; entries
/// refer to vocabulary items by name only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalData {
    pub entries: Vec<Entry>,
    pub emotions: Vec<VocabularyItem>,
    pub tags: Vec<VocabularyItem>,
    pub preferences: Preferences,
    pub next_entry_id: EntryId,
}

impl Default for JournalData {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            emotions: default_emotions(),
            tags: Vec::new(),
            preferences: Preferences::default(),
            next_entry_id: 1,
        }
    }
}

impl JournalData {
    pub fn vocabulary(&self, kind: VocabularyKind) -> &[VocabularyItem] {
        match kind {
            VocabularyKind::Emotions => &self.emotions,
            VocabularyKind::Tags => &self.tags,
        }
    }

    pub fn vocabulary_mut(&mut self, kind: VocabularyKind) -> &mut Vec<VocabularyItem> {
        match kind {
            VocabularyKind::Emotions => &mut self.emotions,
            VocabularyKind::Tags => &mut self.tags,
        }
    }

    /// Keeps the id counter ahead of every stored entry.
    pub fn reconcile_next_id(&mut self) {
        let floor = self
            .entries
            .iter()
            .map(|entry| entry.id)
            .max()
            .map_or(1, |id| id.saturating_add(1));
        self.next_entry_id = self.next_entry_id.max(floor);
    }
}

pub fn default_emotions() -> Vec<VocabularyItem> {
    [
        ("Very sad", "#8e44ad"),
        ("Sad", "#3498db"),
        ("Neutral", "#f1c40f"),
        ("Happy", "#2ecc71"),
        ("Very happy", "#e67e22"),
    ]
    .into_iter()
    .map(|(name, color)| VocabularyItem::new(name, Some(color)))
    .collect()
}

/// Form value that may arrive either as a JSON number or as raw input text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub intensity: Option<String>,
    #[serde(default)]
    pub blood_pressure: Option<String>,
    #[serde(default)]
    pub weight_kg: Option<NumberInput>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewVocabularyItem {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub dark_mode: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub emotion: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectionResponse {
    pub selected: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EntriesQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// Comma-separated mood names, lowest rank first.
    pub order: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionSeries {
    pub emotion: String,
    pub color: Option<String>,
    pub counts: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionCounts {
    pub dates: Vec<String>,
    pub series: Vec<EmotionSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Number of ranks the trend averages span.
    pub levels: usize,
    pub trend: Vec<TrendPoint>,
    pub counts: EmotionCounts,
}

#[derive(Debug, Serialize)]
pub struct ImportPreview {
    pub document: crate::snapshot::Snapshot,
    pub entries: Option<usize>,
    pub emotions: Option<usize>,
    pub tags: Option<usize>,
}
