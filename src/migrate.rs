//! Normalization of stored and imported documents.
//!
//! Older widget builds wrote `emotionsList`/`activityTags`, kept entries
//! under `emotions`, stored bare-string tags and sometimes exported each
//! collection as a JSON string. Everything is folded into the canonical
//! shape here so no other module branches on document layout.

use crate::errors::JournalError;
use crate::models::{Entry, EntryId, Preferences, VocabularyItem, VocabularyKind};
use crate::vocabulary::dedupe;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Collections found in a document; `None` means the key was absent.
#[derive(Debug, Default)]
pub struct NormalizedDocument {
    pub entries: Option<Vec<Entry>>,
    pub emotions: Option<Vec<VocabularyItem>>,
    pub tags: Option<Vec<VocabularyItem>>,
    pub preferences: Option<Preferences>,
    pub next_entry_id: Option<EntryId>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Current(Entry),
    Legacy(LegacyEntry),
}

#[derive(Deserialize)]
struct LegacyEntry {
    date: String,
    emotion: String,
    #[serde(default)]
    physical: Option<String>,
    #[serde(default)]
    bp: Option<String>,
    #[serde(default)]
    weight: Option<Value>,
    #[serde(default)]
    thoughts: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredVocabularyItem {
    Name(String),
    Item(VocabularyItem),
}

pub fn parse_document(text: &str) -> Result<NormalizedDocument, JournalError> {
    let value: Value =
        serde_json::from_str(text).map_err(|err| JournalError::Parse(err.to_string()))?;
    normalize_document(value)
}

pub fn normalize_document(value: Value) -> Result<NormalizedDocument, JournalError> {
    let Value::Object(mut object) = value else {
        return Err(JournalError::Parse("expected a JSON object".to_string()));
    };

    let legacy = object.contains_key("emotionsList") || object.contains_key("activityTags");
    let (entries_key, emotions_key, tags_key) = if legacy {
        ("emotions", "emotionsList", "activityTags")
    } else {
        ("entries", "emotions", "tags")
    };

    let entries = take_collection::<StoredEntry>(&mut object, entries_key)?
        .map(upgrade_entries)
        .transpose()?;
    let emotions = take_collection::<StoredVocabularyItem>(&mut object, emotions_key)?
        .map(|stored| upgrade_vocabulary(VocabularyKind::Emotions, stored));
    let tags = take_collection::<StoredVocabularyItem>(&mut object, tags_key)?
        .map(|stored| upgrade_vocabulary(VocabularyKind::Tags, stored));
    let preferences = take_field::<Preferences>(&mut object, "preferences")?;
    let next_entry_id = take_field::<EntryId>(&mut object, "nextEntryId")?;

    Ok(NormalizedDocument {
        entries,
        emotions,
        tags,
        preferences,
        next_entry_id,
    })
}

fn take_collection<T: for<'de> Deserialize<'de>>(
    object: &mut Map<String, Value>,
    key: &str,
) -> Result<Option<Vec<T>>, JournalError> {
    take_field(object, key)
}

fn take_field<T: for<'de> Deserialize<'de>>(
    object: &mut Map<String, Value>,
    key: &str,
) -> Result<Option<T>, JournalError> {
    let value = match object.remove(key) {
        None | Some(Value::Null) => return Ok(None),
        // Old exports stored each collection as its localStorage string.
        Some(Value::String(text)) => serde_json::from_str(&text)
            .map_err(|err| JournalError::Parse(format!("`{key}`: {err}")))?,
        Some(value) => value,
    };
    serde_json::from_value(value)
        .map(Some)
        .map_err(|err| JournalError::Parse(format!("`{key}`: {err}")))
}

fn upgrade_entries(stored: Vec<StoredEntry>) -> Result<Vec<Entry>, JournalError> {
    let mut next_id = stored
        .iter()
        .filter_map(|entry| match entry {
            StoredEntry::Current(entry) => Some(entry.id),
            StoredEntry::Legacy(_) => None,
        })
        .max()
        .unwrap_or(0);

    let mut seen = HashSet::with_capacity(stored.len());
    let mut entries = Vec::with_capacity(stored.len());
    for entry in stored {
        let entry = match entry {
            StoredEntry::Current(entry) => entry,
            StoredEntry::Legacy(legacy) => {
                next_id += 1;
                upgrade_legacy_entry(next_id, legacy)?
            }
        };
        if !seen.insert(entry.id) {
            return Err(JournalError::Parse(format!("duplicate entry id {}", entry.id)));
        }
        entries.push(entry);
    }
    Ok(entries)
}

fn upgrade_legacy_entry(id: EntryId, legacy: LegacyEntry) -> Result<Entry, JournalError> {
    let date = NaiveDate::parse_from_str(legacy.date.trim(), "%Y-%m-%d")
        .map_err(|err| JournalError::Parse(format!("entry date `{}`: {err}", legacy.date)))?;

    let weight_kg = match legacy.weight {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    Ok(Entry {
        id,
        timestamp: date.and_time(NaiveTime::MIN).and_utc(),
        emotion: legacy.emotion,
        intensity: legacy.physical.filter(|value| !value.trim().is_empty()),
        blood_pressure: legacy.bp.filter(|value| !value.trim().is_empty()),
        weight_kg,
        note: legacy.thoughts.unwrap_or_default(),
        tags: Vec::new(),
    })
}

fn upgrade_vocabulary(
    kind: VocabularyKind,
    stored: Vec<StoredVocabularyItem>,
) -> Vec<VocabularyItem> {
    let items = stored
        .into_iter()
        .map(|item| match item {
            StoredVocabularyItem::Name(name) => VocabularyItem::new(name, None),
            StoredVocabularyItem::Item(item) => item,
        })
        .collect();
    dedupe(kind, items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_document_passes_through() {
        let text = r##"{
            "entries": [{"id": 3, "timestamp": "2024-01-01T08:00:00Z", "emotion": "Sad",
                         "bloodPressure": "120/80", "weightKg": 70.5, "note": "ok", "tags": ["Work"]}],
            "emotions": [{"name": "Sad", "color": "#3498db"}],
            "tags": [{"name": "Work"}],
            "preferences": {"theme": "theme-ocean", "language": "de", "darkMode": true},
            "nextEntryId": 9
        }"##;
        let doc = parse_document(text).unwrap();

        let entries = doc.entries.unwrap();
        assert_eq!(entries[0].id, 3);
        assert_eq!(entries[0].weight_kg, Some(70.5));
        assert_eq!(entries[0].tags, ["Work"]);
        assert_eq!(doc.emotions.unwrap()[0].color.as_deref(), Some("#3498db"));
        assert_eq!(doc.tags.unwrap(), vec![VocabularyItem::new("Work", None)]);
        assert!(doc.preferences.unwrap().dark_mode);
        assert_eq!(doc.next_entry_id, Some(9));
    }

    #[test]
    fn absent_keys_stay_absent() {
        let doc = parse_document(r#"{"tags": ["Run"], "unknown": 1}"#).unwrap();
        assert!(doc.entries.is_none());
        assert!(doc.emotions.is_none());
        assert_eq!(doc.tags.unwrap().len(), 1);
    }

    #[test]
    fn legacy_export_with_string_collections_is_upgraded() {
        let text = r##"{
            "emotions": "[{\"date\":\"2024-02-03\",\"emotion\":\"Happy\",\"physical\":\"Average\",\"bp\":\"\",\"weight\":\"72\",\"thoughts\":\"fine\"}]",
            "emotionsList": "[{\"name\":\"Calm\",\"color\":\"#888888\"}]",
            "activityTags": "[\"Work\",\"work\",\"Gym\"]"
        }"##;
        let doc = parse_document(text).unwrap();

        let entries = doc.entries.unwrap();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.id, 1);
        assert_eq!(entry.timestamp.to_rfc3339(), "2024-02-03T00:00:00+00:00");
        assert_eq!(entry.intensity.as_deref(), Some("Average"));
        assert_eq!(entry.blood_pressure, None);
        assert_eq!(entry.weight_kg, Some(72.0));
        assert_eq!(entry.note, "fine");

        assert_eq!(doc.emotions.unwrap()[0].name, "Calm");
        let tags: Vec<_> = doc.tags.unwrap().into_iter().map(|tag| tag.name).collect();
        assert_eq!(tags, ["Work", "Gym"]);
    }

    #[test]
    fn tag_colors_and_bad_emotion_colors_are_dropped() {
        let text = r##"{
            "emotions": [{"name": "Calm", "color": "#336699"}, {"name": "Odd", "color": "red\" onmouseover=\"x"}],
            "tags": [{"name": "Work", "color": "#f00"}]
        }"##;
        let doc = parse_document(text).unwrap();

        assert_eq!(
            doc.emotions.unwrap(),
            vec![
                VocabularyItem::new("Calm", Some("#336699")),
                VocabularyItem::new("Odd", None),
            ]
        );
        assert_eq!(doc.tags.unwrap(), vec![VocabularyItem::new("Work", None)]);
    }

    #[test]
    fn legacy_entries_get_ids_after_existing_ones() {
        let text = r#"{"entries": [
            {"id": 7, "timestamp": "2024-01-01T08:00:00Z", "emotion": "Sad"},
            {"date": "2024-01-02", "emotion": "Happy"}
        ]}"#;
        let entries = parse_document(text).unwrap().entries.unwrap();
        assert_eq!(entries[1].id, 8);
    }

    #[test]
    fn malformed_documents_are_parse_errors() {
        for text in [
            "{not json",
            "[1, 2]",
            r#"{"entries": 5}"#,
            r#"{"emotions": "[oops"}"#,
            r#"{"entries": [{"date": "yesterday", "emotion": "Sad"}]}"#,
        ] {
            let err = parse_document(text).unwrap_err();
            assert!(matches!(err, JournalError::Parse(_)), "{text}");
        }
    }

    #[test]
    fn duplicate_entry_ids_are_rejected() {
        let text = r#"{"entries": [
            {"id": 1, "timestamp": "2024-01-01T08:00:00Z", "emotion": "Sad"},
            {"id": 1, "timestamp": "2024-01-02T08:00:00Z", "emotion": "Happy"}
        ]}"#;
        assert!(matches!(parse_document(text), Err(JournalError::Parse(_))));
    }
}
