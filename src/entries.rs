use crate::errors::{Field, JournalError};
use crate::models::{Entry, EntryId, JournalData, NewEntry, NumberInput};
use crate::vocabulary::find_in;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

pub const NOTE_MAX_CHARS: usize = 250;
pub const WEIGHT_MIN_KG: f64 = 10.0;
pub const WEIGHT_MAX_KG: f64 = 300.0;

static BLOOD_PRESSURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2,3}/[0-9]{2,3}$").expect("blood pressure pattern"));

/// Validates `input`, appends the new entry and returns it.
///
/// The caller resolves the emotion (explicit field or wheel selection)
/// before calling. `data` is untouched on error.
pub fn create_entry(
    data: &mut JournalData,
    input: NewEntry,
    now: DateTime<Utc>,
) -> Result<Entry, JournalError> {
    let emotion = validate_emotion(data, input.emotion.as_deref())?;
    let blood_pressure = validate_blood_pressure(input.blood_pressure.as_deref())?;
    let weight_kg = validate_weight(input.weight_kg.as_ref())?;
    let tags = validate_tags(data, &input.tags)?;

    data.reconcile_next_id();
    let entry = Entry {
        id: data.next_entry_id,
        timestamp: now,
        emotion,
        intensity: non_blank(input.intensity.as_deref()),
        blood_pressure,
        weight_kg,
        note: truncate_note(input.note.as_deref().unwrap_or_default()),
        tags,
    };
    data.next_entry_id = entry.id.saturating_add(1);
    data.entries.push(entry.clone());
    Ok(entry)
}

pub fn delete_entry(data: &mut JournalData, id: EntryId) -> Result<Entry, JournalError> {
    let index = data
        .entries
        .iter()
        .position(|entry| entry.id == id)
        .ok_or(JournalError::NotFound(id))?;
    Ok(data.entries.remove(index))
}

/// Most recent first, at most `limit` entries.
pub fn list_entries(data: &JournalData, limit: Option<usize>) -> Vec<Entry> {
    let limit = limit.unwrap_or(usize::MAX);
    data.entries.iter().rev().take(limit).cloned().collect()
}

fn validate_emotion(data: &JournalData, emotion: Option<&str>) -> Result<String, JournalError> {
    let Some(emotion) = non_blank(emotion) else {
        return Err(JournalError::validation(Field::Emotion, "an emotion must be selected"));
    };
    find_in(&data.emotions, &emotion)
        .map(|item| item.name.clone())
        .ok_or_else(|| {
            JournalError::validation(Field::Emotion, format!("unknown emotion `{emotion}`"))
        })
}

fn validate_blood_pressure(value: Option<&str>) -> Result<Option<String>, JournalError> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };
    if BLOOD_PRESSURE.is_match(&value) {
        Ok(Some(value))
    } else {
        Err(JournalError::validation(
            Field::BloodPressure,
            "blood pressure must be in format 120/80",
        ))
    }
}

fn validate_weight(value: Option<&NumberInput>) -> Result<Option<f64>, JournalError> {
    let weight = match value {
        None => return Ok(None),
        Some(NumberInput::Number(number)) => *number,
        Some(NumberInput::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<f64>().map_err(|_| {
                JournalError::validation(Field::Weight, format!("`{text}` is not a number"))
            })?
        }
    };
    if (WEIGHT_MIN_KG..=WEIGHT_MAX_KG).contains(&weight) {
        Ok(Some(weight))
    } else {
        Err(JournalError::validation(
            Field::Weight,
            "weight must be between 10 and 300 kg",
        ))
    }
}

fn validate_tags(data: &JournalData, tags: &[String]) -> Result<Vec<String>, JournalError> {
    let mut selected: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let item = find_in(&data.tags, tag).ok_or_else(|| {
            JournalError::validation(Field::Tags, format!("unknown tag `{}`", tag.trim()))
        })?;
        if !selected.contains(&item.name) {
            selected.push(item.name.clone());
        }
    }
    Ok(selected)
}

fn truncate_note(note: &str) -> String {
    note.chars().take(NOTE_MAX_CHARS).collect()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VocabularyItem;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    fn happy() -> NewEntry {
        NewEntry {
            emotion: Some("Happy".to_string()),
            ..NewEntry::default()
        }
    }

    #[test]
    fn create_entry_on_empty_store_keeps_fields() {
        let mut data = JournalData::default();
        let input = NewEntry {
            emotion: Some("Happy".to_string()),
            blood_pressure: Some("120/80".to_string()),
            weight_kg: Some(NumberInput::Number(70.0)),
            note: Some("ok".to_string()),
            ..NewEntry::default()
        };

        let created = create_entry(&mut data, input, at(1, 9)).unwrap();
        let listed = list_entries(&data, None);

        assert_eq!(listed, vec![created.clone()]);
        assert_eq!(created.id, 1);
        assert_eq!(created.timestamp, at(1, 9));
        assert_eq!(created.emotion, "Happy");
        assert_eq!(created.blood_pressure.as_deref(), Some("120/80"));
        assert_eq!(created.weight_kg, Some(70.0));
        assert_eq!(created.note, "ok");
    }

    #[test]
    fn blood_pressure_format_is_enforced() {
        let mut data = JournalData::default();
        for good in ["99/60", "120/80", "180/110"] {
            let input = NewEntry {
                blood_pressure: Some(good.to_string()),
                ..happy()
            };
            assert!(create_entry(&mut data, input, at(1, 9)).is_ok(), "{good}");
        }
        for bad in ["120-80", "1/80", "1200/80", "120/80 mmHg", "١٢٠/٨٠", "１２０/８０"] {
            let input = NewEntry {
                blood_pressure: Some(bad.to_string()),
                ..happy()
            };
            let err = create_entry(&mut data, input, at(1, 9)).unwrap_err();
            assert_eq!(err.field(), Some(Field::BloodPressure), "{bad}");
        }
        assert_eq!(data.entries.len(), 3);
    }

    #[test]
    fn weight_outside_range_is_rejected_without_appending() {
        let mut data = JournalData::default();
        for bad in [
            NumberInput::Number(9.99),
            NumberInput::Number(300.5),
            NumberInput::Text("-4".to_string()),
            NumberInput::Text("heavy".to_string()),
        ] {
            let input = NewEntry {
                weight_kg: Some(bad),
                ..happy()
            };
            let err = create_entry(&mut data, input, at(1, 9)).unwrap_err();
            assert_eq!(err.field(), Some(Field::Weight));
        }
        assert!(data.entries.is_empty());

        for good in [NumberInput::Number(10.0), NumberInput::Text(" 300 ".to_string())] {
            let input = NewEntry {
                weight_kg: Some(good),
                ..happy()
            };
            create_entry(&mut data, input, at(1, 9)).unwrap();
        }
        assert_eq!(data.entries.len(), 2);
    }

    #[test]
    fn blank_optional_fields_are_absent() {
        let mut data = JournalData::default();
        let input = NewEntry {
            blood_pressure: Some("  ".to_string()),
            weight_kg: Some(NumberInput::Text(String::new())),
            intensity: Some(" ".to_string()),
            ..happy()
        };
        let entry = create_entry(&mut data, input, at(1, 9)).unwrap();
        assert_eq!(entry.blood_pressure, None);
        assert_eq!(entry.weight_kg, None);
        assert_eq!(entry.intensity, None);
    }

    #[test]
    fn long_notes_are_truncated() {
        let mut data = JournalData::default();
        let input = NewEntry {
            note: Some("é".repeat(300)),
            ..happy()
        };
        let entry = create_entry(&mut data, input, at(1, 9)).unwrap();
        assert_eq!(entry.note.chars().count(), NOTE_MAX_CHARS);
    }

    #[test]
    fn emotion_is_required_and_must_exist() {
        let mut data = JournalData::default();
        let err = create_entry(&mut data, NewEntry::default(), at(1, 9)).unwrap_err();
        assert_eq!(err.field(), Some(Field::Emotion));

        let input = NewEntry {
            emotion: Some("Ecstatic".to_string()),
            ..NewEntry::default()
        };
        let err = create_entry(&mut data, input, at(1, 9)).unwrap_err();
        assert_eq!(err.field(), Some(Field::Emotion));

        let input = NewEntry {
            emotion: Some("very HAPPY".to_string()),
            ..NewEntry::default()
        };
        let entry = create_entry(&mut data, input, at(1, 9)).unwrap();
        assert_eq!(entry.emotion, "Very happy");
    }

    #[test]
    fn tags_snapshot_vocabulary_spelling_in_input_order() {
        let mut data = JournalData::default();
        data.tags = vec![
            VocabularyItem::new("Work", None),
            VocabularyItem::new("Exercise", None),
        ];
        let input = NewEntry {
            tags: vec!["exercise".to_string(), "WORK".to_string(), "Exercise".to_string()],
            ..happy()
        };
        let entry = create_entry(&mut data, input, at(1, 9)).unwrap();
        assert_eq!(entry.tags, ["Exercise", "Work"]);

        let input = NewEntry {
            tags: vec!["Sleep".to_string()],
            ..happy()
        };
        let err = create_entry(&mut data, input, at(1, 9)).unwrap_err();
        assert_eq!(err.field(), Some(Field::Tags));
    }

    #[test]
    fn delete_preserves_order_and_ids_are_not_reused() {
        let mut data = JournalData::default();
        let first = create_entry(&mut data, happy(), at(1, 9)).unwrap();
        let second = create_entry(&mut data, happy(), at(1, 10)).unwrap();
        let third = create_entry(&mut data, happy(), at(1, 11)).unwrap();

        delete_entry(&mut data, third.id).unwrap();
        let ids: Vec<_> = data.entries.iter().map(|entry| entry.id).collect();
        assert_eq!(ids, [first.id, second.id]);

        let fourth = create_entry(&mut data, happy(), at(1, 12)).unwrap();
        assert!(fourth.id > third.id);
    }

    #[test]
    fn delete_missing_entry_is_not_found() {
        let mut data = JournalData::default();
        create_entry(&mut data, happy(), at(1, 9)).unwrap();

        let err = delete_entry(&mut data, 42).unwrap_err();
        assert_eq!(err, JournalError::NotFound(42));
        assert_eq!(list_entries(&data, None).len(), 1);
    }

    #[test]
    fn list_entries_is_most_recent_first_and_limited() {
        let mut data = JournalData::default();
        for hour in 0..5 {
            create_entry(&mut data, happy(), at(2, hour)).unwrap();
        }
        let listed = list_entries(&data, Some(2));
        let ids: Vec<_> = listed.iter().map(|entry| entry.id).collect();
        assert_eq!(ids, [5, 4]);
        assert_eq!(list_entries(&data, Some(0)).len(), 0);
        assert_eq!(data.entries.len(), 5);
    }
}
