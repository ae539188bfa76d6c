//! Emotion and activity-tag vocabularies.
//!
//! Names are unique case-insensitively after trimming. Insertion order is
//! kept for display only. Renaming is remove + add.

use crate::errors::JournalError;
use crate::models::{JournalData, VocabularyItem, VocabularyKind};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("hex color pattern"));

pub fn add_item(
    data: &mut JournalData,
    kind: VocabularyKind,
    name: &str,
    color: Option<&str>,
) -> Result<VocabularyItem, JournalError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(JournalError::InvalidInput(format!("{kind} name must not be empty")));
    }

    let items = data.vocabulary_mut(kind);
    if find_in(items, name).is_some() {
        return Err(JournalError::DuplicateName {
            vocabulary: kind,
            name: name.to_string(),
        });
    }

    // Tags carry no display color.
    let color = match kind {
        VocabularyKind::Emotions => color.map(str::trim).filter(|value| !value.is_empty()),
        VocabularyKind::Tags => None,
    };
    if let Some(color) = color {
        if !is_hex_color(color) {
            return Err(JournalError::InvalidInput(format!(
                "color `{color}` must look like #rrggbb"
            )));
        }
    }

    let item = VocabularyItem::new(name, color);
    items.push(item.clone());
    Ok(item)
}

/// Removes the item matching `name`; absent names are not an error.
pub fn remove_item(
    data: &mut JournalData,
    kind: VocabularyKind,
    name: &str,
) -> Option<VocabularyItem> {
    let items = data.vocabulary_mut(kind);
    let index = items
        .iter()
        .position(|item| same_name(&item.name, name.trim()))?;
    Some(items.remove(index))
}

pub fn list_items(data: &JournalData, kind: VocabularyKind) -> &[VocabularyItem] {
    data.vocabulary(kind)
}

pub fn find_in<'a>(items: &'a [VocabularyItem], name: &str) -> Option<&'a VocabularyItem> {
    let name = name.trim();
    items.iter().find(|item| same_name(&item.name, name))
}

pub fn same_name(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

/// Drops blank names and later case-insensitive duplicates, strips tag
/// colors and discards emotion colors that are not `#rrggbb`.
pub fn dedupe(kind: VocabularyKind, items: Vec<VocabularyItem>) -> Vec<VocabularyItem> {
    let mut kept: Vec<VocabularyItem> = Vec::with_capacity(items.len());
    for mut item in items {
        item.name = item.name.trim().to_string();
        if item.name.is_empty() || find_in(&kept, &item.name).is_some() {
            continue;
        }
        item.color = match kind {
            VocabularyKind::Tags => None,
            VocabularyKind::Emotions => item.color.and_then(|color| {
                let color = color.trim();
                if is_hex_color(color) {
                    Some(color.to_string())
                } else {
                    warn!(name = %item.name, "dropping invalid emotion color `{color}`");
                    None
                }
            }),
        };
        kept.push(item);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_are_rejected_case_insensitively() {
        let mut data = JournalData::default();
        data.tags.clear();
        add_item(&mut data, VocabularyKind::Tags, "Happy", None).unwrap();

        let err = add_item(&mut data, VocabularyKind::Tags, "  happy ", None).unwrap_err();
        assert!(matches!(err, JournalError::DuplicateName { vocabulary: VocabularyKind::Tags, .. }));
        assert_eq!(list_items(&data, VocabularyKind::Tags).len(), 1);
    }

    #[test]
    fn blank_names_are_invalid_input() {
        let mut data = JournalData::default();
        let err = add_item(&mut data, VocabularyKind::Emotions, "   ", Some("#000000")).unwrap_err();
        assert!(matches!(err, JournalError::InvalidInput(_)));
        assert_eq!(data.emotions.len(), 5);
    }

    #[test]
    fn emotions_keep_color_and_tags_drop_it() {
        let mut data = JournalData::default();
        let emotion = add_item(&mut data, VocabularyKind::Emotions, "Calm", Some("#123456")).unwrap();
        let tag = add_item(&mut data, VocabularyKind::Tags, " Work ", Some("#123456")).unwrap();

        assert_eq!(emotion.color.as_deref(), Some("#123456"));
        assert_eq!(tag, VocabularyItem::new("Work", None));
        assert_eq!(data.emotions.last(), Some(&emotion));
    }

    #[test]
    fn remove_matches_case_insensitively_and_ignores_missing() {
        let mut data = JournalData::default();
        let removed = remove_item(&mut data, VocabularyKind::Emotions, "NEUTRAL").unwrap();
        assert_eq!(removed.name, "Neutral");
        assert_eq!(data.emotions.len(), 4);

        assert!(remove_item(&mut data, VocabularyKind::Emotions, "Neutral").is_none());
        assert_eq!(data.emotions.len(), 4);
    }

    #[test]
    fn dedupe_keeps_first_spelling() {
        let items = vec![
            VocabularyItem::new("Run", None),
            VocabularyItem::new(" ", None),
            VocabularyItem::new("run", None),
            VocabularyItem::new("Read", None),
        ];
        let names: Vec<_> = dedupe(VocabularyKind::Tags, items)
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(names, ["Run", "Read"]);
    }

    #[test]
    fn emotion_colors_must_be_hex() {
        let mut data = JournalData::default();
        for bad in ["red", "#fff", "red\" onmouseover=\"x", "#12345g"] {
            let err = add_item(&mut data, VocabularyKind::Emotions, "Calm", Some(bad)).unwrap_err();
            assert!(matches!(err, JournalError::InvalidInput(_)), "{bad}");
        }
        assert_eq!(data.emotions.len(), 5);

        let item = add_item(&mut data, VocabularyKind::Emotions, "Calm", Some(" #A1b2C3 ")).unwrap();
        assert_eq!(item.color.as_deref(), Some("#A1b2C3"));
    }

    #[test]
    fn dedupe_cleans_colors_per_vocabulary() {
        let items = || {
            vec![
                VocabularyItem::new("Work", Some("#ff0000")),
                VocabularyItem::new("Odd", Some("red\" onmouseover=\"x")),
            ]
        };

        let tags = dedupe(VocabularyKind::Tags, items());
        assert!(tags.iter().all(|item| item.color.is_none()));

        let emotions = dedupe(VocabularyKind::Emotions, items());
        assert_eq!(emotions[0].color.as_deref(), Some("#ff0000"));
        assert_eq!(emotions[1].color, None);
    }
}
