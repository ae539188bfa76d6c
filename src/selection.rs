//! Single-choice emotion selector behind the wheel and the dropdown.

use crate::errors::{Field, JournalError};
use crate::models::VocabularyItem;
use crate::vocabulary::{find_in, same_name};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(String),
}

impl Selection {
    /// Picks `choice`; only emotions that are on the wheel can be picked.
    pub fn pick<'a>(
        &mut self,
        choice: &str,
        emotions: &'a [VocabularyItem],
    ) -> Result<&'a str, JournalError> {
        let item = find_in(emotions, choice).ok_or_else(|| {
            JournalError::validation(Field::Emotion, format!("`{}` is not on the wheel", choice.trim()))
        })?;
        *self = Self::Selected(item.name.clone());
        Ok(item.name.as_str())
    }

    pub fn current(&self) -> Option<&str> {
        match self {
            Self::Unselected => None,
            Self::Selected(choice) => Some(choice),
        }
    }

    /// Hands the choice to a submission and returns to `Unselected`.
    pub fn consume(&mut self) -> Option<String> {
        match std::mem::take(self) {
            Self::Unselected => None,
            Self::Selected(choice) => Some(choice),
        }
    }

    /// Drops a choice whose emotion is no longer in the vocabulary.
    pub fn retain_available(&mut self, emotions: &[VocabularyItem]) {
        if let Self::Selected(choice) = self {
            if !emotions.iter().any(|item| same_name(&item.name, choice)) {
                *self = Self::Unselected;
            }
        }
    }
}
