use crate::errors::{Field, JournalError};
use crate::models::{Preferences, PreferencesUpdate};
use once_cell::sync::Lazy;
use regex::Regex;

const LANGUAGE_MAX_CHARS: usize = 16;

static THEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^theme-\w+$").expect("theme pattern"));

/// Applies the fields present in `update`; nothing changes if any is invalid.
pub fn update_preferences(
    current: &Preferences,
    update: PreferencesUpdate,
) -> Result<Preferences, JournalError> {
    let mut next = current.clone();

    if let Some(theme) = update.theme {
        let theme = theme.trim();
        if !theme.is_empty() && !THEME.is_match(theme) {
            return Err(JournalError::validation(
                Field::Theme,
                format!("unknown theme `{theme}`"),
            ));
        }
        next.theme = theme.to_string();
    }

    if let Some(language) = update.language {
        let language = language.trim();
        if language.is_empty() || language.chars().count() > LANGUAGE_MAX_CHARS {
            return Err(JournalError::validation(
                Field::Language,
                "language must be a short non-empty code",
            ));
        }
        next.language = language.to_string();
    }

    if let Some(dark_mode) = update.dark_mode {
        next.dark_mode = dark_mode;
    }

    Ok(next)
}
