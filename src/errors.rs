use crate::models::{EntryId, VocabularyKind};
use axum::{http::StatusCode, Json};
use serde::Serialize;
use std::fmt;
use tracing::{error, warn};

/// Entry or preference field named by a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Emotion,
    BloodPressure,
    Weight,
    Tags,
    Theme,
    Language,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Emotion => "emotion",
            Self::BloodPressure => "bloodPressure",
            Self::Weight => "weight",
            Self::Tags => "tags",
            Self::Theme => "theme",
            Self::Language => "language",
        };
        f.write_str(name)
    }
}

/// Failures raised by the journal core. None of them leave the store
/// partially written.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JournalError {
    #[error("invalid {field}: {message}")]
    Validation { field: Field, message: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{vocabulary} `{name}` already exists")]
    DuplicateName { vocabulary: VocabularyKind, name: String },
    #[error("entry {0} not found")]
    NotFound(EntryId),
    #[error("invalid import document: {0}")]
    Parse(String),
    #[error("no import is waiting for confirmation")]
    NoPendingImport,
}

impl JournalError {
    pub fn validation(field: Field, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::InvalidInput(_) => "invalid_input",
            Self::DuplicateName { .. } => "duplicate_name",
            Self::NotFound(_) => "not_found",
            Self::Parse(_) => "parse",
            Self::NoPendingImport => "no_pending_import",
        }
    }

    pub fn field(&self) -> Option<Field> {
        match self {
            Self::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub field: Option<Field>,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<Field>,
}

impl AppError {
    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            kind: "internal",
            field: None,
            message: err.to_string(),
        }
    }
}

impl From<JournalError> for AppError {
    fn from(err: JournalError) -> Self {
        let status = match &err {
            JournalError::Validation { .. }
            | JournalError::InvalidInput(_)
            | JournalError::Parse(_) => StatusCode::BAD_REQUEST,
            JournalError::NotFound(_) | JournalError::NoPendingImport => StatusCode::NOT_FOUND,
            JournalError::DuplicateName { .. } => StatusCode::CONFLICT,
        };
        Self {
            status,
            kind: err.kind(),
            field: err.field(),
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if self.status.is_server_error() {
            error!("request failed: {}", self.message);
        } else {
            warn!(kind = self.kind, "request rejected: {}", self.message);
        }
        let body = ErrorBody {
            error: &self.message,
            kind: self.kind,
            field: self.field,
        };
        (self.status, Json(body)).into_response()
    }
}
