//! Typed error contract for shaderkit.
//!
//! Every error carries a stable dotted code (for scripting against the JSON
//! envelope), a human-readable message, and structured details. Hints are
//! optional follow-up suggestions surfaced verbatim to the user.

use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    ValidationMissingArgument,
    ValidationInvalidArgument,
    ValidationPathNotFound,
    GuardMalformedBlock,
    InternalIoError,
    InternalJsonError,
    InternalEncodingError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",
            ErrorCode::ValidationPathNotFound => "validation.path_not_found",
            ErrorCode::GuardMalformedBlock => "guard.malformed_block",
            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalEncodingError => "internal.encoding_error",
        }
    }
}

/// A follow-up suggestion attached to an error.
#[derive(Debug, Clone, Serialize)]
pub struct Hint {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn with_hint(mut self, message: impl Into<String>, command: Option<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
            command,
        });
        self
    }

    pub fn validation_missing_argument(field: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ValidationMissingArgument,
            message,
            json!({ "field": field }),
        )
    }

    pub fn validation_invalid_argument(
        field: &str,
        message: impl Into<String>,
        value: Option<String>,
        hint: Option<String>,
    ) -> Self {
        let err = Self::new(
            ErrorCode::ValidationInvalidArgument,
            message,
            json!({ "field": field, "value": value }),
        );
        match hint {
            Some(h) => err.with_hint(h, None),
            None => err,
        }
    }

    pub fn validation_path_not_found(path: impl Into<String>, operation: &str) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::ValidationPathNotFound,
            format!("Path not found: {}", path),
            json!({ "path": path, "operation": operation }),
        )
    }

    pub fn guard_malformed(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::GuardMalformedBlock,
            message,
            json!({ "file": file.into() }),
        )
    }

    pub fn internal_io(message: impl Into<String>, operation: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalIoError,
            message,
            json!({ "operation": operation }),
        )
    }

    pub fn internal_json(message: impl Into<String>, operation: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalJsonError,
            message,
            json!({ "operation": operation }),
        )
    }

    pub fn internal_encoding(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalEncodingError,
            message,
            json!({ "file": file.into() }),
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for Error {}
