// src/errors.rs

//! Crate-wide error types.
//!
//! Errors are `Clone` so a single reload failure can be handed to several
//! subscribers.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::config::fields::FieldPath;

#[derive(Error, Debug, Clone)]
pub enum ConfwatchError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("could not watch {path:?}: {reason}")]
    WatchSetup { path: PathBuf, reason: String },

    #[error("already watching {path:?}; call stop_watching first")]
    AlreadyWatching { path: PathBuf },
}

impl ConfwatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        ConfwatchError::Io {
            path: path.into(),
            source: Arc::new(err),
        }
    }

    pub(crate) fn watch_setup(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        ConfwatchError::WatchSetup {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Malformed document structure or a value of the wrong type.
///
/// `line` and `column` are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}{}{}", location_prefix(.line, .column), .message, key_suffix(.key))]
pub struct ParseError {
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
    /// Key on the offending line, if one could be recovered.
    pub key: Option<String>,
}

fn location_prefix(line: &Option<usize>, column: &Option<usize>) -> String {
    match (*line, *column) {
        (Some(line), Some(col)) => format!("line {line}, column {col}: "),
        (Some(line), None) => format!("line {line}: "),
        _ => String::new(),
    }
}

fn key_suffix(key: &Option<String>) -> String {
    key.as_ref()
        .map(|k| format!(" (key `{k}`)"))
        .unwrap_or_default()
}

/// A present value outside its field's declared set or range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: {value:?} is not one of {allowed:?}")]
    UnknownToken {
        field: FieldPath,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("{field}: {value} is outside {min}..={max}")]
    OutOfRange {
        field: FieldPath,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl ValidationError {
    pub fn field(&self) -> FieldPath {
        match self {
            ValidationError::UnknownToken { field, .. } => *field,
            ValidationError::OutOfRange { field, .. } => *field,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfwatchError>;
