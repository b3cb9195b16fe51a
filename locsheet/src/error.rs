//! All error types for the locsheet crate.
//!
//! These are returned from all fallible operations (parsing, flattening, merging, writing, etc.).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    DataMismatch(String),

    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("invalid key `{0}`: segments must be non-empty")]
    InvalidKey(String),

    #[error("structural conflict at `{key}`: `{path}` is both a value and a group")]
    StructuralConflict { key: String, path: String },

    #[error("unknown locale `{0}`")]
    UnknownLocale(String),

    #[error("validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Creates a new validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Creates a new malformed-row error for a 1-based line number.
    pub fn malformed_row(line: u64, reason: impl Into<String>) -> Self {
        Error::MalformedRow {
            line,
            reason: reason.into(),
        }
    }
}
