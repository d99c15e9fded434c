use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while loading a survey table.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("data unavailable at {}: {reason}", path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    #[error("required column '{column}' not found")]
    MissingColumn { column: &'static str },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

impl DataError {
    pub(crate) fn unavailable(path: &std::path::Path, reason: impl ToString) -> Self {
        DataError::DataUnavailable {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// A single row that failed type coercion. Rows like this are skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("'{0}' is not a valid survey year")]
    BadYear(String),

    #[error("'{0}' is not a valid GPA")]
    BadGpa(String),

    #[error("GPA {0} is outside the 0.00-4.00 scale")]
    GpaOutOfRange(f64),

    #[error("column '{0}' is empty")]
    EmptyField(&'static str),
}

pub type Result<T> = std::result::Result<T, DataError>;
