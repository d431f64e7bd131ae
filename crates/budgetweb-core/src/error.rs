//! Error types for budgetweb-core
//!
//! Cell-level problems never surface here: a malformed cell degrades to a
//! null field during normalization and the row is excluded (and counted)
//! downstream. The variants below are the dataset- and state-level
//! failures that actually stop the pipeline.

use budgetweb_parser::SheetError;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No sheet loaded
    NotLoaded,
    /// Required columns missing from the uploaded sheet
    MissingColumns,
    /// Sheet could not be read
    SheetError,
    /// IO error
    IoError,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NotLoaded => write!(f, "NOT_LOADED"),
            ErrorCode::MissingColumns => write!(f, "MISSING_COLUMNS"),
            ErrorCode::SheetError => write!(f, "SHEET_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - application may be unstable
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for budgetweb-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("No purchase sheet loaded")]
    NotLoaded,

    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error("IO error occurred")]
    IoError,

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotLoaded => ErrorCode::NotLoaded,
            CoreError::Sheet(SheetError::MissingColumns { .. }) => ErrorCode::MissingColumns,
            CoreError::Sheet(_) => ErrorCode::SheetError,
            CoreError::IoError => ErrorCode::IoError,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NotLoaded => ErrorSeverity::Warning,
            CoreError::Sheet(_) => ErrorSeverity::Error,
            CoreError::IoError => ErrorSeverity::Error,
            CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Missing column names, when this error is a structural sheet error
    pub fn missing_columns(&self) -> Option<&[String]> {
        match self {
            CoreError::Sheet(SheetError::MissingColumns { columns }) => Some(columns),
            _ => None,
        }
    }
}

impl From<io::Error> for CoreError {
    fn from(_error: io::Error) -> Self {
        CoreError::IoError
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::NotLoaded.to_string(), "NOT_LOADED");
        assert_eq!(ErrorCode::MissingColumns.to_string(), "MISSING_COLUMNS");
    }

    #[test]
    fn test_missing_columns_code() {
        let error = CoreError::Sheet(SheetError::MissingColumns {
            columns: vec!["Total Value".to_string()],
        });
        assert_eq!(error.code(), ErrorCode::MissingColumns);
        assert_eq!(error.missing_columns(), Some(&["Total Value".to_string()][..]));
    }

    #[test]
    fn test_core_error_severity() {
        assert_eq!(CoreError::NotLoaded.severity(), ErrorSeverity::Warning);
        assert_eq!(CoreError::IoError.severity(), ErrorSeverity::Error);
        let internal = CoreError::InternalError { message: "x".to_string() };
        assert_eq!(internal.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_missing_columns_message_lists_names() {
        let error = CoreError::Sheet(SheetError::MissingColumns {
            columns: vec!["DURATION".to_string(), "Short Text".to_string()],
        });
        let message = error.to_string();
        assert!(message.contains("DURATION"));
        assert!(message.contains("Short Text"));
    }
}
