//! Unified error type for data layer
//!
//! Every failure surfaced by the data layer maps to one stable kind name
//! (see [`DataError::kind`]) so callers can branch on it without matching
//! backend-specific errors. Invalid filter clauses never fail an operation;
//! they are skipped and reported as `FilterWarning`s.

use thiserror::Error;

/// Unified error type for data layer operations
#[derive(Error, Debug)]
pub enum DataError {
    /// Raw SQL contained a denied keyword and `unsafe` was not set
    #[error("Unsafe SQL rejected: contains '{keyword}'. Set unsafe=true to allow it")]
    UnsafeOperation { keyword: &'static str },

    /// Any failure reported by SQLite, including constraint violations
    #[error("SQLite error: {0}")]
    Database(#[from] sqlx::Error),

    /// Cancelled while waiting for the write gate
    #[error("Operation cancelled")]
    Cancelled,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    pub fn unsafe_operation(keyword: &'static str) -> Self {
        Self::UnsafeOperation { keyword }
    }

    /// Stable error kind name
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsafeOperation { .. } => "UnsafeOperationError",
            Self::Database(_) => "BackendError",
            Self::Cancelled => "CancelledError",
            Self::Io(_) => "IoError",
        }
    }
}

impl From<crate::data::sqlite::SqliteError> for DataError {
    fn from(e: crate::data::sqlite::SqliteError) -> Self {
        match e {
            crate::data::sqlite::SqliteError::Database(e) => Self::Database(e),
            crate::data::sqlite::SqliteError::Io(e) => Self::Io(e),
        }
    }
}
