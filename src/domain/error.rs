//! Closed error taxonomy for every part operation.
//!
//! Each variant maps to a stable code so callers never need to match on message text.

use crate::storage::remote::RemoteError;
use thiserror::Error;

/// Message shown when a stock number collides with an existing part.
pub const DUPLICATE_STOCK_MESSAGE: &str =
    "This stock number already exists. Please use a unique stock number.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    Upload,
    Query,
    NotFound,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Upload => "UPLOAD_ERROR",
            ErrorKind::Query => "QUERY_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartError {
    /// Rejected locally, before any remote call.
    #[error("{0}")]
    Validation(String),

    #[error("{}", DUPLICATE_STOCK_MESSAGE)]
    Conflict { stock_number: String },

    #[error("Image upload failed: {0}")]
    Upload(String),

    #[error("Remote query failed: {0}")]
    Query(String),

    #[error("Part not found: {0}")]
    NotFound(String),
}

impl PartError {
    pub fn validation(msg: impl Into<String>) -> Self {
        PartError::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PartError::Validation(_) => ErrorKind::Validation,
            PartError::Conflict { .. } => ErrorKind::Conflict,
            PartError::Upload(_) => ErrorKind::Upload,
            PartError::Query(_) => ErrorKind::Query,
            PartError::NotFound(_) => ErrorKind::NotFound,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Classifies a failed table call. Uniqueness violations become `Conflict`,
    /// everything else is a generic query failure.
    pub fn from_table(err: RemoteError, stock_number: &str) -> Self {
        if err.is_unique_violation() {
            PartError::Conflict {
                stock_number: stock_number.to_string(),
            }
        } else {
            PartError::Query(err.to_string())
        }
    }

    pub fn from_upload(err: RemoteError) -> Self {
        PartError::Upload(err.to_string())
    }
}
