//! # Invocation Errors
//!
//! Error types for the command pipeline. Request-level failures are
//! recorded on the request object by the processor; they only propagate
//! out of commit and rollback.

use thiserror::Error;

use crate::segment::SegmentError;

/// Result type for invocation operations
pub type InvocationResult<T> = Result<T, InvocationError>;

/// Command pipeline errors
#[derive(Debug, Clone, Error)]
pub enum InvocationError {
    /// The executor does not handle this command kind
    #[error("Unsupported request kind: {0}")]
    UnsupportedRequest(String),

    /// A fetched content entry does not exist
    #[error("Content entry '{0}' not found")]
    EntryNotFound(String),

    /// An entry in a mutation batch is malformed
    #[error("Invalid content entry '{id}': {reason}")]
    InvalidEntry {
        /// Entry id
        id: String,
        /// What is malformed about it
        reason: String,
    },

    /// The underlying index operation failed
    #[error("Index operation failed: {0}")]
    IndexOperation(String),
}

impl InvocationError {
    /// Create an unsupported-request error from a command name
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedRequest(kind.into())
    }

    /// Create an invalid-entry error
    pub fn invalid_entry(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

impl From<SegmentError> for InvocationError {
    fn from(e: SegmentError) -> Self {
        Self::IndexOperation(e.to_string())
    }
}
