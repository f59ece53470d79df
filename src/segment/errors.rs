//! Segment error types
//!
//! Error codes:
//! - QRY_SEGMENT_NOT_FOUND (ERROR)
//! - QRY_MERGE_FAILED (ERROR)
//! - QRY_EMPTY_BATCH (ERROR)
//!
//! Index-operation failures are always propagated to the caller of the
//! failing operation, never swallowed.

use std::fmt;

use super::segment::SegmentId;

/// Severity levels for segment errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operation failed; the segment set is unchanged
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Segment-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentErrorCode {
    /// Referenced segment is not part of the current set
    QrySegmentNotFound,
    /// Merge could not produce a replacement segment
    QryMergeFailed,
    /// A seal was requested for a batch with no mutations
    QryEmptyBatch,
}

impl SegmentErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SegmentErrorCode::QrySegmentNotFound => "QRY_SEGMENT_NOT_FOUND",
            SegmentErrorCode::QryMergeFailed => "QRY_MERGE_FAILED",
            SegmentErrorCode::QryEmptyBatch => "QRY_EMPTY_BATCH",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for SegmentErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Segment error with context
#[derive(Debug, Clone)]
pub struct SegmentError {
    code: SegmentErrorCode,
    message: String,
    segment_id: Option<SegmentId>,
}

impl SegmentError {
    /// Create a segment-not-found error
    pub fn segment_not_found(segment_id: SegmentId) -> Self {
        Self {
            code: SegmentErrorCode::QrySegmentNotFound,
            message: format!("Segment {} is not part of the current set", segment_id),
            segment_id: Some(segment_id),
        }
    }

    /// Create a merge-failed error
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self {
            code: SegmentErrorCode::QryMergeFailed,
            message: reason.into(),
            segment_id: None,
        }
    }

    /// Create an empty-batch error
    pub fn empty_batch() -> Self {
        Self {
            code: SegmentErrorCode::QryEmptyBatch,
            message: "Cannot seal a batch with no mutations".into(),
            segment_id: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SegmentErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the segment id if applicable
    pub fn segment_id(&self) -> Option<SegmentId> {
        self.segment_id
    }
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for SegmentError {}

/// Result type for segment operations
pub type SegmentResult<T> = Result<T, SegmentError>;
