//! Executor error types
//!
//! Error codes:
//! - QRY_QUERY_INVALID (REJECT)
//! - QRY_SOURCE_UNSUPPORTED (REJECT)
//! - QRY_BINDING_MISSING (REJECT)

use std::fmt;

use crate::qom::QomError;

/// Severity levels for executor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The query is rejected; no rows are produced
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Executor-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// The query model failed validation
    QryQueryInvalid,
    /// The query's source kind is not executable by this engine
    QrySourceUnsupported,
    /// A bind variable has no bound value
    QryBindingMissing,
}

impl ExecutorErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::QryQueryInvalid => "QRY_QUERY_INVALID",
            ExecutorErrorCode::QrySourceUnsupported => "QRY_SOURCE_UNSUPPORTED",
            ExecutorErrorCode::QryBindingMissing => "QRY_BINDING_MISSING",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Executor error with context
#[derive(Debug, Clone)]
pub struct ExecutorError {
    code: ExecutorErrorCode,
    message: String,
}

impl ExecutorError {
    /// Create an invalid-query error
    pub fn invalid_query(reason: impl Into<String>) -> Self {
        Self {
            code: ExecutorErrorCode::QryQueryInvalid,
            message: reason.into(),
        }
    }

    /// Create an unsupported-source error
    pub fn unsupported_source(reason: impl Into<String>) -> Self {
        Self {
            code: ExecutorErrorCode::QrySourceUnsupported,
            message: reason.into(),
        }
    }

    /// Create a missing-binding error
    pub fn missing_binding(name: impl Into<String>) -> Self {
        Self {
            code: ExecutorErrorCode::QryBindingMissing,
            message: format!("No value bound for variable '{}'", name.into()),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ExecutorErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ExecutorError {
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

impl std::error::Error for ExecutorError {}

impl From<QomError> for ExecutorError {
    fn from(e: QomError) -> Self {
        Self::invalid_query(e.to_string())
    }
}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
