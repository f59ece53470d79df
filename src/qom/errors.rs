//! Query object model error types
//!
//! Error codes:
//! - QRY_QOM_EMPTY_NAME (REJECT)
//! - QRY_QOM_DUPLICATE_SELECTOR (REJECT)
//! - QRY_QOM_UNKNOWN_SELECTOR (REJECT)
//! - QRY_QOM_INVALID_LIMIT (REJECT)

use std::fmt;

/// Severity levels for model errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The query is rejected before execution
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Model-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QomErrorCode {
    /// A required name (selector, type, property) is empty
    QryQomEmptyName,
    /// Two selectors in one source share a name
    QryQomDuplicateSelector,
    /// A column or ordering references a selector the source does not expose
    QryQomUnknownSelector,
    /// Limit row count of zero
    QryQomInvalidLimit,
}

impl QomErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            QomErrorCode::QryQomEmptyName => "QRY_QOM_EMPTY_NAME",
            QomErrorCode::QryQomDuplicateSelector => "QRY_QOM_DUPLICATE_SELECTOR",
            QomErrorCode::QryQomUnknownSelector => "QRY_QOM_UNKNOWN_SELECTOR",
            QomErrorCode::QryQomInvalidLimit => "QRY_QOM_INVALID_LIMIT",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for QomErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Model error with context
#[derive(Debug, Clone)]
pub struct QomError {
    code: QomErrorCode,
    message: String,
    /// Selector name if applicable
    selector: Option<String>,
}

impl QomError {
    /// Create an empty-name error
    pub fn empty_name(what: impl Into<String>) -> Self {
        Self {
            code: QomErrorCode::QryQomEmptyName,
            message: format!("{} must not be empty", what.into()),
            selector: None,
        }
    }

    /// Create a duplicate selector error
    pub fn duplicate_selector(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: QomErrorCode::QryQomDuplicateSelector,
            message: format!("Selector name '{}' is declared twice", name),
            selector: Some(name),
        }
    }

    /// Create an unknown selector error
    pub fn unknown_selector(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: QomErrorCode::QryQomUnknownSelector,
            message: format!("Selector '{}' is not exposed by the query source", name),
            selector: Some(name),
        }
    }

    /// Create an invalid limit error
    pub fn invalid_limit() -> Self {
        Self {
            code: QomErrorCode::QryQomInvalidLimit,
            message: "Limit row count must be positive".into(),
            selector: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> QomErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the selector name if applicable
    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }
}

impl fmt::Display for QomError {
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

impl std::error::Error for QomError {}

/// Result type for model operations
pub type QomResult<T> = Result<T, QomError>;
