//! Catalog error types
//!
//! Error codes:
//! - QRY_TYPE_NOT_FOUND (REJECT)
//! - QRY_TYPE_ALREADY_REGISTERED (REJECT)

use std::fmt;

/// Severity levels for catalog errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operation is rejected; the catalog is unchanged
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Catalog-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Referenced type has no catalog entry
    QryTypeNotFound,
    /// A type with this name is already registered
    QryTypeAlreadyRegistered,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::QryTypeNotFound => "QRY_TYPE_NOT_FOUND",
            SchemaErrorCode::QryTypeAlreadyRegistered => "QRY_TYPE_ALREADY_REGISTERED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Catalog error with context
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    type_name: String,
}

impl SchemaError {
    /// Create a type-not-found error
    pub fn type_not_found(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            code: SchemaErrorCode::QryTypeNotFound,
            message: format!("Type '{}' is not registered", type_name),
            type_name,
        }
    }

    /// Create an already-registered error
    pub fn already_registered(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            code: SchemaErrorCode::QryTypeAlreadyRegistered,
            message: format!("Type '{}' is already registered", type_name),
            type_name,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the type name involved
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl fmt::Display for SchemaError {
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

impl std::error::Error for SchemaError {}

/// Result type for catalog operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::QryTypeNotFound.code(), "QRY_TYPE_NOT_FOUND");
        assert_eq!(
            SchemaErrorCode::QryTypeAlreadyRegistered.code(),
            "QRY_TYPE_ALREADY_REGISTERED"
        );
    }

    #[test]
    fn test_error_display() {
        let err = SchemaError::type_not_found("Ghost");
        let display = format!("{}", err);
        assert!(display.contains("QRY_TYPE_NOT_FOUND"));
        assert!(display.contains("Ghost"));
    }
}
