//! Data type error types

use crate::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The category of a data type failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Input could not be normalized into any meaningful value of the type
    Casting,
    /// Input was normalized but violates a constraint (length, range, pattern, size)
    Validation,
    /// Encrypting or decrypting a value failed
    Encryption,
    /// The type itself is configured incorrectly
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Casting => write!(f, "casting"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Encryption => write!(f, "encryption"),
            ErrorKind::Configuration => write!(f, "configuration"),
        }
    }
}

/// Main data type error
#[derive(Debug, Clone, Error)]
pub enum DataTypeError {
    /// The input is not interpretable as the data type at all
    #[error("{code}: {message}")]
    Casting {
        code: ErrorCode,
        message: String,
        type_name: Option<String>,
        #[source]
        cause: Option<Box<DataTypeError>>,
    },

    /// The input is interpretable but violates a declared constraint
    #[error("{code}: {message}")]
    Validation {
        code: ErrorCode,
        message: String,
        type_name: Option<String>,
        sensitive: bool,
        #[source]
        cause: Option<Box<DataTypeError>>,
    },

    /// Encryption or decryption failed (including tampered ciphertext)
    #[error("{code}: {message}")]
    Encryption { code: ErrorCode, message: String },

    /// The data type is configured incorrectly
    #[error("{code}: {message}")]
    Configuration {
        code: ErrorCode,
        message: String,
        type_name: Option<String>,
    },
}

impl DataTypeError {
    /// Create a casting error
    pub fn casting(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Casting {
            code,
            message: message.into(),
            type_name: None,
            cause: None,
        }
    }

    /// Create a validation error
    pub fn validation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            type_name: None,
            sensitive: false,
            cause: None,
        }
    }

    /// Create an encryption error
    pub fn encryption(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Encryption {
            code,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Configuration {
            code,
            message: message.into(),
            type_name: None,
        }
    }

    /// Attach the name of the data type that raised the error
    pub fn with_type(mut self, name: impl Into<String>) -> Self {
        match &mut self {
            Self::Casting { type_name, .. }
            | Self::Validation { type_name, .. }
            | Self::Configuration { type_name, .. } => *type_name = Some(name.into()),
            Self::Encryption { .. } => {}
        }
        self
    }

    /// Attach a lower-level cause
    pub fn with_cause(mut self, err: DataTypeError) -> Self {
        match &mut self {
            Self::Casting { cause, .. } | Self::Validation { cause, .. } => {
                *cause = Some(Box::new(err))
            }
            Self::Encryption { .. } | Self::Configuration { .. } => {}
        }
        self
    }

    /// Mark a validation error as raised by a sensitive type
    pub fn with_sensitive(mut self, flag: bool) -> Self {
        if let Self::Validation { sensitive, .. } = &mut self {
            *sensitive = flag;
        }
        self
    }

    /// Translate this error into a validation error owned by a data type.
    ///
    /// Casting errors keep their code unless `code_override` is given; the
    /// original error becomes the cause. Validation, encryption and
    /// configuration errors are returned unchanged apart from the type name.
    pub fn into_validation(
        self,
        type_name: &str,
        sensitive: bool,
        code_override: Option<ErrorCode>,
    ) -> Self {
        if let Self::Casting { code, message, .. } = &self {
            let (code, message) = (*code, message.clone());
            return Self::Validation {
                code: code_override.unwrap_or(code),
                message,
                type_name: Some(type_name.to_string()),
                sensitive,
                cause: Some(Box::new(self)),
            };
        }

        match self {
            Self::Validation {
                code,
                message,
                type_name: None,
                sensitive: was_sensitive,
                cause,
            } => Self::Validation {
                code: code_override.unwrap_or(code),
                message,
                type_name: Some(type_name.to_string()),
                sensitive: sensitive || was_sensitive,
                cause,
            },
            other => other,
        }
    }

    /// Get the failure kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Casting { .. } => ErrorKind::Casting,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Encryption { .. } => ErrorKind::Encryption,
            Self::Configuration { .. } => ErrorKind::Configuration,
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Casting { code, .. }
            | Self::Validation { code, .. }
            | Self::Encryption { code, .. }
            | Self::Configuration { code, .. } => *code,
        }
    }

    /// Get the human-readable message (without the code prefix)
    pub fn message(&self) -> &str {
        match self {
            Self::Casting { message, .. }
            | Self::Validation { message, .. }
            | Self::Encryption { message, .. }
            | Self::Configuration { message, .. } => message,
        }
    }

    /// Get the name of the data type that raised the error, if known
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Casting { type_name, .. }
            | Self::Validation { type_name, .. }
            | Self::Configuration { type_name, .. } => type_name.as_deref(),
            Self::Encryption { .. } => None,
        }
    }

    /// Get the wrapped lower-level error, if any
    pub fn cause(&self) -> Option<&DataTypeError> {
        match self {
            Self::Casting { cause, .. } | Self::Validation { cause, .. } => cause.as_deref(),
            _ => None,
        }
    }

    /// Whether the error was raised by a type holding sensitive data
    pub fn is_sensitive(&self) -> bool {
        matches!(self, Self::Validation { sensitive: true, .. })
    }

    pub fn is_casting(&self) -> bool {
        self.kind() == ErrorKind::Casting
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn is_encryption(&self) -> bool {
        self.kind() == ErrorKind::Encryption
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DT0003, DT0105, DT0111, DT0201};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_casting_error() {
        let err = DataTypeError::casting(DT0003, "Cannot convert \"abc\" to a number")
            .with_type("Number");

        assert_eq!(err.kind(), ErrorKind::Casting);
        assert_eq!(err.code(), DT0003);
        assert_eq!(err.type_name(), Some("Number"));
        assert_eq!(err.to_string(), "DT0003: Cannot convert \"abc\" to a number");
    }

    #[test]
    fn test_into_validation_keeps_cause() {
        let err = DataTypeError::casting(DT0003, "bad number")
            .into_validation("Integer", false, None);

        assert!(err.is_validation());
        assert_eq!(err.code(), DT0003);
        assert_eq!(err.type_name(), Some("Integer"));
        assert!(err.cause().is_some_and(|c| c.is_casting()));
    }

    #[test]
    fn test_into_validation_with_override_and_sensitivity() {
        let err = DataTypeError::validation(DT0105, "too large")
            .into_validation("Password", true, Some(DT0111));

        assert_eq!(err.code(), DT0111);
        assert!(err.is_sensitive());
    }

    #[test]
    fn test_encryption_error_is_distinct() {
        let err = DataTypeError::encryption(DT0201, "tampered");
        assert!(err.is_encryption());
        assert!(!err.is_casting());
        assert_eq!(err.type_name(), None);
    }
}
