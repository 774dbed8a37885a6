//! Data type diagnostics and error handling
//!
//! This crate provides the error handling infrastructure for the data type
//! pipeline: the failure kinds (casting vs. validation), numbered error codes
//! and helpers to keep sensitive values out of error messages.

mod error;
mod error_code;
mod redact;

pub use error::*;
pub use error_code::*;
pub use redact::*;

/// Result type for data type operations
pub type Result<T> = std::result::Result<T, DataTypeError>;
