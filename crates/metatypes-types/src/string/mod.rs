//! String data type and its sub-types
//!
//! All sub-types share [`StringConstraints`] (length limits and a validator
//! regex) and build their `cast` on top of [`cast`] from this module.

mod alias;
mod color;
mod cron;
mod email;
pub mod file_path;
mod json;
mod markdown;
mod message_code;
mod password;
pub mod regex;
mod url;
mod uuid;

pub use alias::MetamodelAliasDataType;
pub use color::ColorDataType;
pub use cron::CronDataType;
pub use email::EmailDataType;
pub use file_path::FilePathDataType;
pub use json::JsonDataType;
pub use markdown::MarkdownDataType;
pub use message_code::MessageCodeDataType;
pub use password::{PasswordDataType, PasswordHashDataType};
pub use regex::RegularExpressionDataType;
pub use url::UrlDataType;
pub use uuid::UuidDataType;

use crate::contract::{DataType, TypeMeta};
use crate::value::Value;
use ::regex::Regex;
use metatypes_diagnostics::{
    describe_value, DataTypeError, Result, DT0024, DT0101, DT0102, DT0103,
};
use once_cell::sync::OnceCell;
use serde::Deserialize;

/// Length and pattern constraints of string-based types
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StringConstraints {
    /// Minimum number of characters
    pub length_min: Option<usize>,
    /// Maximum number of characters
    pub length_max: Option<usize>,
    /// Pattern the value must match, bare or delimited (`/^[a-z]+$/i`)
    pub validator_regex: Option<String>,
    #[serde(skip)]
    compiled: OnceCell<Regex>,
}

impl StringConstraints {
    fn regex(&self) -> Result<Option<&Regex>> {
        match &self.validator_regex {
            None => Ok(None),
            Some(pattern) => self
                .compiled
                .get_or_try_init(|| regex::compile_validator(pattern))
                .map(Some),
        }
    }

    /// Fail on an uncompilable validator regex
    pub fn check_configuration(&self) -> Result<()> {
        self.regex().map(|_| ())
    }

    /// Check a cast string against the constraints.
    ///
    /// Empty strings are not checked; requiring a value is not the type's job.
    pub fn check(&self, value: &str, sensitive: bool) -> Result<()> {
        if value.is_empty() {
            return Ok(());
        }

        let length = value.chars().count();
        if let Some(min) = self.length_min {
            if length < min {
                return Err(DataTypeError::validation(
                    DT0101,
                    format!(
                        "The value {} is too short: at least {} characters required",
                        describe_value(value, sensitive),
                        min
                    ),
                ));
            }
        }
        if let Some(max) = self.length_max {
            if length > max {
                return Err(DataTypeError::validation(
                    DT0102,
                    format!(
                        "The value {} is too long: at most {} characters allowed",
                        describe_value(value, sensitive),
                        max
                    ),
                ));
            }
        }
        if let Some(re) = self.regex()? {
            if !re.is_match(value) {
                return Err(DataTypeError::validation(
                    DT0103,
                    format!(
                        "The value {} does not match the pattern {}",
                        describe_value(value, sensitive),
                        self.validator_regex.as_deref().unwrap_or_default()
                    ),
                ));
            }
        }
        Ok(())
    }

    /// English description of the constraints
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        match (self.length_min, self.length_max) {
            (Some(min), Some(max)) => parts.push(format!("length {} to {} characters", min, max)),
            (Some(min), None) => parts.push(format!("at least {} characters", min)),
            (None, Some(max)) => parts.push(format!("at most {} characters", max)),
            (None, None) => {}
        }
        if let Some(pattern) = &self.validator_regex {
            parts.push(format!("matching {}", pattern));
        }
        parts.join(", ")
    }
}

/// Render a scalar as a string; lists are rejected
pub fn scalar_to_string(value: &Value) -> Result<String> {
    match value {
        Value::List(_) => Err(DataTypeError::casting(
            DT0024,
            "Cannot convert a list to a string",
        )),
        other => Ok(other.to_plain_string()),
    }
}

/// Stateless string normalization: scalars become strings, `Null` stays `Null`
pub fn cast(value: &Value) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        other => scalar_to_string(other).map(Value::String),
    }
}

/// Shared `parse` for string-based types: cast, then apply the constraints.
pub(crate) fn parse_constrained(
    data_type: &dyn DataType,
    constraints: &StringConstraints,
    value: &Value,
) -> Result<Value> {
    let cast = data_type
        .cast(value)
        .map_err(|e| data_type.to_validation_error(e))?;
    if let Value::String(s) = &cast {
        constraints
            .check(s, data_type.is_sensitive())
            .map_err(|e| data_type.to_validation_error(e))?;
    }
    Ok(cast)
}

/// Plain string type
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StringDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub constraints: StringConstraints,
}

impl StringDataType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_length_min(mut self, min: usize) -> Self {
        self.constraints.length_min = Some(min);
        self
    }

    pub fn with_length_max(mut self, max: usize) -> Self {
        self.constraints.length_max = Some(max);
        self
    }

    pub fn with_validator_regex(mut self, pattern: impl Into<String>) -> Self {
        self.constraints.validator_regex = Some(pattern.into());
        self.constraints.compiled = OnceCell::new();
        self
    }
}

impl DataType for StringDataType {
    crate::data_type_basics!("String");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast(value)
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        parse_constrained(self, &self.constraints, value)
    }

    fn validation_description(&self) -> String {
        self.constraints.describe()
    }

    fn check_configuration(&self) -> Result<()> {
        self.constraints.check_configuration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::Configurable;
    use metatypes_diagnostics::DT0302;
    use serde_json::json;

    #[test]
    fn test_cast_scalars() {
        assert_eq!(cast(&Value::from(12)).unwrap(), Value::from("12"));
        assert_eq!(cast(&Value::from(true)).unwrap(), Value::from("true"));
        assert_eq!(cast(&Value::Null).unwrap(), Value::Null);
        assert_eq!(cast(&Value::from("")).unwrap(), Value::from(""));
    }

    #[test]
    fn test_cast_rejects_lists() {
        let err = cast(&Value::from(vec!["a"])).unwrap_err();
        assert!(err.is_casting());
        assert_eq!(err.code(), DT0024);
    }

    #[test]
    fn test_length_constraints() {
        let t = StringDataType::new().with_length_min(2).with_length_max(4);
        assert!(t.parse(&Value::from("abc")).is_ok());
        assert_eq!(t.parse(&Value::from("a")).unwrap_err().code(), DT0101);
        assert_eq!(t.parse(&Value::from("abcde")).unwrap_err().code(), DT0102);
        // Empty values are not length-checked
        assert!(t.parse(&Value::from("")).is_ok());
    }

    #[test]
    fn test_length_counts_characters() {
        let t = StringDataType::new().with_length_max(3);
        assert!(t.parse(&Value::from("äöü")).is_ok());
    }

    #[test]
    fn test_validator_regex() {
        let t = StringDataType::from_uxon(&json!({"validator_regex": "/^[a-z]+$/i"})).unwrap();
        assert!(t.parse(&Value::from("Hello")).is_ok());
        let err = t.parse(&Value::from("Hello1")).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.code(), DT0103);
    }

    #[test]
    fn test_invalid_validator_regex_is_configuration_error() {
        let err = StringDataType::from_uxon(&json!({"validator_regex": "/([a-z/"})).unwrap_err();
        assert_eq!(err.code(), DT0302);
    }

    #[test]
    fn test_validation_description() {
        let t = StringDataType::new().with_length_min(1).with_length_max(10);
        assert_eq!(t.validation_description(), "length 1 to 10 characters");
    }
}
