//! Passwords and bcrypt password hashes
//!
//! Both types are always sensitive: their values never appear in error
//! messages and format as a fixed mask.

use super::{parse_constrained, StringConstraints};
use crate::contract::{DataType, TypeMeta};
use crate::value::Value;
use bcrypt::{hash, verify, DEFAULT_COST};
use metatypes_diagnostics::{DataTypeError, Result, DT0101, DT0112, DT0200};
use serde::Deserialize;

/// Applied when `length_min` is not configured
pub const DEFAULT_LENGTH_MIN: usize = 8;

/// bcrypt only considers the first 72 bytes
pub const MAX_PASSWORD_BYTES: usize = 72;

const MASK: &str = "********";

fn check_default_length(data_type: &dyn DataType, constraints: &StringConstraints, password: &str) -> Result<()> {
    if constraints.length_min.is_some() || password.is_empty() {
        return Ok(());
    }
    if password.chars().count() < DEFAULT_LENGTH_MIN {
        return Err(data_type.to_validation_error(DataTypeError::validation(
            DT0101,
            format!("Passwords need at least {} characters", DEFAULT_LENGTH_MIN),
        )));
    }
    Ok(())
}

fn masked(value: &Value) -> String {
    if value.is_blank() {
        String::new()
    } else {
        MASK.to_string()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PasswordDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub constraints: StringConstraints,
}

impl DataType for PasswordDataType {
    crate::data_type_basics!("Password");

    fn cast(&self, value: &Value) -> Result<Value> {
        super::cast(value)
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        let parsed = parse_constrained(self, &self.constraints, value)?;
        if let Value::String(password) = &parsed {
            check_default_length(self, &self.constraints, password)?;
        }
        Ok(parsed)
    }

    fn format(&self, value: &Value) -> String {
        masked(value)
    }

    fn is_sensitive(&self) -> bool {
        true
    }

    fn validation_description(&self) -> String {
        match self.constraints.length_min {
            Some(_) => self.constraints.describe(),
            None => format!("at least {} characters", DEFAULT_LENGTH_MIN),
        }
    }

    fn check_configuration(&self) -> Result<()> {
        self.constraints.check_configuration()
    }

    fn default_widget_type(&self) -> &'static str {
        "InputPassword"
    }
}

/// Whether the value already is a bcrypt hash (`$2a$`, `$2b$`, `$2x$`, `$2y$`)
pub fn is_hash(value: &str) -> bool {
    let bytes = value.as_bytes();
    value.len() == 60
        && value.starts_with("$2")
        && matches!(bytes[2], b'a' | b'b' | b'x' | b'y')
        && bytes[3] == b'$'
        && bytes[4..6].iter().all(u8::is_ascii_digit)
        && bytes[6] == b'$'
}

/// Check a plain password against a bcrypt hash
pub fn verify_password(password: &str, hashed: &str) -> Result<bool> {
    verify(password, hashed).map_err(|e| {
        DataTypeError::encryption(DT0200, format!("Cannot verify password hash: {}", e))
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordHashDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub constraints: StringConstraints,
    /// bcrypt work factor
    pub cost: u32,
}

impl Default for PasswordHashDataType {
    fn default() -> Self {
        Self {
            meta: TypeMeta::default(),
            constraints: StringConstraints::default(),
            cost: DEFAULT_COST,
        }
    }
}

impl PasswordHashDataType {
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    /// Hash a plain password after checking the password policy
    pub fn hash_password(&self, password: &str) -> Result<String> {
        self.constraints
            .check(password, true)
            .map_err(|e| self.to_validation_error(e))?;
        check_default_length(self, &self.constraints, password)?;
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(self.to_validation_error(DataTypeError::validation(
                DT0112,
                format!("Passwords may not exceed {} bytes", MAX_PASSWORD_BYTES),
            )));
        }
        hash(password, self.cost).map_err(|e| {
            DataTypeError::encryption(DT0200, format!("Cannot hash password: {}", e))
        })
    }

    pub fn verify(&self, password: &str, hashed: &str) -> Result<bool> {
        verify_password(password, hashed)
    }
}

impl DataType for PasswordHashDataType {
    crate::data_type_basics!("PasswordHash");

    /// Hashing is salted and thus left to `parse`
    fn cast(&self, value: &Value) -> Result<Value> {
        super::cast(value)
    }

    /// Existing hashes pass through; plain passwords are hashed
    fn parse(&self, value: &Value) -> Result<Value> {
        let cast = self.cast(value).map_err(|e| self.to_validation_error(e))?;
        match &cast {
            Value::String(s) if s.is_empty() || is_hash(s) => Ok(cast),
            Value::String(plain) => self.hash_password(plain).map(Value::String),
            _ => Ok(cast),
        }
    }

    fn format(&self, value: &Value) -> String {
        masked(value)
    }

    fn is_sensitive(&self) -> bool {
        true
    }

    fn check_configuration(&self) -> Result<()> {
        self.constraints.check_configuration()
    }
}
