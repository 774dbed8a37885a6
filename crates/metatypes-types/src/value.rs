//! Raw and canonical values flowing through the data type pipeline
//!
//! Input arrives loosely typed (numeric-looking strings, boolean-looking
//! strings, JSON arrays). Every data type turns such a [`Value`] into its own
//! canonical [`Value`].

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::fmt;

/// A raw or canonical data type value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Logical null (missing value)
    #[default]
    Null,
    /// Boolean value
    Boolean(bool),
    /// 64-bit signed integer
    Integer(i64),
    /// Arbitrary precision decimal
    Number(Decimal),
    /// String value
    String(String),
    /// Ordered list of values
    List(Vec<Value>),
}

impl Value {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Null, an empty string or an empty list
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.is_empty(),
            Self::List(l) => l.is_empty(),
            _ => false,
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_))
    }

    /// Name of the value's variant, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
        }
    }

    /// Try to get as Boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as Integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Number(d) if d.fract().is_zero() => d.to_i64(),
            _ => None,
        }
    }

    /// Try to get as Decimal
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(d) => Some(*d),
            Self::Integer(i) => Some(Decimal::from(*i)),
            _ => None,
        }
    }

    /// Try to get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// Plain string rendering of scalars (`Null` is the empty string).
    ///
    /// Lists are joined with `,`.
    pub fn to_plain_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Boolean(b) => b.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Number(d) => d.normalize().to_string(),
            Self::String(s) => s.clone(),
            Self::List(l) => l
                .iter()
                .map(Value::to_plain_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Convert to a JSON value
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Number(d) => match d.to_i64() {
                Some(i) if d.fract().is_zero() => serde_json::Value::from(i),
                _ => d
                    .to_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(serde_json::Value::Number)
                    .unwrap_or_else(|| serde_json::Value::String(d.to_string())),
            },
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::List(l) => serde_json::Value::Array(l.iter().map(Value::to_json).collect()),
        }
    }

    /// Create a string value
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::List(l) => {
                write!(f, "[")?;
                for (i, item) in l.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            other => write!(f, "{}", other.to_plain_string()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            // Cross-type numeric comparisons
            (Self::Integer(a), Self::Number(b)) => Decimal::from(*a) == *b,
            (Self::Number(a), Self::Integer(b)) => *a == Decimal::from(*b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Self::Integer(i),
            Err(_) => Self::Number(Decimal::from(value)),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Decimal::from_f64(value).map(Self::Number).unwrap_or(Self::Null)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else {
                    n.to_string()
                        .parse::<Decimal>()
                        .ok()
                        .or_else(|| Decimal::from_scientific(&n.to_string()).ok())
                        .map(Self::Number)
                        .unwrap_or_else(|| Self::String(n.to_string()))
                }
            }
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Array(items) => Self::List(items.iter().map(Value::from).collect()),
            // Objects have no scalar meaning; keep them as their JSON text
            serde_json::Value::Object(_) => Self::String(json.to_string()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_values() {
        assert!(Value::Null.is_blank());
        assert!(Value::from("").is_blank());
        assert!(Value::List(vec![]).is_blank());
        assert!(!Value::from(0).is_blank());
    }

    #[test]
    fn test_cross_type_numeric_equality() {
        assert_eq!(Value::Integer(5), Value::Number(Decimal::from(5)));
        assert_ne!(Value::Integer(5), Value::from("5"));
    }

    #[test]
    fn test_plain_string() {
        assert_eq!(Value::Number("1.50".parse().unwrap()).to_plain_string(), "1.5");
        assert_eq!(Value::from(vec!["a", "b"]).to_plain_string(), "a,b");
        assert_eq!(Value::Null.to_plain_string(), "");
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Value::from(json!(3)), Value::Integer(3));
        assert_eq!(Value::from(json!(1.25)), Value::Number("1.25".parse().unwrap()));
        assert_eq!(Value::from(json!(["x", true])), Value::List(vec!["x".into(), true.into()]));
        assert_eq!(Value::from(json!({"a": 1})), Value::from(r#"{"a":1}"#));
    }

    #[test]
    fn test_to_json() {
        assert_eq!(Value::Number(Decimal::from(4)).to_json(), json!(4));
        assert_eq!(Value::from(vec![1, 2]).to_json(), json!([1, 2]));
    }
}
