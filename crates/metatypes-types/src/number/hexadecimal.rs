use crate::contract::{cast_error, DataType, TypeMeta};
use crate::value::Value;
use metatypes_diagnostics::{DataTypeError, Result, DT0009, DT0024};
use serde::Deserialize;

pub const PREFIX: &str = "0x";

/// `0x`-prefixed upper-case hex string.
///
/// Strings are read as hex digits (with or without prefix); integers are
/// converted from their decimal value.
pub fn cast(value: &Value) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
        Value::String(s) => {
            let trimmed = s.trim();
            let digits = trimmed
                .strip_prefix(PREFIX)
                .or_else(|| trimmed.strip_prefix("0X"))
                .unwrap_or(trimmed);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(cast_error(DT0009, value, "a hexadecimal number"));
            }
            Ok(Value::String(format!("{}{}", PREFIX, digits.to_ascii_uppercase())))
        }
        Value::Integer(i) if *i >= 0 => Ok(Value::String(format!("{}{:X}", PREFIX, i))),
        Value::List(_) => Err(DataTypeError::casting(
            DT0024,
            "Cannot convert a list to a hexadecimal number",
        )),
        other => Err(cast_error(DT0009, other, "a hexadecimal number")),
    }
}

/// Numeric value of a hex string, if it fits
pub fn to_integer(hex: &str) -> Option<i64> {
    let digits = hex.trim().strip_prefix(PREFIX).unwrap_or(hex.trim());
    i64::from_str_radix(digits, 16).ok()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HexadecimalDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
}

impl DataType for HexadecimalDataType {
    crate::data_type_basics!("Hexadecimal");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::from("ff"), "0xFF")]
    #[case(Value::from("0x1a2b"), "0x1A2B")]
    #[case(Value::from(" 0X00 "), "0x00")]
    #[case(Value::Integer(255), "0xFF")]
    fn test_cast(#[case] input: Value, #[case] expected: &str) {
        assert_eq!(cast(&input).unwrap(), Value::from(expected));
    }

    #[rstest]
    #[case(Value::from("0x"))]
    #[case(Value::from("xyz"))]
    #[case(Value::Integer(-1))]
    #[case(Value::Boolean(true))]
    fn test_cast_invalid(#[case] input: Value) {
        assert_eq!(cast(&input).unwrap_err().code(), DT0009);
    }

    #[test]
    fn test_to_integer() {
        assert_eq!(to_integer("0xFF"), Some(255));
        assert_eq!(to_integer("zz"), None);
    }
}
