//! UUIDs in any common notation, canonically hyphenated lower-case

use super::{parse_constrained, StringConstraints};
use crate::contract::{DataType, TypeMeta};
use crate::value::Value;
use ::uuid::Uuid;
use metatypes_diagnostics::{describe_value, DataTypeError, Result, DT0015};
use serde::Deserialize;

/// Parse hyphenated, braced (`{...}`), plain or `0x`-prefixed hex notation
pub fn parse_uuid(raw: &str) -> Option<Uuid> {
    let trimmed = raw.trim();
    let plain = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    Uuid::try_parse(plain).ok()
}

/// `0x`-prefixed upper-case hex form used by binary storage columns
pub fn to_hex(raw: &str) -> Result<String> {
    parse_uuid(raw)
        .map(|u| format!("0x{}", hex::encode_upper(u.as_bytes())))
        .ok_or_else(|| invalid(raw))
}

fn invalid(raw: &str) -> DataTypeError {
    DataTypeError::casting(
        DT0015,
        format!("{} is not a valid UUID", describe_value(raw, false)),
    )
}

pub fn cast(value: &Value) -> Result<Value> {
    let cast = super::cast(value)?;
    match &cast {
        Value::String(s) if !s.trim().is_empty() => parse_uuid(s)
            .map(|u| Value::String(u.hyphenated().to_string()))
            .ok_or_else(|| invalid(s)),
        Value::String(_) => Ok(Value::string("")),
        _ => Ok(cast),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UuidDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub constraints: StringConstraints,
}

impl UuidDataType {
    /// Fresh random (v4) UUID in canonical form
    pub fn generate() -> String {
        Uuid::new_v4().hyphenated().to_string()
    }
}

impl DataType for UuidDataType {
    crate::data_type_basics!("UUID");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast(value)
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        parse_constrained(self, &self.constraints, value)
    }

    fn check_configuration(&self) -> Result<()> {
        self.constraints.check_configuration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const CANONICAL: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

    #[rstest]
    #[case("67e55044-10b1-426f-9247-bb680e5fe0c8")]
    #[case("67E55044-10B1-426F-9247-BB680E5FE0C8")]
    #[case("{67e55044-10b1-426f-9247-bb680e5fe0c8}")]
    #[case("67e5504410b1426f9247bb680e5fe0c8")]
    #[case("0x67E5504410B1426F9247BB680E5FE0C8")]
    fn test_cast_notations(#[case] input: &str) {
        assert_eq!(cast(&Value::from(input)).unwrap(), Value::from(CANONICAL));
    }

    #[test]
    fn test_cast_invalid() {
        let err = cast(&Value::from("67e55044-10b1")).unwrap_err();
        assert_eq!(err.code(), DT0015);
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(
            to_hex(CANONICAL).unwrap(),
            "0x67E5504410B1426F9247BB680E5FE0C8"
        );
    }

    #[test]
    fn test_generate_is_canonical() {
        let generated = UuidDataType::generate();
        assert_eq!(cast(&Value::from(generated.as_str())).unwrap(), Value::from(generated));
    }
}
