//! Sizes in bytes, written with binary (1024-based) units

use super::{parse_decimal, NumberOptions};
use crate::contract::{cast_error, DataType, TypeMeta};
use crate::value::Value;
use metatypes_diagnostics::{DataTypeError, Result, DT0024, DT0026};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;

const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];

/// Power of 1024 for a unit suffix; `B`, `K`, `KB`, `KiB` and so on
fn unit_exponent(unit: &str) -> Option<u32> {
    let upper = unit.to_ascii_uppercase();
    let letter = match upper.as_str() {
        "" | "B" | "BYTE" | "BYTES" => return Some(0),
        u if u.len() == 1 => u,
        u if u.len() == 2 && u.ends_with('B') => &u[..1],
        u if u.len() == 3 && u.ends_with("IB") => &u[..1],
        _ => return None,
    };
    match letter {
        "K" => Some(1),
        "M" => Some(2),
        "G" => Some(3),
        "T" => Some(4),
        "P" => Some(5),
        _ => None,
    }
}

/// Parse `10 KB`, `1.5M` or `2GiB` into bytes
pub fn parse_byte_size(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let split = trimmed
        .find(|c: char| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);
    let amount = parse_decimal(number, None)?;
    let factor = Decimal::from(1024_i64.checked_pow(unit_exponent(unit.trim())?)?);
    amount
        .checked_mul(factor)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Human readable size with up to `precision` fraction digits
pub fn format_byte_size(bytes: i64, precision: u32) -> String {
    let mut size = Decimal::from(bytes);
    let step = Decimal::from(1024);
    let mut unit = 0;
    while size.abs() >= step && unit < UNITS.len() - 1 {
        size /= step;
        unit += 1;
    }
    let rounded = size
        .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    format!("{} {}", rounded, UNITS[unit])
}

pub fn cast(value: &Value) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
        Value::String(s) => parse_byte_size(s)
            .map(Value::Integer)
            .ok_or_else(|| cast_error(DT0026, value, "a byte size")),
        Value::List(_) => Err(DataTypeError::casting(
            DT0024,
            "Cannot convert a list to a byte size",
        )),
        other => super::integer::cast(other),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ByteSizeDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub options: NumberOptions,
}

impl DataType for ByteSizeDataType {
    crate::data_type_basics!("ByteSize");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast(value)
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        let parsed = self.cast(value).map_err(|e| self.to_validation_error(e))?;
        if let Value::Integer(bytes) = parsed {
            self.options
                .check_range(Decimal::from(bytes), self.is_sensitive())
                .map_err(|e| self.to_validation_error(e))?;
        }
        Ok(parsed)
    }

    fn format(&self, value: &Value) -> String {
        match cast(value) {
            Ok(Value::Integer(bytes)) => {
                format_byte_size(bytes, self.options.precision_max.unwrap_or(2))
            }
            _ => value.to_plain_string(),
        }
    }

    fn validation_description(&self) -> String {
        self.options.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("512", 512)]
    #[case("10 KB", 10_240)]
    #[case("1.5M", 1_572_864)]
    #[case("2GiB", 2_147_483_648)]
    #[case("1 kb", 1024)]
    #[case("3 bytes", 3)]
    #[case("1e3", 1000)]
    fn test_parse_byte_size(#[case] input: &str, #[case] expected: i64) {
        assert_eq!(parse_byte_size(input), Some(expected));
    }

    #[rstest]
    #[case("10 XB")]
    #[case("KB")]
    #[case("1.5 MBB")]
    fn test_parse_byte_size_invalid(#[case] input: &str) {
        assert_eq!(parse_byte_size(input), None);
    }

    #[rstest]
    #[case(100, "100 B")]
    #[case(1024, "1 KB")]
    #[case(1_572_864, "1.5 MB")]
    #[case(1_000_000, "976.56 KB")]
    fn test_format_byte_size(#[case] bytes: i64, #[case] expected: &str) {
        assert_eq!(format_byte_size(bytes, 2), expected);
    }

    #[test]
    fn test_cast_and_format() {
        let t = ByteSizeDataType::default();
        assert_eq!(t.cast(&Value::from("10 KB")).unwrap(), Value::Integer(10_240));
        assert_eq!(t.cast(&Value::from(7)).unwrap(), Value::Integer(7));
        assert_eq!(t.cast(&Value::from("lots")).unwrap_err().code(), DT0026);
        assert_eq!(t.format(&Value::from(2048)), "2 KB");
    }
}
