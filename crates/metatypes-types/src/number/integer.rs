use super::{cast_decimal, parse_number, NumberOptions};
use crate::contract::{cast_error, DataType, TypeMeta};
use crate::value::Value;
use metatypes_diagnostics::{Result, DT0004};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

fn to_integer(decimal: Decimal, original: &Value) -> Result<i64> {
    if !decimal.fract().is_zero() {
        return Err(cast_error(DT0004, original, "an integer"));
    }
    decimal
        .to_i64()
        .ok_or_else(|| cast_error(DT0004, original, "an integer"))
}

/// Whole numbers only; `"3.0"` is accepted, `"3.5"` is not
pub fn cast(value: &Value) -> Result<Value> {
    match cast_decimal(value, None, "an integer")? {
        Some(decimal) => to_integer(decimal, value).map(Value::Integer),
        None => Ok(Value::Null),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IntegerDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub options: NumberOptions,
}

impl DataType for IntegerDataType {
    crate::data_type_basics!("Integer");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast(value)
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        // Fractions are an error rather than something to round away
        let exact = NumberOptions {
            precision_max: None,
            ..self.options.clone()
        };
        match parse_number(self, &exact, value, "an integer")? {
            Some(decimal) => to_integer(decimal, value)
                .map(Value::Integer)
                .map_err(|e| self.to_validation_error(e)),
            None => Ok(Value::Null),
        }
    }

    fn format(&self, value: &Value) -> String {
        match cast_decimal(value, Some('.'), "an integer") {
            Ok(Some(d)) => self.options.format(self.context(), d.trunc()),
            Ok(None) => String::new(),
            Err(_) => value.to_plain_string(),
        }
    }

    fn validation_description(&self) -> String {
        self.options.describe()
    }

    fn default_widget_type(&self) -> &'static str {
        "DisplayNumber"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::from("42"), Value::Integer(42))]
    #[case(Value::from("-7"), Value::Integer(-7))]
    #[case(Value::from("3.0"), Value::Integer(3))]
    #[case(Value::from("1,000"), Value::Integer(1000))]
    #[case(Value::Number(Decimal::from(9)), Value::Integer(9))]
    #[case(Value::from(""), Value::Null)]
    fn test_cast(#[case] input: Value, #[case] expected: Value) {
        assert_eq!(cast(&input).unwrap(), expected);
    }

    #[rstest]
    #[case("3.5")]
    #[case("abc")]
    #[case("99999999999999999999")]
    fn test_cast_invalid(#[case] input: &str) {
        assert!(cast(&Value::from(input)).unwrap_err().is_casting());
    }

    #[test]
    fn test_parse_range() {
        let mut t = IntegerDataType::default();
        t.options.min = Some(Decimal::from(1));
        assert!(t.parse(&Value::from("1")).is_ok());
        assert!(t.parse(&Value::from("0")).unwrap_err().is_validation());
        assert_eq!(t.parse(&Value::from("1.5")).unwrap_err().code(), DT0004);
    }

    #[test]
    fn test_format() {
        let mut t = IntegerDataType::default();
        t.options.show_thousands_separator = true;
        assert_eq!(t.format(&Value::Integer(1234567)), "1,234,567");
    }
}
