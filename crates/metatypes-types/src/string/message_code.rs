use super::regex::StaticRegex;
use super::{parse_constrained, StringConstraints};
use crate::contract::{DataType, TypeMeta};
use crate::value::Value;
use metatypes_diagnostics::{describe_value, DataTypeError, Result, DT0027};
use serde::Deserialize;

/// Codes are exactly this many characters long
pub const MESSAGE_CODE_LENGTH: usize = 7;

static MESSAGE_CODE: StaticRegex = StaticRegex::new(r"^[A-Z0-9]{7}$");

/// Upper-cased, trimmed code
pub fn cast(value: &Value) -> Result<Value> {
    let cast = super::cast(value)?;
    let Value::String(s) = &cast else {
        return Ok(cast);
    };
    let code = s.trim().to_ascii_uppercase();
    if code.is_empty() || MESSAGE_CODE.is_match(&code) {
        return Ok(Value::String(code));
    }
    Err(DataTypeError::casting(
        DT0027,
        format!(
            "{} is not a valid message code: {} letters or digits expected",
            describe_value(s, false),
            MESSAGE_CODE_LENGTH
        ),
    ))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessageCodeDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub constraints: StringConstraints,
}

impl DataType for MessageCodeDataType {
    crate::data_type_basics!("MessageCode");

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

    #[rstest]
    #[case("6T91AR9", "6T91AR9")]
    #[case(" 73ii64p ", "73II64P")]
    #[case("", "")]
    fn test_cast_valid(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(cast(&Value::from(input)).unwrap(), Value::from(expected));
    }

    #[rstest]
    #[case("6T91AR")]
    #[case("6T91AR99")]
    #[case("6T9-AR9")]
    fn test_cast_invalid(#[case] input: &str) {
        assert_eq!(cast(&Value::from(input)).unwrap_err().code(), DT0027);
    }
}
