use super::regex::StaticRegex;
use super::{parse_constrained, StringConstraints};
use crate::contract::{DataType, TypeMeta};
use crate::value::Value;
use metatypes_diagnostics::{describe_value, DataTypeError, Result, DT0020};
use serde::Deserialize;

static EMAIL: StaticRegex =
    StaticRegex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$");

pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Trimmed address; empty input stays empty
pub fn cast(value: &Value) -> Result<Value> {
    let cast = super::cast(value)?;
    let Value::String(s) = &cast else {
        return Ok(cast);
    };
    let trimmed = s.trim();
    if trimmed.is_empty() || is_email(trimmed) {
        return Ok(Value::string(trimmed));
    }
    Err(DataTypeError::casting(
        DT0020,
        format!("{} is not a valid email address", describe_value(s, false)),
    ))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmailDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub constraints: StringConstraints,
}

impl DataType for EmailDataType {
    crate::data_type_basics!("Email");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast(value)
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        parse_constrained(self, &self.constraints, value)
    }

    fn check_configuration(&self) -> Result<()> {
        self.constraints.check_configuration()
    }

    fn default_widget_type(&self) -> &'static str {
        "DisplayEmail"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("john.doe@example.com", true)]
    #[case("a+b@mail.example.org", true)]
    #[case("no-at-sign.example.com", false)]
    #[case("two@@example.com", false)]
    #[case("user@localhost", false)]
    #[case("user@exa mple.com", false)]
    fn test_is_email(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_email(input), expected);
    }

    #[test]
    fn test_cast_trims() {
        assert_eq!(
            cast(&Value::from("  me@example.com ")).unwrap(),
            Value::from("me@example.com")
        );
        assert_eq!(cast(&Value::from("")).unwrap(), Value::from(""));
    }

    #[test]
    fn test_parse_reports_validation_error() {
        let err = EmailDataType::default()
            .parse(&Value::from("nope"))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.code(), DT0020);
    }
}
