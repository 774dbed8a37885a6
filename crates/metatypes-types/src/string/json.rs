use super::{parse_constrained, StringConstraints};
use crate::contract::{DataType, TypeMeta};
use crate::value::Value;
use metatypes_diagnostics::{describe_value, DataTypeError, Result, DT0016};
use serde::Deserialize;

/// Whether a JSON text holds nothing: blank, `null`, `{}` or `[]`
pub fn is_empty_json(text: &str) -> bool {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    matches!(compact.as_str(), "" | "{}" | "[]" | "null")
}

/// Lists are serialized; strings must hold valid JSON and are kept verbatim
pub fn cast(value: &Value) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::List(_) => Ok(Value::String(value.to_json().to_string())),
        Value::String(s) if s.trim().is_empty() => Ok(Value::string("")),
        Value::String(s) => match serde_json::from_str::<serde_json::Value>(s) {
            Ok(_) => Ok(Value::string(s.trim())),
            Err(e) => Err(DataTypeError::casting(
                DT0016,
                format!("{} is not valid JSON: {}", describe_value(s, false), e),
            )),
        },
        // Scalars are valid JSON documents on their own
        other => Ok(Value::String(other.to_json().to_string())),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JsonDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub constraints: StringConstraints,
    /// Indent formatted output
    pub pretty_print: bool,
}

impl JsonDataType {
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }
}

impl DataType for JsonDataType {
    crate::data_type_basics!("Json");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast(value)
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        parse_constrained(self, &self.constraints, value)
    }

    fn format(&self, value: &Value) -> String {
        let text = match cast(value) {
            Ok(Value::String(text)) => text,
            _ => return value.to_plain_string(),
        };
        if !self.pretty_print || text.is_empty() {
            return text;
        }
        serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|json| serde_json::to_string_pretty(&json).ok())
            .unwrap_or(text)
    }

    fn is_value_empty(&self, value: &Value) -> bool {
        match value {
            Value::String(s) => is_empty_json(s),
            other => other.is_blank(),
        }
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
    #[case("{}", true)]
    #[case(" [ ] ", true)]
    #[case("", true)]
    #[case("null", true)]
    #[case(r#"{"a":1}"#, false)]
    #[case("[0]", false)]
    fn test_is_empty_json(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_empty_json(input), expected);
        assert_eq!(JsonDataType::default().is_value_empty(&Value::from(input)), expected);
    }

    #[test]
    fn test_cast() {
        assert_eq!(
            cast(&Value::from(r#" {"b": 2, "a": 1} "#)).unwrap(),
            Value::from(r#"{"b": 2, "a": 1}"#)
        );
        assert_eq!(cast(&Value::from(vec![1, 2])).unwrap(), Value::from("[1,2]"));
        assert_eq!(cast(&Value::from("{a:1}")).unwrap_err().code(), DT0016);
    }

    #[test]
    fn test_pretty_print() {
        let t = JsonDataType::default().with_pretty_print(true);
        assert_eq!(t.format(&Value::from(r#"{"a":[1]}"#)), "{\n  \"a\": [\n    1\n  ]\n}");
        assert_eq!(JsonDataType::default().format(&Value::from(r#"{"a":[1]}"#)), r#"{"a":[1]}"#);
    }
}
