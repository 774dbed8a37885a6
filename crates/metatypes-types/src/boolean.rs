use crate::contract::{cast_error, DataType, TypeMeta};
use crate::value::Value;
use metatypes_diagnostics::{DataTypeError, Result, DT0002, DT0024};
use serde::Deserialize;

const TRUE_WORDS: &[&str] = &["true", "1", "yes", "y", "on"];
const FALSE_WORDS: &[&str] = &["false", "0", "no", "n", "off"];

pub fn cast(value: &Value) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Boolean(b) => Ok(Value::Boolean(*b)),
        Value::Integer(0) => Ok(Value::Boolean(false)),
        Value::Integer(1) => Ok(Value::Boolean(true)),
        Value::Number(d) if d.is_zero() => Ok(Value::Boolean(false)),
        Value::Number(d) if *d == rust_decimal::Decimal::ONE => Ok(Value::Boolean(true)),
        Value::String(s) => {
            let lower = s.trim().to_lowercase();
            if lower.is_empty() {
                Ok(Value::Null)
            } else if TRUE_WORDS.contains(&lower.as_str()) {
                Ok(Value::Boolean(true))
            } else if FALSE_WORDS.contains(&lower.as_str()) {
                Ok(Value::Boolean(false))
            } else {
                Err(cast_error(DT0002, value, "a boolean"))
            }
        }
        Value::List(_) => Err(DataTypeError::casting(
            DT0024,
            "Cannot convert a list to a boolean",
        )),
        other => Err(cast_error(DT0002, other, "a boolean")),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BooleanDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
}

impl DataType for BooleanDataType {
    crate::data_type_basics!("Boolean");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast(value)
    }

    /// Translated "Yes"/"No"
    fn format(&self, value: &Value) -> String {
        match cast(value) {
            Ok(Value::Boolean(true)) => self.context().text("DATATYPE.BOOLEAN.TRUE", "Yes", &[]),
            Ok(Value::Boolean(false)) => self.context().text("DATATYPE.BOOLEAN.FALSE", "No", &[]),
            _ => value.to_plain_string(),
        }
    }

    fn default_widget_type(&self) -> &'static str {
        "DisplayCheckbox"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TypeContext;
    use crate::contract::Configurable;
    use metatypes_model::MapTranslator;
    use rstest::rstest;
    use std::sync::Arc;

    #[rstest]
    #[case(Value::from("TRUE"), Value::Boolean(true))]
    #[case(Value::from(" yes "), Value::Boolean(true))]
    #[case(Value::from("on"), Value::Boolean(true))]
    #[case(Value::from("0"), Value::Boolean(false))]
    #[case(Value::from("Off"), Value::Boolean(false))]
    #[case(Value::Integer(1), Value::Boolean(true))]
    #[case(Value::from(""), Value::Null)]
    fn test_cast(#[case] input: Value, #[case] expected: Value) {
        assert_eq!(cast(&input).unwrap(), expected);
    }

    #[rstest]
    #[case(Value::from("maybe"))]
    #[case(Value::Integer(2))]
    fn test_cast_invalid(#[case] input: Value) {
        assert_eq!(cast(&input).unwrap_err().code(), DT0002);
    }

    #[test]
    fn test_format_is_translated() {
        let t = BooleanDataType::default();
        assert_eq!(t.format(&Value::Boolean(true)), "Yes");
        assert_eq!(t.format(&Value::from("0")), "No");

        let translator = MapTranslator::from_pairs([("DATATYPE.BOOLEAN.TRUE", "Ja")]);
        let t = t.with_context(TypeContext::default().with_translator(Arc::new(translator)));
        assert_eq!(t.format(&Value::Boolean(true)), "Ja");
    }
}
