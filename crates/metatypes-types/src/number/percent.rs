use super::{cast_decimal, parse_number, NumberOptions};
use crate::contract::{DataType, TypeMeta};
use crate::value::Value;
use metatypes_diagnostics::Result;
use serde::Deserialize;

fn strip_percent(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::string(s.trim().trim_end_matches('%')),
        other => other.clone(),
    }
}

/// Number with an optional trailing `%`
pub fn cast(value: &Value) -> Result<Value> {
    super::cast(&strip_percent(value))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PercentDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub options: NumberOptions,
}

impl DataType for PercentDataType {
    crate::data_type_basics!("Percent");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast(value)
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        Ok(parse_number(self, &self.options, &strip_percent(value), "a percentage")?
            .map(Value::Number)
            .unwrap_or(Value::Null))
    }

    fn format(&self, value: &Value) -> String {
        match cast_decimal(&strip_percent(value), Some('.'), "a percentage") {
            Ok(Some(d)) => format!("{}%", self.options.format(self.context(), d)),
            Ok(None) => String::new(),
            Err(_) => value.to_plain_string(),
        }
    }

    fn validation_description(&self) -> String {
        self.options.describe()
    }

    fn default_widget_type(&self) -> &'static str {
        "ProgressBar"
    }
}
