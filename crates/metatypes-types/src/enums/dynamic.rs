use super::fixed::format_label;
use super::Enumeration;
use crate::contract::{DataType, TypeMeta};
use crate::string::scalar_to_string;
use crate::value::Value;
use indexmap::IndexMap;
use metatypes_diagnostics::{describe_value, DataTypeError, Result, DT0022, DT0023};
use serde::Deserialize;

/// Enumeration whose values are supplied by configuration.
///
/// `values` maps each value to its label; an empty map accepts any scalar.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnumDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    values: IndexMap<String, String>,
    /// Format as `value – label`
    pub show_values: bool,
}

impl EnumDataType {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the value set
    pub fn set_values<I, K, L>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: Into<String>,
    {
        self.values = values
            .into_iter()
            .map(|(k, l)| (k.into(), l.into()))
            .collect();
    }

    /// Add values, overriding labels of existing ones; order of existing
    /// values is kept
    pub fn merge_values<I, K, L>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: Into<String>,
    {
        for (value, label) in values {
            self.values.insert(value.into(), label.into());
        }
    }

    pub fn with_values<I, K, L>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: Into<String>,
    {
        self.set_values(values);
        self
    }

    pub fn with_show_values(mut self, show: bool) -> Self {
        self.show_values = show;
        self
    }

    fn find_value(&self, raw: &str) -> Option<&str> {
        if let Some((value, _)) = self.values.get_key_value(raw) {
            return Some(value);
        }
        self.values
            .keys()
            .find(|v| v.eq_ignore_ascii_case(raw))
            .map(String::as_str)
    }
}

impl Enumeration for EnumDataType {
    fn values(&self) -> Vec<Value> {
        self.values.keys().map(|v| Value::string(v.as_str())).collect()
    }

    fn labels(&self) -> &IndexMap<String, String> {
        &self.values
    }

    /// Values double as keys; labels are accepted too
    fn value_of(&self, key: &str) -> Result<Value> {
        self.find_value(key)
            .or_else(|| {
                self.values
                    .iter()
                    .find(|(_, label)| label.eq_ignore_ascii_case(key))
                    .map(|(value, _)| value.as_str())
            })
            .map(Value::string)
            .ok_or_else(|| {
                DataTypeError::casting(
                    DT0023,
                    format!("{} has no value named \"{}\"", self.name(), key),
                )
            })
    }
}

impl DataType for EnumDataType {
    crate::data_type_basics!("Enum");

    fn cast(&self, value: &Value) -> Result<Value> {
        if value.is_blank() {
            return Ok(Value::Null);
        }
        let raw = scalar_to_string(value)?;
        let raw = raw.trim();
        if self.values.is_empty() {
            return Ok(Value::string(raw));
        }
        self.find_value(raw).map(Value::string).ok_or_else(|| {
            DataTypeError::casting(
                DT0022,
                format!(
                    "{} is not a valid value: expected one of {}",
                    describe_value(raw, false),
                    self.values.keys().cloned().collect::<Vec<_>>().join(", ")
                ),
            )
        })
    }

    fn format(&self, value: &Value) -> String {
        format_label(self, self.show_values, value)
    }

    fn validation_description(&self) -> String {
        if self.values.is_empty() {
            return String::new();
        }
        format!(
            "one of {}",
            self.values.values().cloned().collect::<Vec<_>>().join(", ")
        )
    }

    fn default_widget_type(&self) -> &'static str {
        "InputSelect"
    }
}
