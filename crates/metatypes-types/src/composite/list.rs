use crate::contract::{DataType, TypeMeta};
use crate::generic::AnyDataType;
use crate::value::Value;
use log::debug;
use metatypes_diagnostics::{DataTypeError, Result, DT0024, DT0110, DT0300};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::sync::Arc;

pub const DEFAULT_DELIMITER: &str = ",";

/// Delimiter with a trailing space after `,`, `.` and `;`
pub fn display_delimiter(delimiter: &str) -> String {
    match delimiter {
        "," | "." | ";" => format!("{} ", delimiter),
        other => other.to_string(),
    }
}

/// Split a delimited string into trimmed, non-empty items
pub fn split_items(raw: &str, delimiter: &str) -> Vec<String> {
    if delimiter.is_empty() {
        return vec![raw.trim().to_string()];
    }
    raw.split(delimiter)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn items_of(value: &Value, delimiter: &str) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::List(items) => items.iter().filter(|v| !v.is_blank()).cloned().collect(),
        other => split_items(&other.to_plain_string(), delimiter)
            .into_iter()
            .map(Value::String)
            .collect(),
    }
}

fn join(items: &[Value], delimiter: &str) -> String {
    items
        .iter()
        .map(Value::to_plain_string)
        .collect::<Vec<_>>()
        .join(delimiter)
}

/// Delimited string with the default delimiter; lists are joined
pub fn cast(value: &Value) -> Result<Value> {
    Ok(Value::String(join(
        &items_of(value, DEFAULT_DELIMITER),
        DEFAULT_DELIMITER,
    )))
}

/// A delimited collection of values of a nested type.
///
/// The nested type is given by alias (`value_type`, optionally configured
/// through `value_type_uxon`) and resolved on first use through the context's
/// [`TypeResolver`](crate::TypeResolver). Without a `value_type` items are
/// taken as they are.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    pub delimiter: Option<String>,
    pub value_type: Option<String>,
    pub value_type_uxon: Option<serde_json::Value>,
    #[serde(skip)]
    resolved: OnceCell<Arc<dyn DataType>>,
}

impl ListDataType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Use an already configured nested type
    pub fn with_value_type(self, value_type: Arc<dyn DataType>) -> Self {
        let resolved = OnceCell::new();
        let _ = resolved.set(value_type);
        Self { resolved, ..self }
    }

    pub fn delimiter(&self) -> &str {
        self.delimiter.as_deref().unwrap_or(DEFAULT_DELIMITER)
    }

    /// The nested type, resolved once per instance
    pub fn value_type(&self) -> Result<&Arc<dyn DataType>> {
        self.resolved.get_or_try_init(|| {
            let Some(alias) = self.value_type.as_deref() else {
                return Ok(Arc::new(AnyDataType::default()) as Arc<dyn DataType>);
            };
            let resolver = self.context().resolver.as_ref().ok_or_else(|| {
                DataTypeError::configuration(
                    DT0300,
                    format!("Cannot resolve list value type {}: no type resolver", alias),
                )
                .with_type(self.name())
            })?;
            debug!("Resolving list value type {}", alias);
            resolver.resolve(alias, self.value_type_uxon.as_ref())
        })
    }

    /// The items of a list value
    pub fn items(&self, value: &Value) -> Vec<Value> {
        items_of(value, self.delimiter())
    }
}

impl DataType for ListDataType {
    crate::data_type_basics!("List");

    fn cast(&self, value: &Value) -> Result<Value> {
        let nested = self.value_type()?;
        let cast = self
            .items(value)
            .iter()
            .enumerate()
            .map(|(index, item)| {
                nested.cast(item).map_err(|e| {
                    DataTypeError::casting(
                        DT0024,
                        format!("List item {} is not a valid {}", index + 1, nested.name()),
                    )
                    .with_cause(e)
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::String(join(&cast, self.delimiter())))
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        let nested = self.value_type()?;
        let mut parsed = Vec::new();
        for (index, item) in self.items(value).iter().enumerate() {
            let item = nested.parse(item).map_err(|e| {
                let err = DataTypeError::validation(
                    DT0110,
                    format!("Item {}: {}", index + 1, e.message()),
                )
                .with_sensitive(e.is_sensitive())
                .with_cause(e);
                self.to_validation_error(err)
            })?;
            parsed.push(item);
        }
        Ok(Value::String(join(&parsed, self.delimiter())))
    }

    fn format(&self, value: &Value) -> String {
        let items = self.items(value);
        let formatted: Vec<String> = match self.value_type() {
            Ok(nested) => items.iter().map(|item| nested.format(item)).collect(),
            Err(_) => items.iter().map(Value::to_plain_string).collect(),
        };
        formatted.join(&display_delimiter(self.delimiter()))
    }

    fn is_value_empty(&self, value: &Value) -> bool {
        self.items(value).is_empty()
    }

    fn validation_description(&self) -> String {
        match self.value_type() {
            Ok(nested) => format!(
                "list of {} separated by \"{}\"",
                nested.name(),
                self.delimiter()
            ),
            Err(_) => format!("list separated by \"{}\"", self.delimiter()),
        }
    }
}
