//! The contract every data type provides
//!
//! A data type is a plain configuration struct. Its stateless normalization
//! lives in a module-level `cast` function so other types can reuse it
//! without an instance; the [`DataType`] trait adds the instance-level
//! behaviour (`parse`, `format`, metadata) on top.

use crate::context::TypeContext;
use crate::enums::SortingDirection;
use crate::value::Value;
use metatypes_diagnostics::{describe_value, DataTypeError, ErrorCode, Result, DT0300};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::fmt;

/// Descriptive metadata and collaborators shared by all data types.
///
/// Deserialized from the common UXON properties of every type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TypeMeta {
    /// Display name; derived from the type alias when not set
    pub name: Option<String>,
    pub short_description: Option<String>,
    /// Explicit display widget configuration
    pub default_display_widget: Option<serde_json::Value>,
    /// Error code used for all validation failures of this instance
    pub validation_error_code: Option<ErrorCode>,
    /// Never echo values of this type in messages
    pub sensitive_data: bool,
    #[serde(skip)]
    widget_cache: OnceCell<serde_json::Value>,
    #[serde(skip)]
    pub context: TypeContext,
}

/// Operations every data type provides
pub trait DataType: fmt::Debug + Send + Sync {
    /// Stable type identifier, e.g. `"Date"`
    fn alias(&self) -> &'static str;

    fn meta(&self) -> &TypeMeta;

    fn meta_mut(&mut self) -> &mut TypeMeta;

    /// Stateless normalization into the canonical value
    fn cast(&self, value: &Value) -> Result<Value>;

    /// Instance-configured parsing.
    ///
    /// Casting failures are reported as validation errors owned by this type.
    fn parse(&self, value: &Value) -> Result<Value> {
        self.cast(value).map_err(|e| self.to_validation_error(e))
    }

    /// Whether `cast` would succeed; never fails
    fn validate(&self, value: &Value) -> bool {
        self.cast(value).is_ok()
    }

    /// Render a value for display
    fn format(&self, value: &Value) -> String {
        value.to_plain_string()
    }

    /// Type-specific "nothing here" test
    fn is_value_empty(&self, value: &Value) -> bool {
        value.is_blank()
    }

    /// Human-readable summary of the active constraints
    fn validation_description(&self) -> String {
        String::new()
    }

    /// Widget used to display values of this type when nothing is configured
    fn default_widget_type(&self) -> &'static str {
        "Display"
    }

    /// Sort order used when no explicit direction is given
    fn default_sorting_direction(&self) -> SortingDirection {
        SortingDirection::default()
    }

    /// Verify the configuration after import
    fn check_configuration(&self) -> Result<()> {
        Ok(())
    }

    /// Independent copy of this instance
    fn box_clone(&self) -> Box<dyn DataType>;

    fn name(&self) -> String {
        self.meta()
            .name
            .clone()
            .unwrap_or_else(|| self.alias().to_string())
    }

    fn short_description(&self) -> Option<String> {
        self.meta().short_description.clone()
    }

    fn is_sensitive(&self) -> bool {
        self.meta().sensitive_data
    }

    fn context(&self) -> &TypeContext {
        &self.meta().context
    }

    /// Display widget configuration, lazily defaulted
    fn default_display_widget(&self) -> serde_json::Value {
        let meta = self.meta();
        meta.widget_cache
            .get_or_init(|| {
                meta.default_display_widget
                    .clone()
                    .unwrap_or_else(|| json!({ "widget_type": self.default_widget_type() }))
            })
            .clone()
    }

    /// Wrap an error into this type's validation context
    fn to_validation_error(&self, err: DataTypeError) -> DataTypeError {
        let sensitive = self.is_sensitive();
        let err = err.into_validation(&self.name(), sensitive, self.meta().validation_error_code);
        if sensitive && err.is_validation() {
            let message = format!(
                "{} ({})",
                err.code().info().description,
                describe_value("", true)
            );
            return match err {
                // The cause is dropped since it would carry the raw value
                DataTypeError::Validation {
                    code, type_name, ..
                } => DataTypeError::Validation {
                    code,
                    message,
                    type_name,
                    sensitive: true,
                    cause: None,
                },
                other => other,
            };
        }
        err
    }
}

impl Clone for Box<dyn DataType> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Construction from UXON configuration
pub trait Configurable: DataType + DeserializeOwned + Default + Sized {
    /// Build an instance from a UXON object
    fn from_uxon(uxon: &serde_json::Value) -> Result<Self> {
        let instance: Self = if uxon.is_null() {
            Self::default()
        } else {
            serde_json::from_value(uxon.clone()).map_err(|e| {
                DataTypeError::configuration(DT0300, e.to_string())
            })?
        };
        instance.check_configuration()?;
        Ok(instance)
    }

    /// Inject collaborators
    fn with_context(mut self, context: TypeContext) -> Self {
        self.meta_mut().context = context;
        self
    }

    fn with_name(mut self, name: impl Into<String>) -> Self {
        self.meta_mut().name = Some(name.into());
        self
    }

    fn with_sensitive_data(mut self, sensitive: bool) -> Self {
        self.meta_mut().sensitive_data = sensitive;
        self
    }

    fn with_validation_error_code(mut self, code: ErrorCode) -> Self {
        self.meta_mut().validation_error_code = Some(code);
        self
    }
}

impl<T: DataType + DeserializeOwned + Default> Configurable for T {}

/// Implements the mechanical parts of [`DataType`] for a struct with a
/// `meta: TypeMeta` field.
#[macro_export]
macro_rules! data_type_basics {
    ($alias:expr) => {
        fn alias(&self) -> &'static str {
            $alias
        }

        fn meta(&self) -> &$crate::TypeMeta {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut $crate::TypeMeta {
            &mut self.meta
        }

        fn box_clone(&self) -> Box<dyn $crate::DataType> {
            Box::new(self.clone())
        }
    };
}

/// Casting error naming the offending value
pub(crate) fn cast_error(code: ErrorCode, value: &Value, target: &str) -> DataTypeError {
    DataTypeError::casting(
        code,
        format!(
            "Cannot convert {} to {}",
            describe_value(&value.to_plain_string(), false),
            target
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string::StringDataType;
    use crate::number::IntegerDataType;

    #[test]
    fn test_parse_wraps_cast_errors_as_validation() {
        let t = IntegerDataType::default();
        let err = t.parse(&Value::from("abc")).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.type_name(), Some("Integer"));
        assert!(!t.validate(&Value::from("abc")));
    }

    #[test]
    fn test_name_defaults_to_alias_and_can_be_overridden() {
        let t = StringDataType::default();
        assert_eq!(t.name(), "String");
        let t = t.with_name("Customer name");
        assert_eq!(t.name(), "Customer name");
    }

    #[test]
    fn test_default_widget_is_lazily_defaulted() {
        let t = StringDataType::default();
        assert_eq!(t.default_display_widget()["widget_type"], "Display");

        let t = StringDataType::from_uxon(&json!({
            "default_display_widget": {"widget_type": "Text", "attribute_alias": "X"}
        }))
        .unwrap();
        assert_eq!(t.default_display_widget()["widget_type"], "Text");
    }

    #[test]
    fn test_copy_is_independent() {
        let original: Box<dyn DataType> = Box::new(StringDataType::default());
        let mut copy = original.clone();
        copy.meta_mut().name = Some("Renamed".into());
        assert_eq!(original.name(), "String");
        assert_eq!(copy.name(), "Renamed");
    }

    #[test]
    fn test_sensitive_validation_errors_hide_raw_value() {
        let t = IntegerDataType::default().with_sensitive_data(true);
        let err = t.parse(&Value::from("secret-123")).unwrap_err();
        assert!(err.is_sensitive());
        assert!(!err.to_string().contains("secret-123"));
        assert!(err.cause().is_none());
    }

    #[test]
    fn test_invalid_uxon_is_configuration_error() {
        let err = StringDataType::from_uxon(&json!({"length_max": "many"})).unwrap_err();
        assert_eq!(err.code(), DT0300);
    }
}
