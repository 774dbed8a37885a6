use super::Enumeration;
use crate::contract::{DataType, TypeMeta};
use crate::value::Value;
use indexmap::IndexMap;
use metatypes_diagnostics::{describe_value, DataTypeError, Result, DT0022, DT0023, DT0024};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::fmt;
use std::marker::PhantomData;

/// A closed enumeration with a compile-time list of `(key, value)` pairs.
///
/// Implemented through [`fixed_enum!`](crate::enums::fixed_enum).
pub trait FixedEnum: fmt::Debug + Copy + Eq + Send + Sync + 'static {
    /// Alias of the data type built on this enumeration
    const TYPE_ALIAS: &'static str;

    /// Every variant in declaration order
    const ALL: &'static [Self];

    /// Programmatic name of the variant
    fn key(&self) -> &'static str;

    fn value(&self) -> Value;

    /// English label used when no translation exists
    fn default_label(&self) -> &'static str;

    fn label_key(&self) -> String {
        format!(
            "DATATYPE.{}.{}",
            Self::TYPE_ALIAS.to_uppercase(),
            self.key().to_uppercase()
        )
    }

    fn from_value(value: &Value) -> Option<Self> {
        let plain = value.to_plain_string();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.value().to_plain_string() == plain)
    }

    /// Case-insensitive key lookup
    fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.key().eq_ignore_ascii_case(key.trim()))
    }
}

/// Declares a Rust enum together with its [`FixedEnum`] implementation.
///
/// ```ignore
/// fixed_enum! {
///     pub enum SortingDirection ("SortingDirection") {
///         Asc = "ASC" => "Ascending",
///         Desc = "DESC" => "Descending",
///     }
/// }
/// ```
macro_rules! fixed_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($alias:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::enums::FixedEnum for $name {
            const TYPE_ALIAS: &'static str = $alias;
            const ALL: &'static [Self] = &[ $( Self::$variant ),+ ];

            fn key(&self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($variant) ),+
                }
            }

            fn value(&self) -> $crate::Value {
                match self {
                    $( Self::$variant => $crate::Value::from($value) ),+
                }
            }

            fn default_label(&self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", $crate::enums::FixedEnum::value(self))
            }
        }

        // Configured by value or by key
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> ::std::result::Result<Self, D::Error> {
                use $crate::enums::FixedEnum;
                let raw = serde_json::Value::deserialize(deserializer)?;
                let value = $crate::Value::from(&raw);
                Self::from_value(&value)
                    .or_else(|| value.as_str().and_then(Self::from_key))
                    .ok_or_else(|| {
                        serde::de::Error::custom(format!("unknown {} {}", $alias, raw))
                    })
            }
        }
    };
}

pub(crate) use fixed_enum;

/// Stateless cast for any fixed enumeration: values match exactly, keys
/// case-insensitively
pub fn cast<E: FixedEnum>(value: &Value) -> Result<Value> {
    match value {
        Value::Null => return Ok(Value::Null),
        Value::String(s) if s.trim().is_empty() => return Ok(Value::Null),
        Value::List(_) => {
            return Err(DataTypeError::casting(
                DT0024,
                format!("Cannot convert a list to {}", E::TYPE_ALIAS),
            ));
        }
        _ => {}
    }
    let trimmed = match value {
        Value::String(s) => Value::string(s.trim()),
        other => other.clone(),
    };
    E::from_value(&trimmed)
        .or_else(|| trimmed.as_str().and_then(E::from_key))
        .map(|v| v.value())
        .ok_or_else(|| {
            let valid = E::ALL
                .iter()
                .map(|v| v.value().to_plain_string())
                .collect::<Vec<_>>()
                .join(", ");
            DataTypeError::casting(
                DT0022,
                format!(
                    "{} is not a valid {}: expected one of {}",
                    describe_value(&value.to_plain_string(), false),
                    E::TYPE_ALIAS,
                    valid
                ),
            )
        })
}

/// Data type over a [`FixedEnum`]
#[derive(Debug, Clone, Deserialize)]
#[serde(default, bound = "")]
pub struct FixedEnumDataType<E: FixedEnum> {
    #[serde(flatten)]
    pub meta: TypeMeta,
    /// Format as `value – label`
    pub show_values: bool,
    #[serde(skip)]
    labels: OnceCell<IndexMap<String, String>>,
    #[serde(skip)]
    marker: PhantomData<E>,
}

impl<E: FixedEnum> Default for FixedEnumDataType<E> {
    fn default() -> Self {
        Self {
            meta: TypeMeta::default(),
            show_values: false,
            labels: OnceCell::new(),
            marker: PhantomData,
        }
    }
}

impl<E: FixedEnum> FixedEnumDataType<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse straight into the enum variant
    pub fn variant(&self, value: &Value) -> Result<Option<E>> {
        let parsed = self.parse(value)?;
        Ok(E::from_value(&parsed))
    }
}

impl<E: FixedEnum> Enumeration for FixedEnumDataType<E> {
    fn values(&self) -> Vec<Value> {
        E::ALL.iter().map(|v| v.value()).collect()
    }

    fn labels(&self) -> &IndexMap<String, String> {
        self.labels.get_or_init(|| {
            let context = self.context();
            E::ALL
                .iter()
                .map(|v| {
                    let label = context.text(&v.label_key(), v.default_label(), &[]);
                    (v.value().to_plain_string(), label)
                })
                .collect()
        })
    }

    fn value_of(&self, key: &str) -> Result<Value> {
        E::from_key(key).map(|v| v.value()).ok_or_else(|| {
            DataTypeError::casting(
                DT0023,
                format!("{} has no value named \"{}\"", E::TYPE_ALIAS, key),
            )
        })
    }
}

impl<E: FixedEnum> DataType for FixedEnumDataType<E> {
    crate::data_type_basics!(E::TYPE_ALIAS);

    fn cast(&self, value: &Value) -> Result<Value> {
        cast::<E>(value)
    }

    fn format(&self, value: &Value) -> String {
        format_label(self, self.show_values, value)
    }

    fn validation_description(&self) -> String {
        format!(
            "one of {}",
            self.labels().values().cloned().collect::<Vec<_>>().join(", ")
        )
    }
}

/// Label rendering shared by all enumeration types
pub(crate) fn format_label(enumeration: &dyn Enumeration, show_values: bool, value: &Value) -> String {
    let plain = value.to_plain_string();
    match enumeration.label_of(value) {
        Some(label) if show_values && label != plain => format!("{} – {}", plain, label),
        Some(label) => label,
        None => plain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TypeContext;
    use crate::contract::Configurable;
    use metatypes_model::MapTranslator;
    use std::sync::Arc;

    fixed_enum! {
        enum Fruit ("Fruit") {
            Apple = "a" => "Apple",
            Banana = "b" => "Banana",
            Cherry = 3 => "Cherry",
        }
    }

    #[test]
    fn test_values_cover_all_variants() {
        let t = FixedEnumDataType::<Fruit>::new();
        let values = t.values();
        assert_eq!(values, vec![Value::from("a"), Value::from("b"), Value::Integer(3)]);
        // Stable across calls
        assert_eq!(t.values(), values);
    }

    #[test]
    fn test_cast_by_value_or_key() {
        assert_eq!(cast::<Fruit>(&Value::from("a")).unwrap(), Value::from("a"));
        assert_eq!(cast::<Fruit>(&Value::from("banana")).unwrap(), Value::from("b"));
        assert_eq!(cast::<Fruit>(&Value::from("3")).unwrap(), Value::Integer(3));
        let err = cast::<Fruit>(&Value::from("z")).unwrap_err();
        assert_eq!(err.code(), DT0022);
    }

    #[test]
    fn test_deserialize_by_value_or_key() {
        let by_value: Fruit = serde_json::from_value(serde_json::json!("a")).unwrap();
        let by_key: Fruit = serde_json::from_value(serde_json::json!("Cherry")).unwrap();
        assert_eq!(by_value, Fruit::Apple);
        assert_eq!(by_key, Fruit::Cherry);
        assert!(serde_json::from_value::<Fruit>(serde_json::json!("kiwi")).is_err());
    }

    #[test]
    fn test_label_lookup() {
        let t = FixedEnumDataType::<Fruit>::new();
        assert_eq!(t.label_of(&Value::from("b")).as_deref(), Some("Banana"));
        assert_eq!(t.label_of(&Value::from("z")), None);
        assert_eq!(t.format(&Value::from("a")), "Apple");
    }

    #[test]
    fn test_value_of_unknown_key_is_casting_error() {
        let t = FixedEnumDataType::<Fruit>::new();
        assert_eq!(t.value_of("cherry").unwrap(), Value::Integer(3));
        let err = t.value_of("Durian").unwrap_err();
        assert!(err.is_casting());
        assert_eq!(err.code(), DT0023);
    }

    #[test]
    fn test_labels_are_translated() {
        let translator = MapTranslator::from_pairs([("DATATYPE.FRUIT.APPLE", "Apfel")]);
        let t = FixedEnumDataType::<Fruit>::new()
            .with_context(TypeContext::default().with_translator(Arc::new(translator)));
        assert_eq!(t.label_of(&Value::from("a")).as_deref(), Some("Apfel"));
        assert_eq!(t.label_of(&Value::from("b")).as_deref(), Some("Banana"));
    }

    #[test]
    fn test_show_values() {
        let mut t = FixedEnumDataType::<Fruit>::new();
        t.show_values = true;
        assert_eq!(t.format(&Value::from("a")), "a – Apple");
        assert_eq!(t.alias(), "Fruit");
    }
}
