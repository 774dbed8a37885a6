//! Enumeration support
//!
//! Two flavours share the [`Enumeration`] lookup interface:
//!
//! - fixed enumerations are Rust enums declared with [`fixed_enum!`]; their
//!   value set is the closed list of variants
//! - [`EnumDataType`] holds a value/label map supplied by configuration
//!
//! Looking up the label of an unknown value yields `None`; looking up a value
//! by an unknown key is a casting error.

mod builtin;
mod dynamic;
mod fixed;
mod locale;

pub use builtin::{
    EmailPriority, EmailPriorityDataType, LogLevel, LogLevelDataType, SortingDirection,
    SortingDirectionDataType,
};
pub use dynamic::EnumDataType;
pub(crate) use fixed::fixed_enum;
pub use fixed::{FixedEnum, FixedEnumDataType};
pub use locale::LocaleDataType;

use crate::value::Value;
use indexmap::IndexMap;
use metatypes_diagnostics::Result;

/// Lookup interface of fixed and dynamic enumerations
pub trait Enumeration {
    /// All values in declaration order
    fn values(&self) -> Vec<Value>;

    /// Labels keyed by the plain string of each value
    fn labels(&self) -> &IndexMap<String, String>;

    /// Value for a programmatic key; unknown keys are an error
    fn value_of(&self, key: &str) -> Result<Value>;

    fn label_of(&self, value: &Value) -> Option<String> {
        self.labels().get(&value.to_plain_string()).cloned()
    }

    fn is_valid_value(&self, value: &Value) -> bool {
        self.labels().contains_key(&value.to_plain_string())
    }
}
