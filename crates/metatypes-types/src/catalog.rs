//! Catalog of the built-in data types

use crate::boolean::BooleanDataType;
use crate::comparator::ComparatorDataType;
use crate::composite::{BinaryDataType, BinaryEncodingDataType, EncryptedDataType, ListDataType};
use crate::context::TypeContext;
use crate::contract::{Configurable, DataType};
use crate::enums::{
    EmailPriorityDataType, EnumDataType, LocaleDataType, LogLevelDataType,
    SortingDirectionDataType,
};
use crate::generic::AnyDataType;
use crate::number::{
    ByteSizeDataType, HexadecimalDataType, IntegerDataType, NumberDataType, PercentDataType,
    PriceDataType,
};
use crate::string::{
    ColorDataType, CronDataType, EmailDataType, FilePathDataType, JsonDataType, MarkdownDataType,
    MessageCodeDataType, MetamodelAliasDataType, PasswordDataType, PasswordHashDataType,
    RegularExpressionDataType, StringDataType, UrlDataType, UuidDataType,
};
use crate::temporal::{DateDataType, DateTimeDataType, TimeDataType, TimestampDataType};
use crate::validators::{IpAddressDataType, IpFamilyDataType, SemanticVersionDataType};
use metatypes_diagnostics::Result;
use std::sync::Arc;

/// Namespace of built-in type identifiers
pub const NAMESPACE: &str = "metatypes";

macro_rules! builtin_types {
    ($( $(#[$meta:meta])* $variant:ident => $alias:literal : $ty:ty ),+ $(,)?) => {
        /// Built-in data types
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum BuiltinType {
            $( $(#[$meta])* $variant ),+
        }

        impl BuiltinType {
            /// Every built-in type in catalog order
            pub const ALL: &'static [Self] = &[ $( Self::$variant ),+ ];

            /// Type identifier, e.g. `"DateTime"`
            pub const fn alias(&self) -> &'static str {
                match self {
                    $( Self::$variant => $alias ),+
                }
            }

            /// Configured instance with the given collaborators
            pub fn instantiate(
                &self,
                uxon: Option<&serde_json::Value>,
                context: TypeContext,
            ) -> Result<Arc<dyn DataType>> {
                let uxon = uxon.unwrap_or(&serde_json::Value::Null);
                match self {
                    $( Self::$variant => build::<$ty>(uxon, context) ),+
                }
            }
        }
    };
}

fn build<T: Configurable + 'static>(
    uxon: &serde_json::Value,
    context: TypeContext,
) -> Result<Arc<dyn DataType>> {
    Ok(Arc::new(T::from_uxon(uxon)?.with_context(context)))
}

builtin_types! {
    /// Any value, unchanged
    Any => "Any": AnyDataType,
    Boolean => "Boolean": BooleanDataType,
    Number => "Number": NumberDataType,
    Integer => "Integer": IntegerDataType,
    Percent => "Percent": PercentDataType,
    Price => "Price": PriceDataType,
    ByteSize => "ByteSize": ByteSizeDataType,
    Hexadecimal => "Hexadecimal": HexadecimalDataType,
    String => "String": StringDataType,
    Email => "Email": EmailDataType,
    Url => "Url": UrlDataType,
    FilePath => "FilePath": FilePathDataType,
    Json => "Json": JsonDataType,
    Markdown => "Markdown": MarkdownDataType,
    Cron => "Cron": CronDataType,
    RegularExpression => "RegularExpression": RegularExpressionDataType,
    Color => "Color": ColorDataType,
    MessageCode => "MessageCode": MessageCodeDataType,
    MetamodelAlias => "MetamodelAlias": MetamodelAliasDataType,
    Uuid => "UUID": UuidDataType,
    Password => "Password": PasswordDataType,
    PasswordHash => "PasswordHash": PasswordHashDataType,
    SemanticVersion => "SemanticVersion": SemanticVersionDataType,
    IpAddress => "IPAddress": IpAddressDataType,
    Date => "Date": DateDataType,
    DateTime => "DateTime": DateTimeDataType,
    Time => "Time": TimeDataType,
    Timestamp => "Timestamp": TimestampDataType,
    /// Value/label map from configuration
    Enum => "Enum": EnumDataType,
    Locale => "Locale": LocaleDataType,
    Comparator => "Comparator": ComparatorDataType,
    SortingDirection => "SortingDirection": SortingDirectionDataType,
    LogLevel => "LogLevel": LogLevelDataType,
    EmailPriority => "EmailPriority": EmailPriorityDataType,
    BinaryEncoding => "BinaryEncoding": BinaryEncodingDataType,
    IpFamily => "IpFamily": IpFamilyDataType,
    Binary => "Binary": BinaryDataType,
    List => "List": ListDataType,
    Encrypted => "Encrypted": EncryptedDataType,
}

impl BuiltinType {
    /// Case-insensitive lookup; accepts the namespaced form
    /// (`metatypes.Date`) as well
    pub fn from_alias(alias: &str) -> Option<Self> {
        let alias = alias.trim();
        let bare = alias
            .strip_prefix(NAMESPACE)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(alias);
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.alias().eq_ignore_ascii_case(bare))
    }

    /// Namespaced identifier, e.g. `metatypes.Date`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", NAMESPACE, self.alias())
    }

    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Number
                | Self::Integer
                | Self::Percent
                | Self::Price
                | Self::ByteSize
                | Self::Hexadecimal
        )
    }

    pub const fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime | Self::Time | Self::Timestamp)
    }

    pub const fn is_enumeration(&self) -> bool {
        matches!(
            self,
            Self::Enum
                | Self::Locale
                | Self::Comparator
                | Self::SortingDirection
                | Self::LogLevel
                | Self::EmailPriority
                | Self::BinaryEncoding
                | Self::IpFamily
        )
    }

    /// Types built on the string type's length and pattern constraints
    pub const fn is_string_based(&self) -> bool {
        matches!(
            self,
            Self::String
                | Self::Email
                | Self::Url
                | Self::FilePath
                | Self::Json
                | Self::Markdown
                | Self::Cron
                | Self::RegularExpression
                | Self::Color
                | Self::MessageCode
                | Self::MetamodelAlias
                | Self::Uuid
                | Self::Password
                | Self::PasswordHash
                | Self::SemanticVersion
                | Self::IpAddress
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use serde_json::json;

    #[test]
    fn test_every_alias_round_trips() {
        for t in BuiltinType::ALL {
            assert_eq!(BuiltinType::from_alias(t.alias()), Some(*t));
            assert_eq!(BuiltinType::from_alias(&t.qualified_name()), Some(*t));
        }
        assert_eq!(BuiltinType::from_alias("datetime"), Some(BuiltinType::DateTime));
        assert_eq!(BuiltinType::from_alias("Quantity"), None);
    }

    #[test]
    fn test_instances_report_their_alias() {
        for t in BuiltinType::ALL {
            let instance = t.instantiate(None, TypeContext::default()).unwrap();
            assert_eq!(instance.alias(), t.alias());
        }
    }

    #[test]
    fn test_instantiate_applies_configuration() {
        let t = BuiltinType::Integer
            .instantiate(Some(&json!({"min": 1, "max": 3})), TypeContext::default())
            .unwrap();
        assert!(t.parse(&Value::from(2)).is_ok());
        assert!(t.parse(&Value::from(4)).is_err());
    }

    #[test]
    fn test_categories() {
        assert!(BuiltinType::Price.is_numeric());
        assert!(BuiltinType::Timestamp.is_temporal());
        assert!(BuiltinType::IpFamily.is_enumeration());
        assert!(BuiltinType::Email.is_string_based());
        assert!(!BuiltinType::Binary.is_string_based());
    }
}
