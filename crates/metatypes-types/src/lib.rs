//! Metamodel data types
//!
//! Every value of the metamodel passes through a data type that knows how to
//! normalize it (`cast`), check it against the instance configuration
//! (`parse`), tell whether it is acceptable (`validate`) and render it for
//! humans (`format`). This crate provides:
//!
//! - **Scalars**: Boolean, Number and its Integer/Percent/Price/ByteSize/Hexadecimal variants
//! - **Strings**: String plus Email, Url, FilePath, Json, Markdown, Cron, Color,
//!   RegularExpression, UUID, Password and friends
//! - **Temporal**: Date, DateTime, Time, Timestamp with relative and short
//!   input forms and locale display patterns
//! - **Enumerations**: fixed Rust enums and configurable value/label maps
//! - **Composites**: List, Encrypted, Binary
//! - **Validators**: IP addresses and ranges, semantic versions and constraints
//!
//! # Example
//!
//! ```ignore
//! use metatypes_types::{Configurable, DataType, DateDataType, Value};
//!
//! let date = DateDataType::from_uxon(&serde_json::json!({"format": "dd.MM.yyyy"}))?;
//! assert_eq!(date.parse(&Value::from("24.12.2024"))?, Value::from("2024-12-24"));
//! assert_eq!(date.format(&Value::from("2024-12-24")), "24.12.2024");
//! ```
//!
//! # Collaborators
//!
//! Instances hold a [`TypeContext`] with the translator, locale, type
//! resolver, encryption keys and clock they work with. Nothing is global:
//! a type configured without a context uses English fallbacks and the wall
//! clock.

pub mod boolean;
pub mod catalog;
pub mod comparator;
pub mod composite;
pub mod context;
pub mod contract;
pub mod enums;
pub mod generic;
pub mod number;
pub mod string;
pub mod temporal;
pub mod validators;
pub mod value;

// Re-export main types
pub use boolean::BooleanDataType;
pub use catalog::BuiltinType;
pub use comparator::{Comparator, ComparatorDataType};
pub use composite::{
    BinaryDataType, BinaryEncoding, EncryptedDataType, EncryptionKeyProvider, ListDataType,
};
pub use context::{Clock, TypeContext, TypeResolver};
pub use contract::{Configurable, DataType, TypeMeta};
pub use enums::{EnumDataType, Enumeration, FixedEnum, FixedEnumDataType, LocaleDataType, SortingDirection};
pub use generic::AnyDataType;
pub use number::{
    ByteSizeDataType, HexadecimalDataType, IntegerDataType, NumberDataType, PercentDataType,
    PriceDataType,
};
pub use string::{PasswordDataType, StringDataType};
pub use temporal::{DateDataType, DateTimeDataType, TimeDataType, TimestampDataType};
pub use validators::{IpAddressDataType, SemanticVersionDataType, VersionConstraint};
pub use value::Value;

pub use metatypes_diagnostics::{DataTypeError, ErrorCode, ErrorKind, Result};
