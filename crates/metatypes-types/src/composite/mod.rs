//! Types wrapping or combining other values
//!
//! [`ListDataType`] and [`EncryptedDataType`] delegate to a nested type that
//! is resolved through the context's [`TypeResolver`](crate::TypeResolver)
//! the first time it is needed.

pub mod binary;
mod encrypted;
mod list;

pub use binary::{BinaryDataType, BinaryEncoding};
pub use encrypted::{EncryptedDataType, EncryptionKeyProvider, DEFAULT_MARKER, SECRET_VARIABLE};
pub use list::{display_delimiter, split_items, ListDataType, DEFAULT_DELIMITER};

use crate::enums::FixedEnumDataType;

pub type BinaryEncodingDataType = FixedEnumDataType<BinaryEncoding>;
