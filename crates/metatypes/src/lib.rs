//! Metamodel data types for Rust
//!
//! This crate bundles the data type pipeline:
//! - the error taxonomy ([`diagnostics`])
//! - the collaborator contracts: translator, locale, secret store ([`model`])
//! - the data types themselves ([`types`])
//! - a [`TypeRegistry`] that creates configured types by alias
//!
//! # Example
//!
//! ```ignore
//! use metatypes::{TypeRegistry, Value};
//!
//! let registry = TypeRegistry::with_defaults();
//! let list = registry.create("List", Some(&serde_json::json!({"value_type": "Integer"})))?;
//! assert_eq!(list.parse(&Value::from("1, 2,3"))?, Value::from("1,2,3"));
//! ```

// Re-export all public APIs from internal crates
pub use metatypes_diagnostics as diagnostics;
pub use metatypes_model as model;
pub use metatypes_types as types;

// Convenience re-exports
pub use metatypes_diagnostics::{DataTypeError, ErrorCode, ErrorKind, Result};
pub use metatypes_types::{BuiltinType, Configurable, DataType, TypeContext, Value};

pub mod registry;

pub use registry::TypeRegistry;

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
