//! CLI functionality for the metatypes tool
//!
//! - running values through a data type (`cast`, `parse`, `format`)
//! - IP range checks
//! - semantic version selection
//! - output formatting

pub mod network;
pub mod output;
pub mod values;
pub mod versions;
