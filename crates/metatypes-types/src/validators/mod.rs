//! Validators for network addresses and version strings

pub mod ip;
pub mod semver;

pub use ip::{IpAddressDataType, IpFamily};
pub use semver::{SemanticVersionDataType, VersionConstraint};

use crate::enums::FixedEnumDataType;

pub type IpFamilyDataType = FixedEnumDataType<IpFamily>;
