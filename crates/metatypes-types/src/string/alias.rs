//! Namespaced metamodel aliases such as `vendor.app.OBJECT_ALIAS`

use super::regex::StaticRegex;
use super::{parse_constrained, StringConstraints};
use crate::contract::{DataType, TypeMeta};
use crate::value::Value;
use metatypes_diagnostics::{describe_value, DataTypeError, Result, DT0028};
use serde::Deserialize;

static ALIAS: StaticRegex =
    StaticRegex::new(r"^[A-Za-z_][A-Za-z0-9_\-]*(?:\.[A-Za-z_][A-Za-z0-9_\-]*)*$");

pub const NAMESPACE_SEPARATOR: char = '.';

pub fn is_alias(value: &str) -> bool {
    ALIAS.is_match(value)
}

/// Everything before the last separator
pub fn find_namespace(alias: &str) -> Option<&str> {
    alias.rsplit_once(NAMESPACE_SEPARATOR).map(|(ns, _)| ns)
}

/// The alias without its namespace
pub fn strip_namespace(alias: &str) -> &str {
    alias
        .rsplit_once(NAMESPACE_SEPARATOR)
        .map_or(alias, |(_, local)| local)
}

pub fn cast(value: &Value) -> Result<Value> {
    let cast = super::cast(value)?;
    let Value::String(s) = &cast else {
        return Ok(cast);
    };
    let trimmed = s.trim();
    if trimmed.is_empty() || is_alias(trimmed) {
        return Ok(Value::string(trimmed));
    }
    Err(DataTypeError::casting(
        DT0028,
        format!("{} is not a valid metamodel alias", describe_value(s, false)),
    ))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetamodelAliasDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub constraints: StringConstraints,
}

impl DataType for MetamodelAliasDataType {
    crate::data_type_basics!("MetamodelAlias");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast(value)
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        parse_constrained(self, &self.constraints, value)
    }

    fn check_configuration(&self) -> Result<()> {
        self.constraints.check_configuration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ORDER", true)]
    #[case("vendor.app.ORDER_POS", true)]
    #[case("my-vendor.app", true)]
    #[case("vendor..app", false)]
    #[case(".app", false)]
    #[case("vendor.1app", false)]
    #[case("with space", false)]
    fn test_is_alias(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_alias(input), expected);
    }

    #[test]
    fn test_namespace_helpers() {
        assert_eq!(find_namespace("vendor.app.ORDER"), Some("vendor.app"));
        assert_eq!(find_namespace("ORDER"), None);
        assert_eq!(strip_namespace("vendor.app.ORDER"), "ORDER");
    }
}
