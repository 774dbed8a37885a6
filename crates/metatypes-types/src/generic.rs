use crate::contract::{DataType, TypeMeta};
use crate::value::Value;
use metatypes_diagnostics::Result;
use serde::Deserialize;

/// Base type accepting any value unchanged; the default nested type of lists
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnyDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
}

impl DataType for AnyDataType {
    crate::data_type_basics!("Any");

    fn cast(&self, value: &Value) -> Result<Value> {
        Ok(value.clone())
    }
}
