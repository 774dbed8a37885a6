//! Creating configured data types by alias

use indexmap::IndexMap;
use log::debug;
use metatypes_diagnostics::{DataTypeError, Result, DT0300, DT0301};
use metatypes_types::{BuiltinType, DataType, TypeContext, TypeResolver};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

/// A named, preconfigured data type
#[derive(Debug, Clone)]
struct Preset {
    base: BuiltinType,
    uxon: serde_json::Value,
}

/// Resolves type aliases to configured instances.
///
/// Knows every [`BuiltinType`] plus presets registered under their own alias
/// (e.g. `"OrderNumber"` as a `String` with a validator regex). Instances it
/// creates carry the registry as their [`TypeResolver`], so lists and
/// encrypted types find their nested types here too.
pub struct TypeRegistry {
    context: TypeContext,
    presets: RwLock<IndexMap<String, Preset>>,
    this: Weak<TypeRegistry>,
}

impl TypeRegistry {
    /// Registry whose instances share `context`
    pub fn new(context: TypeContext) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            context,
            presets: RwLock::new(IndexMap::new()),
            this: this.clone(),
        })
    }

    pub fn with_defaults() -> Arc<Self> {
        Self::new(TypeContext::default())
    }

    /// Register `alias` as `base` configured with `uxon`
    pub fn register(
        &self,
        alias: impl Into<String>,
        base: &str,
        uxon: serde_json::Value,
    ) -> Result<()> {
        let alias = alias.into();
        if !uxon.is_object() && !uxon.is_null() {
            return Err(DataTypeError::configuration(
                DT0300,
                format!("Configuration of {} must be an object", alias),
            ));
        }
        let base = self.builtin(base)?;
        debug!("Registering data type {} based on {}", alias, base.alias());
        self.presets
            .write()
            .insert(alias.to_lowercase(), Preset { base, uxon });
        Ok(())
    }

    /// Configured instance of `alias`; `uxon` overrides preset properties
    pub fn create(&self, alias: &str, uxon: Option<&serde_json::Value>) -> Result<Arc<dyn DataType>> {
        let preset = self.presets.read().get(&alias.trim().to_lowercase()).cloned();
        let (base, config) = match preset {
            Some(preset) => (preset.base, merge(preset.uxon, uxon)),
            None => (self.builtin(alias)?, uxon.cloned().unwrap_or_default()),
        };
        debug!("Creating data type {} as {}", alias, base.alias());
        base.instantiate(Some(&config), self.instance_context())
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.presets.read().contains_key(&alias.trim().to_lowercase())
            || BuiltinType::from_alias(alias).is_some()
    }

    /// Every alias this registry resolves, built-ins first
    pub fn aliases(&self) -> Vec<String> {
        BuiltinType::ALL
            .iter()
            .map(|t| t.alias().to_string())
            .chain(self.presets.read().keys().cloned())
            .collect()
    }

    fn builtin(&self, alias: &str) -> Result<BuiltinType> {
        BuiltinType::from_alias(alias).ok_or_else(|| {
            DataTypeError::configuration(DT0301, format!("Unknown data type \"{}\"", alias))
        })
    }

    fn instance_context(&self) -> TypeContext {
        match self.this.upgrade() {
            Some(this) => self.context.clone().with_resolver(this),
            None => self.context.clone(),
        }
    }
}

impl TypeResolver for TypeRegistry {
    fn resolve(&self, alias: &str, uxon: Option<&serde_json::Value>) -> Result<Arc<dyn DataType>> {
        self.create(alias, uxon)
    }
}

fn merge(preset: serde_json::Value, overrides: Option<&serde_json::Value>) -> serde_json::Value {
    match (preset, overrides) {
        (serde_json::Value::Object(mut base), Some(serde_json::Value::Object(over))) => {
            for (key, value) in over {
                base.insert(key.clone(), value.clone());
            }
            serde_json::Value::Object(base)
        }
        (preset, None) => preset,
        (_, Some(over)) => over.clone(),
    }
}
