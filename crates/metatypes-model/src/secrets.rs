//! Installation-scoped variable storage
//!
//! Used by the encrypted data type to persist its symmetric secret.

use indexmap::IndexMap;
use log::debug;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Secret store error
#[derive(Debug, thiserror::Error)]
pub enum SecretStoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Corrupt variable file {path}: {message}")]
    Corrupt { path: PathBuf, message: String },
}

/// Durable variable storage scoped to one installation
pub trait SecretStore: Send + Sync {
    /// Read a variable; `None` if it was never set
    fn get_variable(&self, name: &str) -> Result<Option<String>, SecretStoreError>;

    /// Write (or overwrite) a variable
    fn set_variable(&self, name: &str, value: &str) -> Result<(), SecretStoreError>;

    /// Write `value` only if the variable is unset and return the value that
    /// is stored afterwards. The first writer wins; later callers get the
    /// winner's value back.
    fn set_variable_if_absent(&self, name: &str, value: &str) -> Result<String, SecretStoreError> {
        if let Some(existing) = self.get_variable(name)? {
            return Ok(existing);
        }
        self.set_variable(name, value)?;
        Ok(value.to_string())
    }
}

/// Process-local store, mostly for tests
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    vars: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemorySecretStore {
    fn get_variable(&self, name: &str) -> Result<Option<String>, SecretStoreError> {
        Ok(self.vars.read().get(name).cloned())
    }

    fn set_variable(&self, name: &str, value: &str) -> Result<(), SecretStoreError> {
        self.vars.write().insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_variable_if_absent(&self, name: &str, value: &str) -> Result<String, SecretStoreError> {
        let mut vars = self.vars.write();
        Ok(vars
            .entry(name.to_string())
            .or_insert_with(|| value.to_string())
            .clone())
    }
}

/// Store backed by a JSON object file (`{"name": "value", ...}`).
///
/// Writes go to a sibling temp file which is then renamed over the original,
/// so readers never observe a half-written file.
#[derive(Debug)]
pub struct FileSecretStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<IndexMap<String, String>, SecretStoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(IndexMap::new()),
            Err(source) => {
                return Err(SecretStoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(IndexMap::new());
        }
        serde_json::from_str(&content).map_err(|e| SecretStoreError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn store(&self, vars: &IndexMap<String, String>) -> Result<(), SecretStoreError> {
        let io_err = |source| SecretStoreError::Io {
            path: self.path.clone(),
            source,
        };
        let json = serde_json::to_string_pretty(vars).map_err(|e| SecretStoreError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        debug!("Persisted {} variable(s) to {}", vars.len(), self.path.display());
        Ok(())
    }
}

impl SecretStore for FileSecretStore {
    fn get_variable(&self, name: &str) -> Result<Option<String>, SecretStoreError> {
        Ok(self.load()?.get(name).cloned())
    }

    fn set_variable(&self, name: &str, value: &str) -> Result<(), SecretStoreError> {
        let _guard = self.write_lock.lock();
        let mut vars = self.load()?;
        vars.insert(name.to_string(), value.to_string());
        self.store(&vars)
    }

    fn set_variable_if_absent(&self, name: &str, value: &str) -> Result<String, SecretStoreError> {
        let _guard = self.write_lock.lock();
        let mut vars = self.load()?;
        if let Some(existing) = vars.get(name) {
            return Ok(existing.clone());
        }
        vars.insert(name.to_string(), value.to_string());
        self.store(&vars)?;
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_first_writer_wins() {
        let store = MemorySecretStore::new();
        assert_eq!(store.set_variable_if_absent("KEY", "a").unwrap(), "a");
        assert_eq!(store.set_variable_if_absent("KEY", "b").unwrap(), "a");
        assert_eq!(store.get_variable("KEY").unwrap().as_deref(), Some("a"));
    }

    #[test]
    fn test_missing_variable_is_none() {
        let store = MemorySecretStore::new();
        assert!(store.get_variable("NOPE").unwrap().is_none());
    }
}
