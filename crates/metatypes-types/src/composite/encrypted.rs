//! Transparent encryption of values of any other type
//!
//! Stored values look like `$$~~<base64(nonce || ciphertext)>` where the
//! cipher is XChaCha20-Poly1305 with a fresh 24-byte nonce per call. The
//! 32-byte secret lives in the installation's [`SecretStore`] under
//! [`SECRET_VARIABLE`]; it is generated on first use and losing it makes
//! every stored value unreadable.

use crate::contract::{DataType, TypeMeta};
use crate::string::StringDataType;
use crate::value::Value;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use log::{debug, warn};
use metatypes_diagnostics::{
    describe_value, DataTypeError, ErrorKind, Result, DT0111, DT0200, DT0201, DT0202, DT0203,
    DT0300, DT0303,
};
use metatypes_model::{SecretStore, SecretStoreError};
use once_cell::sync::OnceCell;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_MARKER: &str = "$$~~";
pub const SECRET_VARIABLE: &str = "ENCRYPTION_SECRET";

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 24;

fn store_error(err: SecretStoreError) -> DataTypeError {
    DataTypeError::encryption(DT0203, format!("Secret store unavailable: {}", err))
}

/// Lazily loads (or generates and persists) the installation's secret.
///
/// Concurrent first use is settled by the store: the first secret written
/// wins and every provider adopts it.
pub struct EncryptionKeyProvider {
    store: Arc<dyn SecretStore>,
    key: OnceCell<Key>,
}

impl EncryptionKeyProvider {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self {
            store,
            key: OnceCell::new(),
        }
    }

    pub fn key(&self) -> Result<&Key> {
        self.key.get_or_try_init(|| {
            let encoded = match self.store.get_variable(SECRET_VARIABLE).map_err(store_error)? {
                Some(existing) => existing,
                None => {
                    let mut fresh = [0u8; KEY_LEN];
                    OsRng.fill_bytes(&mut fresh);
                    debug!("Generating a new encryption secret");
                    self.store
                        .set_variable_if_absent(SECRET_VARIABLE, &STANDARD.encode(fresh))
                        .map_err(store_error)?
                }
            };
            let bytes = STANDARD.decode(encoded.trim()).map_err(|_| {
                DataTypeError::encryption(DT0202, "Stored encryption secret is not base64")
            })?;
            if bytes.len() != KEY_LEN {
                return Err(DataTypeError::encryption(
                    DT0202,
                    format!("Encryption secret must be {} bytes, found {}", KEY_LEN, bytes.len()),
                ));
            }
            debug!("Encryption secret loaded");
            Ok(*Key::from_slice(&bytes))
        })
    }

    /// `base64(nonce || ciphertext)`
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let cipher = XChaCha20Poly1305::new(self.key()?);
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        let sealed = cipher
            .encrypt(XNonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| DataTypeError::encryption(DT0200, "Encryption failed"))?;
        let mut payload = nonce.to_vec();
        payload.extend_from_slice(&sealed);
        Ok(STANDARD.encode(payload))
    }

    pub fn decrypt(&self, payload: &str) -> Result<String> {
        let tampered = || {
            warn!("Rejected encrypted value that failed authentication");
            DataTypeError::encryption(DT0201, "Encrypted value is corrupt or was tampered with")
        };
        let bytes = STANDARD.decode(payload.trim()).map_err(|_| tampered())?;
        if bytes.len() <= NONCE_LEN {
            return Err(tampered());
        }
        let (nonce, sealed) = bytes.split_at(NONCE_LEN);
        let cipher = XChaCha20Poly1305::new(self.key()?);
        let plain = cipher
            .decrypt(XNonce::from_slice(nonce), sealed)
            .map_err(|_| tampered())?;
        String::from_utf8(plain).map_err(|_| tampered())
    }
}

impl fmt::Debug for EncryptionKeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionKeyProvider")
            .field("loaded", &self.key.get().is_some())
            .finish()
    }
}

/// Wraps an inner type; every value passing `cast` or `parse` comes out
/// encrypted, already encrypted input is decrypted and checked first.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EncryptedDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    /// Prefix of stored values; `$$~~` when unset
    pub marker: Option<String>,
    /// Alias of the wrapped type; `String` when unset
    pub inner_type: Option<String>,
    pub inner_type_uxon: Option<serde_json::Value>,
    #[serde(skip)]
    inner: OnceCell<Arc<dyn DataType>>,
}

impl EncryptedDataType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Wrap an already configured type
    pub fn with_inner_type(self, inner: Arc<dyn DataType>) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(inner);
        Self { inner: cell, ..self }
    }

    pub fn marker(&self) -> &str {
        self.marker.as_deref().unwrap_or(DEFAULT_MARKER)
    }

    pub fn inner_type(&self) -> Result<&Arc<dyn DataType>> {
        let inner = self.inner.get_or_try_init(|| {
            let Some(alias) = self.inner_type.as_deref() else {
                return Ok(Arc::new(StringDataType::default()) as Arc<dyn DataType>);
            };
            let resolver = self.context().resolver.as_ref().ok_or_else(|| {
                DataTypeError::configuration(
                    DT0300,
                    format!("Cannot resolve encrypted type {}: no type resolver", alias),
                )
                .with_type(self.name())
            })?;
            debug!("Resolving encrypted inner type {}", alias);
            resolver.resolve(alias, self.inner_type_uxon.as_ref())
        })?;
        if inner.alias() == self.alias() {
            return Err(nested_encryption());
        }
        Ok(inner)
    }

    fn keys(&self) -> Result<&EncryptionKeyProvider> {
        self.context().keys.as_deref().ok_or_else(|| {
            DataTypeError::encryption(DT0203, "No secret store configured for encrypted values")
        })
    }

    pub fn is_encrypted(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|s| s.starts_with(self.marker()))
    }

    /// Marker-prefixed ciphertext of a plain value
    pub fn encrypt(&self, plain: &Value) -> Result<Value> {
        if plain.is_null() {
            return Ok(Value::Null);
        }
        let payload = self.keys()?.encrypt(&plain.to_plain_string())?;
        Ok(Value::String(format!("{}{}", self.marker(), payload)))
    }

    /// Plain text of a stored value; values without the marker are
    /// returned as they are
    pub fn decrypt(&self, value: &Value) -> Result<Value> {
        match value.as_str().and_then(|s| s.strip_prefix(self.marker())) {
            Some(payload) => Ok(Value::String(self.keys()?.decrypt(payload)?)),
            None => Ok(value.clone()),
        }
    }

    /// Wrap a failure of the inner type. Failures on stored ciphertext
    /// carry neither the inner message nor its cause, both of which may echo
    /// the decrypted value.
    fn inner_error(&self, err: DataTypeError, stored: bool) -> DataTypeError {
        if err.kind() == ErrorKind::Configuration {
            return err;
        }
        let wrapped = if stored || err.is_sensitive() {
            DataTypeError::validation(
                DT0111,
                format!("Encrypted value is not valid: {}", describe_value("", true)),
            )
            .with_sensitive(true)
        } else {
            DataTypeError::validation(
                DT0111,
                format!("Encrypted value is not valid: {}", err.message()),
            )
            .with_cause(err)
        };
        self.to_validation_error(wrapped)
    }
}

fn nested_encryption() -> DataTypeError {
    DataTypeError::configuration(DT0303, "An encrypted type cannot wrap another encrypted type")
}

impl DataType for EncryptedDataType {
    crate::data_type_basics!("Encrypted");

    fn cast(&self, value: &Value) -> Result<Value> {
        let inner = self.inner_type()?;
        let stored = self.is_encrypted(value);
        let plain = self.decrypt(value)?;
        let cast = inner.cast(&plain).map_err(|e| self.inner_error(e, stored))?;
        self.encrypt(&cast)
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        let inner = self.inner_type()?;
        let stored = self.is_encrypted(value);
        let plain = self.decrypt(value)?;
        let parsed = inner.parse(&plain).map_err(|e| self.inner_error(e, stored))?;
        self.encrypt(&parsed)
    }

    fn format(&self, value: &Value) -> String {
        match (self.inner_type(), self.decrypt(value)) {
            (Ok(inner), Ok(plain)) => inner.format(&plain),
            _ => value.to_plain_string(),
        }
    }

    fn validation_description(&self) -> String {
        self.inner_type()
            .map(|inner| inner.validation_description())
            .unwrap_or_default()
    }

    fn check_configuration(&self) -> Result<()> {
        if self.inner_type.as_deref() == Some(self.alias()) {
            return Err(nested_encryption());
        }
        if self.marker().is_empty() {
            return Err(DataTypeError::configuration(
                DT0300,
                "The encryption marker must not be empty",
            ));
        }
        Ok(())
    }
}
