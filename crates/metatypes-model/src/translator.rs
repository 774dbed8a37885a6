//! Translation lookup used for enumeration labels and validation hints

use indexmap::IndexMap;
use metatypes_diagnostics::DataTypeError;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Translation service
///
/// Implementations must tolerate missing keys: `translate` returns the key
/// itself when no translation exists and never fails.
pub trait Translator: Send + Sync {
    /// Translate a key, substituting `%name%` placeholders
    fn translate(&self, key: &str, placeholders: &[(&str, &str)]) -> String;

    /// Whether a translation exists for the key
    fn has_translation(&self, key: &str) -> bool;

    /// Translate a key, or return `fallback` (with placeholders applied) when missing
    fn translate_or(&self, key: &str, fallback: &str, placeholders: &[(&str, &str)]) -> String {
        if self.has_translation(key) {
            self.translate(key, placeholders)
        } else {
            apply_placeholders(fallback, placeholders)
        }
    }

    /// Localized message for a data type error.
    ///
    /// Looks up `ERROR.<code>` and falls back to the error's own message.
    fn translate_error(&self, error: &DataTypeError) -> String {
        let key = format!("ERROR.{}", error.code());
        self.translate_or(&key, error.message(), &[])
    }
}

/// Replace `%name%` placeholders in a template
pub fn apply_placeholders(template: &str, placeholders: &[(&str, &str)]) -> String {
    placeholders
        .iter()
        .fold(template.to_string(), |acc, (name, value)| {
            acc.replace(&format!("%{}%", name), value)
        })
}

/// Translator without any dictionary; every key translates to itself
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyTranslator;

impl Translator for KeyTranslator {
    fn translate(&self, key: &str, placeholders: &[(&str, &str)]) -> String {
        apply_placeholders(key, placeholders)
    }

    fn has_translation(&self, _key: &str) -> bool {
        false
    }
}

/// In-memory dictionary translator
#[derive(Debug, Default)]
pub struct MapTranslator {
    messages: RwLock<HashMap<String, String>>,
}

impl MapTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a translator from `(key, text)` pairs
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let messages = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            messages: RwLock::new(messages),
        }
    }

    /// Load a flat JSON object of `key: text` pairs
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let messages: IndexMap<String, String> = serde_json::from_str(json)?;
        Ok(Self {
            messages: RwLock::new(messages.into_iter().collect()),
        })
    }

    pub fn insert(&self, key: impl Into<String>, text: impl Into<String>) {
        self.messages.write().insert(key.into(), text.into());
    }
}

impl Translator for MapTranslator {
    fn translate(&self, key: &str, placeholders: &[(&str, &str)]) -> String {
        match self.messages.read().get(key) {
            Some(text) => apply_placeholders(text, placeholders),
            None => key.to_string(),
        }
    }

    fn has_translation(&self, key: &str) -> bool {
        self.messages.read().contains_key(key)
    }
}
