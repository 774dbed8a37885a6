//! Collaborators injected into data type instances

use crate::composite::EncryptionKeyProvider;
use crate::DataType;
use chrono::{Local, NaiveDate, NaiveDateTime};
use metatypes_diagnostics::Result;
use metatypes_model::{KeyTranslator, LocaleContext, StaticLocale, Translator};
use std::fmt;
use std::sync::Arc;

/// Resolves a type identifier to a configured data type instance.
///
/// Used by composite types to instantiate their nested/inner type.
pub trait TypeResolver: Send + Sync {
    fn resolve(&self, alias: &str, uxon: Option<&serde_json::Value>) -> Result<Arc<dyn DataType>>;
}

/// Source of "now" for relative temporal values
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Clock {
    /// Local wall clock
    #[default]
    System,
    /// Frozen instant
    Fixed(NaiveDateTime),
}

impl Clock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Clock::System => Local::now().naive_local(),
            Clock::Fixed(at) => *at,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Everything a data type consumes from its surroundings
#[derive(Clone)]
pub struct TypeContext {
    pub translator: Arc<dyn Translator>,
    pub locale: Arc<dyn LocaleContext>,
    pub resolver: Option<Arc<dyn TypeResolver>>,
    /// Symmetric secret of encrypted values
    pub keys: Option<Arc<EncryptionKeyProvider>>,
    pub clock: Clock,
}

impl TypeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_locale(mut self, locale: Arc<dyn LocaleContext>) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn TypeResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_keys(mut self, keys: Arc<EncryptionKeyProvider>) -> Self {
        self.keys = Some(keys);
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Translate a key with an English fallback
    pub fn text(&self, key: &str, fallback: &str, placeholders: &[(&str, &str)]) -> String {
        self.translator.translate_or(key, fallback, placeholders)
    }
}

impl Default for TypeContext {
    fn default() -> Self {
        Self {
            translator: Arc::new(KeyTranslator),
            locale: Arc::new(StaticLocale::default()),
            resolver: None,
            keys: None,
            clock: Clock::System,
        }
    }
}

impl fmt::Debug for TypeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeContext")
            .field("locale", &self.locale.session_locale())
            .field("resolver", &self.resolver.is_some())
            .field("keys", &self.keys.is_some())
            .field("clock", &self.clock)
            .finish()
    }
}
