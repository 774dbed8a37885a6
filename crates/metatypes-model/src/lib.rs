//! Collaborator contracts for the data type pipeline
//!
//! Data types never reach into global state. Everything they consume from the
//! surrounding platform is expressed as a trait here and injected:
//! - [`Translator`] for labels and localized messages
//! - [`LocaleContext`] for the session and default locale
//! - [`SecretStore`] for installation-scoped variables (the encryption secret)

pub mod locale;
pub mod secrets;
pub mod translator;

pub use locale::{LocaleContext, StaticLocale, DEFAULT_LOCALE};
pub use secrets::{FileSecretStore, MemorySecretStore, SecretStore, SecretStoreError};
pub use translator::{KeyTranslator, MapTranslator, Translator};
