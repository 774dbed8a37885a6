//! Session and default locale

/// Locale used when nothing else is configured
pub const DEFAULT_LOCALE: &str = "en_US";

/// Source of the current session locale
pub trait LocaleContext: Send + Sync {
    /// Locale of the current user session (e.g. `de_DE`)
    fn session_locale(&self) -> String;

    /// Installation default locale
    fn default_locale(&self) -> String {
        DEFAULT_LOCALE.to_string()
    }

    /// Language part of the session locale (`de_DE` -> `de`)
    fn language(&self) -> String {
        let locale = self.session_locale();
        locale
            .split(['_', '-'])
            .next()
            .unwrap_or(DEFAULT_LOCALE)
            .to_lowercase()
    }
}

/// Fixed locale configuration
#[derive(Debug, Clone)]
pub struct StaticLocale {
    session: String,
    default: String,
}

impl StaticLocale {
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            default: DEFAULT_LOCALE.to_string(),
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }
}

impl Default for StaticLocale {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl LocaleContext for StaticLocale {
    fn session_locale(&self) -> String {
        self.session.clone()
    }

    fn default_locale(&self) -> String {
        self.default.clone()
    }
}
