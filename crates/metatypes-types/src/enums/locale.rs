//! Locale selection: the session and default locales plus configured ones

use super::fixed::format_label;
use super::{EnumDataType, Enumeration};
use crate::context::TypeContext;
use crate::contract::{DataType, TypeMeta};
use crate::value::Value;
use indexmap::IndexMap;
use metatypes_diagnostics::Result;
use once_cell::sync::OnceCell;
use serde::Deserialize;

const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("cs", "Czech"),
    ("da", "Danish"),
    ("de", "German"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("it", "Italian"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("sv", "Swedish"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
];

/// Display name of a locale such as `de_DE` -> `German (DE)`
pub fn locale_label(context: &TypeContext, locale: &str) -> String {
    let (language, region) = match locale.split_once(['_', '-']) {
        Some((language, region)) => (language, Some(region)),
        None => (locale, None),
    };
    let fallback = LANGUAGE_NAMES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(language))
        .map_or(language, |(_, name)| *name);
    let name = context.text(
        &format!("LOCALIZATION.LANGUAGE.{}", language.to_uppercase()),
        fallback,
        &[],
    );
    match region {
        Some(region) => format!("{} ({})", name, region.to_uppercase()),
        None => name,
    }
}

/// Enumeration of locales, seeded with the session and default locale
/// before the configured `values` are merged in
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LocaleDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    /// Additional locales and optional labels; empty labels are derived
    values: IndexMap<String, String>,
    pub show_values: bool,
    #[serde(skip)]
    resolved: OnceCell<EnumDataType>,
}

impl LocaleDataType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K, L>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: Into<String>,
    {
        self.values = values
            .into_iter()
            .map(|(k, l)| (k.into(), l.into()))
            .collect();
        self.resolved = OnceCell::new();
        self
    }

    fn enumeration(&self) -> &EnumDataType {
        self.resolved.get_or_init(|| {
            let context = self.context();
            let session = context.locale.session_locale();
            let default = context.locale.default_locale();

            let mut seeded = EnumDataType::new();
            seeded.meta = self.meta.clone();
            seeded.show_values = self.show_values;
            seeded.set_values([
                (session.clone(), locale_label(context, &session)),
                (default.clone(), locale_label(context, &default)),
            ]);
            seeded.merge_values(self.values.iter().map(|(locale, label)| {
                let label = if label.is_empty() {
                    locale_label(context, locale)
                } else {
                    label.clone()
                };
                (locale.clone(), label)
            }));
            seeded
        })
    }
}

impl Enumeration for LocaleDataType {
    fn values(&self) -> Vec<Value> {
        self.enumeration().values()
    }

    fn labels(&self) -> &IndexMap<String, String> {
        self.enumeration().labels()
    }

    fn value_of(&self, key: &str) -> Result<Value> {
        self.enumeration().value_of(key)
    }
}

impl DataType for LocaleDataType {
    crate::data_type_basics!("Locale");

    fn cast(&self, value: &Value) -> Result<Value> {
        self.enumeration().cast(value)
    }

    fn format(&self, value: &Value) -> String {
        format_label(self, self.show_values, value)
    }

    fn default_widget_type(&self) -> &'static str {
        "InputSelect"
    }
}
