use super::{input_text, locale_pattern, parse_with_display_pattern, resolve, DisplayPattern, DATETIME_FORMAT};
use crate::context::{Clock, TypeContext};
use crate::contract::{cast_error, DataType, TypeMeta};
use crate::value::Value;
use chrono::NaiveDateTime;
use metatypes_diagnostics::{Result, DT0007};
use serde::Deserialize;

pub fn cast_at(value: &Value, now: NaiveDateTime) -> Result<Value> {
    let Some(token) = input_text(value, "a date and time")? else {
        return Ok(Value::Null);
    };
    resolve(&token, now)
        .map(|(at, _)| Value::String(at.format(DATETIME_FORMAT).to_string()))
        .ok_or_else(|| cast_error(DT0007, value, "a date and time"))
}

/// Canonical `YYYY-MM-DD HH:MM:SS`; relative forms keep the time of day
pub fn cast(value: &Value) -> Result<Value> {
    cast_at(value, Clock::System.now())
}

pub(crate) fn display_pattern(
    context: &TypeContext,
    explicit: Option<&str>,
    show_seconds: bool,
) -> Result<DisplayPattern> {
    locale_pattern(
        context,
        explicit,
        "LOCALIZATION.DATE.DATETIME_FORMAT",
        |(date, time)| {
            if show_seconds {
                format!("{} {}", date, time.replace("mm", "mm:ss"))
            } else {
                format!("{} {}", date, time)
            }
        },
    )
}

/// Render a canonical date-time with the given pattern; `None` if `canonical`
/// is not in canonical form
pub(crate) fn format_canonical(
    context: &TypeContext,
    pattern: &DisplayPattern,
    canonical: &Value,
) -> Option<String> {
    let at = NaiveDateTime::parse_from_str(canonical.as_str()?, DATETIME_FORMAT).ok()?;
    Some(pattern.format(&at, &context.locale.language()))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DateTimeDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    /// Display pattern, e.g. `dd.MM.yyyy HH:mm`; the locale's when unset
    pub format: Option<String>,
    /// Include seconds in the locale's display pattern
    pub show_seconds: bool,
}

impl DateTimeDataType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, pattern: impl Into<String>) -> Self {
        self.format = Some(pattern.into());
        self
    }

    pub fn with_seconds(mut self, show: bool) -> Self {
        self.show_seconds = show;
        self
    }

    pub fn display_pattern(&self) -> Result<DisplayPattern> {
        display_pattern(self.context(), self.format.as_deref(), self.show_seconds)
    }
}

impl DataType for DateTimeDataType {
    crate::data_type_basics!("DateTime");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast_at(value, self.context().clock.now())
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        parse_with_display_pattern(self, value, self.display_pattern(), |at| {
            Value::String(at.format(DATETIME_FORMAT).to_string())
        })
    }

    fn format(&self, value: &Value) -> String {
        let rendered = self.cast(value).ok().and_then(|cast| {
            let pattern = self.display_pattern().ok()?;
            format_canonical(self.context(), &pattern, &cast)
        });
        rendered.unwrap_or_else(|| value.to_plain_string())
    }

    fn validation_description(&self) -> String {
        match self.display_pattern() {
            Ok(pattern) => format!("date and time ({})", pattern.as_str()),
            Err(_) => "date and time".to_string(),
        }
    }

    fn check_configuration(&self) -> Result<()> {
        if let Some(pattern) = &self.format {
            DisplayPattern::compile(pattern)?;
        }
        Ok(())
    }

    fn default_widget_type(&self) -> &'static str {
        "DisplayDate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::Configurable;
    use chrono::NaiveDate;
    use metatypes_model::StaticLocale;
    use rstest::rstest;
    use std::sync::Arc;

    fn datetime_type(locale: &str) -> DateTimeDataType {
        let now = NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(16, 45, 12)
            .unwrap();
        DateTimeDataType::new().with_context(
            TypeContext::default()
                .with_clock(Clock::Fixed(now))
                .with_locale(Arc::new(StaticLocale::new(locale))),
        )
    }

    #[rstest]
    #[case("now", "2024-01-31 16:45:12")]
    #[case("+1m", "2024-02-29 16:45:12")]
    #[case("-1d", "2024-01-30 16:45:12")]
    #[case("24.12.", "2024-12-24 00:00:00")]
    #[case("2024-01-05T13:45", "2024-01-05 13:45:00")]
    #[case("05.01.2024 13:45", "2024-01-05 13:45:00")]
    fn test_cast(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(
            datetime_type("de_DE").cast(&Value::from(input)).unwrap(),
            Value::from(expected)
        );
    }

    #[test]
    fn test_format_per_locale() {
        let value = Value::from("2024-01-05 13:45:10");
        assert_eq!(datetime_type("de_DE").format(&value), "05.01.2024 13:45");
        assert_eq!(datetime_type("en_US").format(&value), "1/5/2024 1:45 PM");
        assert_eq!(
            datetime_type("de_DE").with_seconds(true).format(&value),
            "05.01.2024 13:45:10"
        );
    }

    #[test]
    fn test_parse_accepts_display_format() {
        let t = datetime_type("en_US");
        assert_eq!(
            t.parse(&Value::from("1/5/2024 1:45 PM")).unwrap(),
            Value::from("2024-01-05 13:45:00")
        );
        let err = t.parse(&Value::from("half past noon")).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.code(), DT0007);
    }
}
