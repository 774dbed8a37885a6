use super::{input_text, locale_pattern, parse_with_display_pattern, resolve, DisplayPattern, DATE_FORMAT};
use crate::context::Clock;
use crate::contract::{cast_error, DataType, TypeMeta};
use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime};
use metatypes_diagnostics::{Result, DT0005};
use serde::Deserialize;

/// Cast relative to a given "now"
pub fn cast_at(value: &Value, now: NaiveDateTime) -> Result<Value> {
    let Some(token) = input_text(value, "a date")? else {
        return Ok(Value::Null);
    };
    resolve(&token, now)
        .map(|(at, _)| Value::String(at.format(DATE_FORMAT).to_string()))
        .ok_or_else(|| cast_error(DT0005, value, "a date"))
}

/// Canonical `YYYY-MM-DD`, relative forms resolved against the wall clock
pub fn cast(value: &Value) -> Result<Value> {
    cast_at(value, Clock::System.now())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DateDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    /// Display pattern, e.g. `dd.MM.yyyy`; the locale's when unset
    pub format: Option<String>,
}

impl DateDataType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, pattern: impl Into<String>) -> Self {
        self.format = Some(pattern.into());
        self
    }

    pub fn display_pattern(&self) -> Result<DisplayPattern> {
        locale_pattern(
            self.context(),
            self.format.as_deref(),
            "LOCALIZATION.DATE.DATE_FORMAT",
            |(date, _)| date.to_string(),
        )
    }
}

impl DataType for DateDataType {
    crate::data_type_basics!("Date");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast_at(value, self.context().clock.now())
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        parse_with_display_pattern(self, value, self.display_pattern(), |at| {
            Value::String(at.format(DATE_FORMAT).to_string())
        })
    }

    fn format(&self, value: &Value) -> String {
        let rendered = self.cast(value).ok().and_then(|cast| {
            let date = NaiveDate::parse_from_str(cast.as_str()?, DATE_FORMAT).ok()?;
            let pattern = self.display_pattern().ok()?;
            Some(pattern.format(&date.and_hms_opt(0, 0, 0)?, &self.context().locale.language()))
        });
        rendered.unwrap_or_else(|| value.to_plain_string())
    }

    fn validation_description(&self) -> String {
        match self.display_pattern() {
            Ok(pattern) => format!("date ({})", pattern.as_str()),
            Err(_) => "date".to_string(),
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
