use super::datetime::{self, display_pattern, format_canonical};
use super::{from_unix, parse_with_display_pattern, to_unix, DisplayPattern, DATETIME_FORMAT};
use crate::contract::{cast_error, DataType, TypeMeta};
use crate::value::Value;
use chrono::NaiveDateTime;
use metatypes_diagnostics::{DataTypeError, Result, DT0007, DT0300};
use serde::Deserialize;

/// Point in time exchanged as Unix time.
///
/// Stored in the same canonical form as `DateTime`. Numeric input is read
/// as Unix time divided by `multiplier` (e.g. `1000` for milliseconds).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimestampDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    pub format: Option<String>,
    pub show_seconds: bool,
    /// Units per second of numeric values; seconds when unset
    pub multiplier: Option<i64>,
}

impl TimestampDataType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_multiplier(mut self, multiplier: i64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    fn multiplier(&self) -> i64 {
        self.multiplier.filter(|m| *m > 0).unwrap_or(1)
    }

    pub fn display_pattern(&self) -> Result<DisplayPattern> {
        display_pattern(self.context(), self.format.as_deref(), self.show_seconds)
    }

    /// Unix time of a value, scaled by the multiplier
    pub fn to_unix(&self, value: &Value) -> Result<Option<i64>> {
        let Value::String(canonical) = self.parse(value)? else {
            return Ok(None);
        };
        let at = NaiveDateTime::parse_from_str(&canonical, DATETIME_FORMAT)
            .map_err(|_| cast_error(DT0007, value, "a timestamp"))?;
        Ok(Some(to_unix(&at) * self.multiplier()))
    }
}

impl DataType for TimestampDataType {
    crate::data_type_basics!("Timestamp");

    fn cast(&self, value: &Value) -> Result<Value> {
        if let Value::Integer(units) = value {
            return from_unix(units.div_euclid(self.multiplier()))
                .map(|at| Value::String(at.format(DATETIME_FORMAT).to_string()))
                .ok_or_else(|| cast_error(DT0007, value, "a timestamp"));
        }
        datetime::cast_at(value, self.context().clock.now())
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

    fn check_configuration(&self) -> Result<()> {
        if self.multiplier.is_some_and(|m| m <= 0) {
            return Err(DataTypeError::configuration(
                DT0300,
                "Timestamp multiplier must be positive",
            ));
        }
        if let Some(pattern) = &self.format {
            DisplayPattern::compile(pattern)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::Configurable;
    use serde_json::json;

    #[test]
    fn test_numeric_input_uses_multiplier() {
        let seconds = TimestampDataType::new();
        assert_eq!(
            seconds.cast(&Value::Integer(1_700_000_000)).unwrap(),
            Value::from("2023-11-14 22:13:20")
        );
        let millis = TimestampDataType::new().with_multiplier(1000);
        assert_eq!(
            millis.cast(&Value::Integer(1_700_000_000_000)).unwrap(),
            Value::from("2023-11-14 22:13:20")
        );
    }

    #[test]
    fn test_to_unix() {
        let millis = TimestampDataType::new().with_multiplier(1000);
        assert_eq!(
            millis.to_unix(&Value::from("2023-11-14 22:13:20")).unwrap(),
            Some(1_700_000_000_000)
        );
        assert_eq!(millis.to_unix(&Value::Null).unwrap(), None);
    }

    #[test]
    fn test_string_input_follows_datetime_rules() {
        let t = TimestampDataType::new();
        assert_eq!(
            t.cast(&Value::from("2024-01-05T13:45:00")).unwrap(),
            Value::from("2024-01-05 13:45:00")
        );
        assert!(t.cast(&Value::from("soon")).is_err());
    }

    #[test]
    fn test_negative_multiplier_is_configuration_error() {
        let err = TimestampDataType::from_uxon(&json!({"multiplier": -5})).unwrap_err();
        assert_eq!(err.code(), DT0300);
    }
}
