use super::{input_text, locale_pattern, parse_with_display_pattern, resolve, DisplayPattern, Strategy, TIME_FORMAT};
use crate::context::Clock;
use crate::contract::{cast_error, DataType, TypeMeta};
use crate::value::Value;
use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use log::trace;
use metatypes_diagnostics::{Result, DT0006};
use serde::Deserialize;

fn strip_meridiem(token: &str) -> (&str, Option<bool>) {
    let lower = token.to_ascii_lowercase();
    for (suffix, pm) in [("a.m.", false), ("p.m.", true), ("am", false), ("pm", true)] {
        if lower.ends_with(suffix) {
            return (token[..token.len() - suffix.len()].trim_end(), Some(pm));
        }
    }
    (token, None)
}

/// `+2h`, `-30min`, `+15m`, `+90s`
fn parse_relative_time(token: &str, now: NaiveDateTime) -> Option<NaiveTime> {
    let (sign, rest) = match token.chars().next()? {
        '+' => (1, &token[1..]),
        '-' => (-1, &token[1..]),
        _ => return None,
    };
    let split = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let (digits, unit) = rest.split_at(split);
    let amount = digits.parse::<i64>().ok()? * sign;
    let delta = match unit.trim().to_lowercase().as_str() {
        "" | "h" => TimeDelta::try_hours(amount)?,
        "m" | "min" => TimeDelta::try_minutes(amount)?,
        "s" | "sec" => TimeDelta::try_seconds(amount)?,
        _ => return None,
    };
    now.checked_add_signed(delta).map(|at| at.time())
}

fn parse_clock(token: &str) -> Option<NaiveTime> {
    let (core, meridiem) = strip_meridiem(token);
    let numbers: Vec<u32> = if core.contains(':') {
        core.split(':')
            .map(|part| part.parse().ok())
            .collect::<Option<Vec<_>>>()?
    } else {
        if core.is_empty() || core.len() > 4 || !core.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match core.len() {
            1 | 2 => vec![core.parse().ok()?],
            // HMM or HHMM
            _ => {
                let (hours, minutes) = core.split_at(core.len() - 2);
                vec![hours.parse().ok()?, minutes.parse().ok()?]
            }
        }
    };
    let (mut hour, minute, second) = match numbers.as_slice() {
        [h] => (*h, 0, 0),
        [h, m] => (*h, *m, 0),
        [h, m, s] => (*h, *m, *s),
        _ => return None,
    };
    match meridiem {
        Some(_) if !(1..=12).contains(&hour) => return None,
        Some(true) if hour < 12 => hour += 12,
        Some(false) if hour == 12 => hour = 0,
        _ => {}
    }
    NaiveTime::from_hms_opt(hour, minute, second)
}

/// Time of day from user input
pub fn parse_time(token: &str, now: NaiveDateTime) -> Option<NaiveTime> {
    if token.eq_ignore_ascii_case("now") {
        return Some(now.time());
    }
    if let Some(time) = parse_relative_time(token, now).or_else(|| parse_clock(token)) {
        trace!("Resolved time {:?}", token);
        return Some(time);
    }
    // Full date-times contribute their time of day
    match resolve(token, now) {
        Some((at, Strategy::Calendar | Strategy::Timestamp)) => Some(at.time()),
        _ => None,
    }
}

pub fn cast_at(value: &Value, now: NaiveDateTime) -> Result<Value> {
    let Some(token) = input_text(value, "a time")? else {
        return Ok(Value::Null);
    };
    parse_time(&token, now)
        .map(|time| Value::String(time.format(TIME_FORMAT).to_string()))
        .ok_or_else(|| cast_error(DT0006, value, "a time"))
}

/// Canonical `HH:MM:SS`
pub fn cast(value: &Value) -> Result<Value> {
    cast_at(value, Clock::System.now())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimeDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    /// Display pattern, e.g. `HH:mm`; the locale's when unset
    pub format: Option<String>,
    pub show_seconds: bool,
}

impl TimeDataType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seconds(mut self, show: bool) -> Self {
        self.show_seconds = show;
        self
    }

    pub fn display_pattern(&self) -> Result<DisplayPattern> {
        let show_seconds = self.show_seconds;
        locale_pattern(
            self.context(),
            self.format.as_deref(),
            "LOCALIZATION.DATE.TIME_FORMAT",
            |(_, time)| {
                if show_seconds {
                    time.replace("mm", "mm:ss")
                } else {
                    time.to_string()
                }
            },
        )
    }
}

impl DataType for TimeDataType {
    crate::data_type_basics!("Time");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast_at(value, self.context().clock.now())
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        parse_with_display_pattern(self, value, self.display_pattern(), |at| {
            Value::String(at.format(TIME_FORMAT).to_string())
        })
    }

    fn format(&self, value: &Value) -> String {
        let rendered = self.cast(value).ok().and_then(|cast| {
            let time = NaiveTime::parse_from_str(cast.as_str()?, TIME_FORMAT).ok()?;
            let pattern = self.display_pattern().ok()?;
            let at = self.context().clock.today().and_time(time);
            Some(pattern.format(&at, &self.context().locale.language()))
        });
        rendered.unwrap_or_else(|| value.to_plain_string())
    }

    fn check_configuration(&self) -> Result<()> {
        if let Some(pattern) = &self.format {
            DisplayPattern::compile(pattern)?;
        }
        Ok(())
    }

    fn default_widget_type(&self) -> &'static str {
        "DisplayTime"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TypeContext;
    use crate::contract::Configurable;
    use chrono::NaiveDate;
    use metatypes_model::StaticLocale;
    use rstest::rstest;
    use std::sync::Arc;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[rstest]
    #[case("9", "09:00:00")]
    #[case("930", "09:30:00")]
    #[case("1745", "17:45:00")]
    #[case("7:05", "07:05:00")]
    #[case("07:05:09", "07:05:09")]
    #[case("7pm", "19:00:00")]
    #[case("12:15 AM", "00:15:00")]
    #[case("12 p.m.", "12:00:00")]
    #[case("now", "12:00:00")]
    #[case("+2h", "14:00:00")]
    #[case("-30min", "11:30:00")]
    #[case("+13h", "01:00:00")]
    #[case("2024-01-05 13:45:00", "13:45:00")]
    fn test_cast(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(cast_at(&Value::from(input), noon()).unwrap(), Value::from(expected));
    }

    #[rstest]
    #[case("25:00")]
    #[case("13pm")]
    #[case("12345")]
    #[case("lunch")]
    #[case("7:61")]
    fn test_cast_invalid(#[case] input: &str) {
        let err = cast_at(&Value::from(input), noon()).unwrap_err();
        assert_eq!(err.code(), DT0006);
    }

    #[test]
    fn test_format() {
        let de = TimeDataType::new().with_context(
            TypeContext::default().with_locale(Arc::new(StaticLocale::new("de_DE"))),
        );
        assert_eq!(de.format(&Value::from("17:45:00")), "17:45");
        assert_eq!(de.with_seconds(true).format(&Value::from("17:45:09")), "17:45:09");

        let en = TimeDataType::new().with_context(
            TypeContext::default().with_locale(Arc::new(StaticLocale::new("en_US"))),
        );
        assert_eq!(en.format(&Value::from("17:45:00")), "5:45 PM");
    }
}
