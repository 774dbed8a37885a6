//! Date, time and timestamp types
//!
//! All temporal types share one strategy chain for turning user input into a
//! point in time. The first strategy that matches wins:
//!
//! 1. empty input is `Null`
//! 2. keywords: `now`, `today`, `yesterday`, `tomorrow`
//! 3. Unix timestamps: 9 or more digits, milliseconds from 10^11 on
//! 4. relative offsets: `+3`, `-2w`, `1m`, `+1y` (days by default)
//! 5. short forms: `dd.MM`, `d-M`, `ddMMyyyy`, `ddMMyy`, `ddMM`, `yyyy`
//! 6. common calendar notations (ISO 8601, `dd.MM.yyyy`, `MM/dd/yyyy`, ...)
//!
//! Canonical values use fixed formats regardless of locale; display formats
//! come from [`pattern::DisplayPattern`].

mod date;
mod datetime;
pub mod pattern;
mod time;
mod timestamp;

pub use date::DateDataType;
pub use datetime::DateTimeDataType;
pub use pattern::DisplayPattern;
pub use time::TimeDataType;
pub use timestamp::TimestampDataType;

use crate::context::TypeContext;
use crate::contract::DataType;
use crate::value::Value;
use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, TimeDelta};
use log::trace;
use metatypes_diagnostics::{DataTypeError, Result, DT0024};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const TIME_FORMAT: &str = "%H:%M:%S";

const TIMESTAMP_MIN_DIGITS: usize = 9;
const MILLISECONDS_FROM: i64 = 100_000_000_000;

/// Unsigned unit-less numbers longer than this are short forms, not offsets
const RELATIVE_MAX_DIGITS: usize = 3;

const DATETIME_NOTATIONS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_NOTATIONS: &[&str] = &[
    "%Y-%m-%d",
    "%d.%m.%Y",
    "%d.%m.%y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%Y%m%d",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Built-in display patterns per language: date, time without seconds
const DISPLAY_PATTERNS: &[(&str, &str, &str)] = &[
    ("de", "dd.MM.yyyy", "HH:mm"),
    ("en", "M/d/yyyy", "h:mm a"),
    ("fr", "dd/MM/yyyy", "HH:mm"),
    ("nl", "dd-MM-yyyy", "HH:mm"),
    ("ru", "dd.MM.yyyy", "HH:mm"),
];

const FALLBACK_PATTERNS: (&str, &str) = ("yyyy-MM-dd", "HH:mm");

/// Which step of the chain produced a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Keyword,
    Timestamp,
    Relative,
    ShortForm,
    Calendar,
}

/// Input after the generic value checks: `None` for empty input
pub(crate) fn input_text(value: &Value, target: &str) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::List(_) => Err(DataTypeError::casting(
            DT0024,
            format!("Cannot convert a list to {}", target),
        )),
        other => {
            let text = other.to_plain_string().trim().to_string();
            Ok((!text.is_empty()).then_some(text))
        }
    }
}

/// Shift by calendar months, clamping to the last day of the target month
pub fn add_months(at: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let step = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        at.checked_add_months(step)
    } else {
        at.checked_sub_months(step)
    }
}

fn add_days(at: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    at.checked_add_signed(TimeDelta::try_days(days)?)
}

pub fn from_unix(seconds: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(seconds, 0).map(|utc| utc.naive_utc())
}

pub fn to_unix(at: &NaiveDateTime) -> i64 {
    at.and_utc().timestamp()
}

fn parse_keyword(token: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    match token.to_lowercase().as_str() {
        "now" | "today" => Some(now),
        "yesterday" => add_days(now, -1),
        "tomorrow" => add_days(now, 1),
        _ => None,
    }
}

fn parse_timestamp(token: &str) -> Option<NaiveDateTime> {
    if token.len() < TIMESTAMP_MIN_DIGITS || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number: i64 = token.parse().ok()?;
    if number >= MILLISECONDS_FROM {
        DateTime::from_timestamp_millis(number).map(|utc| utc.naive_utc())
    } else {
        from_unix(number)
    }
}

/// `[+|-]N[d|w|m|y]` relative to `now`.
///
/// A zero amount is only accepted as the literal `0`, so `0000` is not
/// mistaken for "today".
pub fn parse_relative(token: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let (sign, rest) = match token.chars().next()? {
        '+' => (Some(1), &token[1..]),
        '-' => (Some(-1), &token[1..]),
        _ => (None, token),
    };
    let split = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let (digits, unit) = rest.split_at(split);
    if digits.is_empty() {
        return None;
    }
    if sign.is_none() && unit.is_empty() && digits.len() > RELATIVE_MAX_DIGITS {
        return None;
    }
    let amount: i64 = digits.parse::<i64>().ok()? * sign.unwrap_or(1);
    if amount == 0 && token != "0" {
        return None;
    }
    match unit.to_lowercase().as_str() {
        "" | "d" => add_days(now, amount),
        "w" => add_days(now, amount.checked_mul(7)?),
        "m" => add_months(now, amount),
        "y" => add_months(now, amount.checked_mul(12)?),
        _ => None,
    }
}

fn day_month(day: &str, month: &str, year: i32) -> Option<NaiveDate> {
    let valid = |s: &str| (1..=2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit());
    if !valid(day) || !valid(month) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

/// Abbreviated day/month notations; the current year fills in when omitted
pub fn parse_short_form(token: &str, today: NaiveDate) -> Option<NaiveDate> {
    let year = today.year();
    let dotted = token.strip_suffix('.').unwrap_or(token);
    if let Some((day, month)) = dotted.split_once('.') {
        return day_month(day, month, year);
    }
    if let Some((day, month)) = token.split_once('-') {
        return day_month(day, month, year);
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let part = |range: std::ops::Range<usize>| token[range].parse::<u32>().ok();
    match token.len() {
        8 => NaiveDate::from_ymd_opt(part(4..8)? as i32, part(2..4)?, part(0..2)?),
        6 => NaiveDate::from_ymd_opt(
            pattern::expand_two_digit_year(part(4..6)?),
            part(2..4)?,
            part(0..2)?,
        ),
        4 => day_month(&token[..2], &token[2..], year).or_else(|| {
            let year = part(0..4)? as i32;
            (year >= 1000).then(|| NaiveDate::from_ymd_opt(year, 1, 1)).flatten()
        }),
        _ => None,
    }
}

fn parse_calendar(token: &str) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(token) {
        return Some(with_offset.naive_local());
    }
    DATETIME_NOTATIONS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(token, f).ok())
        .or_else(|| {
            DATE_NOTATIONS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(token, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Run the strategy chain on a trimmed, non-empty token
pub fn resolve(token: &str, now: NaiveDateTime) -> Option<(NaiveDateTime, Strategy)> {
    let midnight = |d: NaiveDate| d.and_hms_opt(0, 0, 0);
    let found = parse_keyword(token, now)
        .map(|v| (v, Strategy::Keyword))
        .or_else(|| parse_timestamp(token).map(|v| (v, Strategy::Timestamp)))
        .or_else(|| parse_relative(token, now).map(|v| (v, Strategy::Relative)))
        .or_else(|| {
            parse_short_form(token, now.date())
                .and_then(midnight)
                .map(|v| (v, Strategy::ShortForm))
        })
        .or_else(|| parse_calendar(token).map(|v| (v, Strategy::Calendar)));
    if let Some((_, strategy)) = &found {
        trace!("Resolved {:?} via {:?}", token, strategy);
    }
    found
}

/// Display pattern for the current locale.
///
/// Precedence: explicit override, then the translation `key`, then the
/// built-in pattern of the locale's language.
pub(crate) fn locale_pattern(
    context: &TypeContext,
    explicit: Option<&str>,
    key: &str,
    builtin: impl Fn((&str, &str)) -> String,
) -> Result<DisplayPattern> {
    if let Some(pattern) = explicit {
        return DisplayPattern::compile(pattern);
    }
    if context.translator.has_translation(key) {
        return DisplayPattern::compile(&context.translator.translate(key, &[]));
    }
    let language = context.locale.language();
    let patterns = DISPLAY_PATTERNS
        .iter()
        .find(|(code, _, _)| code.eq_ignore_ascii_case(&language))
        .map_or(FALLBACK_PATTERNS, |(_, date, time)| (*date, *time));
    DisplayPattern::compile(&builtin(patterns))
}

/// Two-tier parse shared by the temporal types: the canonical chain first,
/// then the locale display pattern, before reporting the original failure.
pub(crate) fn parse_with_display_pattern(
    data_type: &dyn DataType,
    value: &Value,
    pattern: Result<DisplayPattern>,
    render: impl Fn(NaiveDateTime) -> Value,
) -> Result<Value> {
    let err = match data_type.cast(value) {
        Ok(cast) => return Ok(cast),
        Err(err) => err,
    };
    if let (Some(raw), Ok(pattern)) = (value.as_str(), pattern) {
        let context = data_type.context();
        let language = context.locale.language();
        if let Some(parsed) = pattern.parse(raw, &language, context.clock.today()) {
            trace!("Resolved {:?} via display pattern {}", raw, pattern.as_str());
            return Ok(render(parsed));
        }
    }
    Err(data_type.to_validation_error(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("0", date(2024, 2, 29))]
    #[case("+3", date(2024, 3, 3))]
    #[case("-1w", date(2024, 2, 22))]
    #[case("+1m", date(2024, 3, 29))]
    #[case("+1y", date(2025, 2, 28))]
    #[case("-1Y", date(2023, 2, 28))]
    #[case("12", date(2024, 3, 12))]
    #[case("+1000", date(2026, 11, 25))]
    fn test_relative(#[case] token: &str, #[case] expected: NaiveDate) {
        assert_eq!(parse_relative(token, now()).map(|d| d.date()), Some(expected));
    }

    #[rstest]
    #[case("0000")]
    #[case("00")]
    #[case("+0")]
    #[case("1234")]
    #[case("+5x")]
    #[case("d")]
    fn test_not_relative(#[case] token: &str) {
        assert_eq!(parse_relative(token, now()), None);
    }

    #[test]
    fn test_relative_keeps_time_of_day() {
        assert_eq!(parse_relative("+1", now()).unwrap().format("%H:%M").to_string(), "10:30");
    }

    #[test]
    fn test_month_end_clamps() {
        let jan31 = date(2024, 1, 31).and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(add_months(jan31, 1).unwrap().date(), date(2024, 2, 29));
    }

    #[rstest]
    #[case("05.03", date(2024, 3, 5))]
    #[case("5.3.", date(2024, 3, 5))]
    #[case("5-3", date(2024, 3, 5))]
    #[case("05032023", date(2023, 3, 5))]
    #[case("050323", date(2023, 3, 5))]
    #[case("0503", date(2024, 3, 5))]
    #[case("2021", date(2021, 1, 1))]
    fn test_short_forms(#[case] token: &str, #[case] expected: NaiveDate) {
        assert_eq!(parse_short_form(token, now().date()), Some(expected));
    }

    #[rstest]
    #[case("0000")]
    #[case("0999")]
    #[case("32.01")]
    #[case("2024-01-05")]
    fn test_not_short_forms(#[case] token: &str) {
        assert_eq!(parse_short_form(token, now().date()), None);
    }

    #[rstest]
    #[case("now", Strategy::Keyword)]
    #[case("1700000000", Strategy::Timestamp)]
    #[case("1700000000000", Strategy::Timestamp)]
    #[case("-2", Strategy::Relative)]
    #[case("1.2", Strategy::ShortForm)]
    #[case("2024-01-05", Strategy::Calendar)]
    #[case("05.01.2024 13:45", Strategy::Calendar)]
    #[case("2024-01-05T13:45:00+02:00", Strategy::Calendar)]
    fn test_strategy_order(#[case] token: &str, #[case] expected: Strategy) {
        assert_eq!(resolve(token, now()).map(|(_, s)| s), Some(expected));
    }

    #[test]
    fn test_timestamps() {
        let seconds = resolve("1700000000", now()).unwrap().0;
        let millis = resolve("1700000000000", now()).unwrap().0;
        assert_eq!(seconds, millis);
        assert_eq!(seconds.format(DATETIME_FORMAT).to_string(), "2023-11-14 22:13:20");
        assert_eq!(to_unix(&seconds), 1_700_000_000);
    }

    #[test]
    fn test_zero_quadruple_fails_everywhere() {
        assert_eq!(resolve("0000", now()), None);
    }
}
