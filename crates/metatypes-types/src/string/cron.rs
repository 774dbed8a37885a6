//! Cron expressions with 5 fields (minute to weekday), an optional leading
//! seconds field, or one of the `@` macros.

use super::{parse_constrained, StringConstraints};
use crate::contract::{DataType, TypeMeta};
use crate::value::Value;
use metatypes_diagnostics::{describe_value, DataTypeError, Result, DT0019};
use serde::Deserialize;

const MACROS: &[&str] = &[
    "@yearly", "@annually", "@monthly", "@weekly", "@daily", "@midnight", "@hourly", "@reboot",
];

const MONTH_NAMES: &[&str] = &[
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

const WEEKDAY_NAMES: &[&str] = &["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

struct Field {
    min: u32,
    max: u32,
    names: &'static [&'static str],
    /// Offset of the first name, e.g. JAN is month 1
    name_base: u32,
}

const SECONDS: Field = Field { min: 0, max: 59, names: &[], name_base: 0 };
const MINUTES: Field = Field { min: 0, max: 59, names: &[], name_base: 0 };
const HOURS: Field = Field { min: 0, max: 23, names: &[], name_base: 0 };
const DAYS: Field = Field { min: 1, max: 31, names: &[], name_base: 0 };
const MONTHS: Field = Field { min: 1, max: 12, names: MONTH_NAMES, name_base: 1 };
// 7 is an alias of Sunday
const WEEKDAYS: Field = Field { min: 0, max: 7, names: WEEKDAY_NAMES, name_base: 0 };

const FIVE_FIELDS: &[Field] = &[MINUTES, HOURS, DAYS, MONTHS, WEEKDAYS];
const SIX_FIELDS: &[Field] = &[SECONDS, MINUTES, HOURS, DAYS, MONTHS, WEEKDAYS];

impl Field {
    fn number(&self, token: &str) -> Option<u32> {
        let n = match token.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                let upper = token.to_ascii_uppercase();
                let index = self.names.iter().position(|name| *name == upper)?;
                index as u32 + self.name_base
            }
        };
        (self.min..=self.max).contains(&n).then_some(n)
    }

    fn is_valid_range(&self, range: &str) -> bool {
        if range == "*" || range == "?" {
            return true;
        }
        match range.split_once('-') {
            Some((from, to)) => match (self.number(from), self.number(to)) {
                (Some(a), Some(b)) => a <= b,
                _ => false,
            },
            None => self.number(range).is_some(),
        }
    }

    fn is_valid(&self, field: &str) -> bool {
        !field.is_empty()
            && field.split(',').all(|item| {
                let (range, step) = match item.split_once('/') {
                    Some((range, step)) => (range, Some(step)),
                    None => (item, None),
                };
                let step_ok = step.is_none_or(|s| s.parse::<u32>().is_ok_and(|s| s > 0));
                step_ok && self.is_valid_range(range)
            })
    }
}

pub fn is_cron(expression: &str) -> bool {
    let trimmed = expression.trim();
    if trimmed.starts_with('@') {
        return MACROS.contains(&trimmed.to_ascii_lowercase().as_str());
    }
    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    let layout: &[Field] = match fields.len() {
        5 => FIVE_FIELDS,
        6 => SIX_FIELDS,
        _ => return false,
    };
    fields.iter().zip(layout).all(|(field, rule)| rule.is_valid(field))
}

pub fn cast(value: &Value) -> Result<Value> {
    let cast = super::cast(value)?;
    let Value::String(s) = &cast else {
        return Ok(cast);
    };
    if s.trim().is_empty() {
        return Ok(Value::string(""));
    }
    if is_cron(s) {
        // Collapse runs of whitespace between fields
        return Ok(Value::String(s.split_whitespace().collect::<Vec<_>>().join(" ")));
    }
    Err(DataTypeError::casting(
        DT0019,
        format!("{} is not a valid cron expression", describe_value(s, false)),
    ))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CronDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub constraints: StringConstraints,
}

impl DataType for CronDataType {
    crate::data_type_basics!("Cron");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast(value)
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        parse_constrained(self, &self.constraints, value)
    }

    fn check_configuration(&self) -> Result<()> {
        self.constraints.check_configuration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("* * * * *", true)]
    #[case("*/15 0-6 1,15 * MON-FRI", true)]
    #[case("0 30 2 * JAN-MAR ?", true)]
    #[case("0 0 * * 7", true)]
    #[case("@daily", true)]
    #[case("@Weekly", true)]
    #[case("* * * *", false)]
    #[case("60 * * * *", false)]
    #[case("* 24 * * *", false)]
    #[case("* * 0 * *", false)]
    #[case("*/0 * * * *", false)]
    #[case("5-1 * * * *", false)]
    #[case("* * * FOO *", false)]
    #[case("@sometimes", false)]
    fn test_is_cron(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_cron(input), expected);
    }

    #[test]
    fn test_cast_collapses_whitespace() {
        assert_eq!(
            cast(&Value::from("0  12 *   * *")).unwrap(),
            Value::from("0 12 * * *")
        );
        assert_eq!(cast(&Value::from("x")).unwrap_err().code(), DT0019);
    }
}
