//! Number data type and its sub-types
//!
//! Numbers are canonically [`Decimal`]s (`Value::Number`); Integer and
//! ByteSize produce `Value::Integer`, Hexadecimal a `0x` string. Stateless
//! casting has to guess the decimal separator of locale-formatted input,
//! `parse` uses the one configured for the instance or its locale.

mod byte_size;
mod hexadecimal;
mod integer;
mod percent;
mod price;

pub use byte_size::ByteSizeDataType;
pub use hexadecimal::HexadecimalDataType;
pub use integer::IntegerDataType;
pub use percent::PercentDataType;
pub use price::PriceDataType;

use crate::context::TypeContext;
use crate::contract::{cast_error, DataType, TypeMeta};
use crate::value::Value;
use metatypes_diagnostics::{
    describe_value, DataTypeError, Result, DT0003, DT0024, DT0104, DT0105,
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::str::FromStr;

/// Languages writing `1.234,5`
const COMMA_DECIMAL_LANGUAGES: &[&str] = &[
    "de", "fr", "es", "it", "nl", "pl", "pt", "ru", "cs", "da", "fi", "nb", "sv", "tr", "uk",
];

/// Guess the decimal separator of unlocalized input.
///
/// The last of `.` and `,` wins when both occur; a lone comma followed by
/// exactly three digits is read as a thousands separator.
fn detect_decimal_separator(s: &str) -> char {
    match (s.rfind('.'), s.rfind(',')) {
        (Some(dot), Some(comma)) => {
            if dot > comma {
                '.'
            } else {
                ','
            }
        }
        (None, Some(comma)) => {
            let fraction = &s[comma + 1..];
            let grouped = fraction.len() == 3 && fraction.bytes().all(|b| b.is_ascii_digit());
            if s.matches(',').count() == 1 && !grouped {
                ','
            } else {
                '.'
            }
        }
        (Some(_), None) if s.matches('.').count() > 1 => ',',
        _ => '.',
    }
}

/// Parse a number written with optional sign, group separators, scientific
/// notation or as a `0x` hex literal.
pub fn parse_decimal(raw: &str, decimal_separator: Option<char>) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\'' && *c != '_')
        .collect();
    let (negative, unsigned) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    if unsigned.is_empty() {
        return None;
    }

    let magnitude = if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16).ok().map(Decimal::from)?
    } else {
        let decimal = decimal_separator.unwrap_or_else(|| detect_decimal_separator(unsigned));
        let thousands = if decimal == ',' { '.' } else { ',' };
        let normalized: String = unsigned
            .chars()
            .filter(|c| *c != thousands)
            .map(|c| if c == decimal { '.' } else { c })
            .collect();
        if !normalized.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            return None;
        }
        if normalized.contains(['e', 'E']) {
            Decimal::from_scientific(&normalized).ok()?
        } else {
            Decimal::from_str(&normalized).ok()?
        }
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// Shared numeric cast: `Ok(None)` for empty input
pub(crate) fn cast_decimal(
    value: &Value,
    decimal_separator: Option<char>,
    target: &str,
) -> Result<Option<Decimal>> {
    match value {
        Value::Null => Ok(None),
        Value::Boolean(b) => Ok(Some(Decimal::from(u8::from(*b)))),
        Value::Integer(i) => Ok(Some(Decimal::from(*i))),
        Value::Number(d) => Ok(Some(*d)),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => parse_decimal(s, decimal_separator)
            .map(Some)
            .ok_or_else(|| cast_error(DT0003, value, target)),
        Value::List(_) => Err(DataTypeError::casting(
            DT0024,
            format!("Cannot convert a list to {}", target),
        )),
    }
}

/// Stateless cast into a `Value::Number`
pub fn cast(value: &Value) -> Result<Value> {
    Ok(cast_decimal(value, None, "a number")?
        .map(Value::Number)
        .unwrap_or(Value::Null))
}

/// Configuration shared by all numeric types
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NumberOptions {
    /// Minimum number of fraction digits shown
    pub precision_min: Option<u32>,
    /// Values are rounded to this many fraction digits
    pub precision_max: Option<u32>,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    /// Defaults to the locale's separator
    pub decimal_separator: Option<String>,
    pub thousands_separator: Option<String>,
    pub show_thousands_separator: bool,
    pub show_plus_sign: bool,
}

impl NumberOptions {
    /// Configured separator, the translated one, or the locale language's
    pub fn decimal_separator(&self, context: &TypeContext) -> String {
        if let Some(sep) = &self.decimal_separator {
            return sep.clone();
        }
        let fallback = if COMMA_DECIMAL_LANGUAGES.contains(&context.locale.language().as_str()) {
            ","
        } else {
            "."
        };
        context.text("LOCALIZATION.NUMBER.DECIMAL_SEPARATOR", fallback, &[])
    }

    pub fn thousands_separator(&self, context: &TypeContext) -> String {
        if let Some(sep) = &self.thousands_separator {
            return sep.clone();
        }
        let fallback = if self.decimal_separator(context) == "," {
            "."
        } else {
            ","
        };
        context.text("LOCALIZATION.NUMBER.THOUSANDS_SEPARATOR", fallback, &[])
    }

    fn decimal_char(&self, context: &TypeContext) -> Option<char> {
        let sep = self.decimal_separator(context);
        let mut chars = sep.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    /// Instance-level numeric cast using the instance's decimal separator
    pub fn cast_decimal(
        &self,
        context: &TypeContext,
        value: &Value,
        target: &str,
    ) -> Result<Option<Decimal>> {
        cast_decimal(value, self.decimal_char(context), target)
    }

    pub fn round(&self, value: Decimal) -> Decimal {
        match self.precision_max {
            Some(dp) => value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
            None => value,
        }
    }

    pub fn check_range(&self, value: Decimal, sensitive: bool) -> Result<()> {
        if let Some(min) = self.min {
            if value < min {
                return Err(DataTypeError::validation(
                    DT0104,
                    format!(
                        "The value {} is less than the minimum {}",
                        describe_value(&value.normalize().to_string(), sensitive),
                        min.normalize()
                    ),
                ));
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return Err(DataTypeError::validation(
                    DT0105,
                    format!(
                        "The value {} is greater than the maximum {}",
                        describe_value(&value.normalize().to_string(), sensitive),
                        max.normalize()
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Render with precision, separators and sign as configured
    pub fn format(&self, context: &TypeContext, value: Decimal) -> String {
        let mut rounded = self.round(value).normalize();
        if let Some(min) = self.precision_min {
            if rounded.scale() < min {
                rounded.rescale(min);
            }
        }

        let digits = rounded.abs().to_string();
        let (integer, fraction) = match digits.split_once('.') {
            Some((i, f)) => (i.to_string(), Some(f.to_string())),
            None => (digits, None),
        };
        let integer = if self.show_thousands_separator {
            group_thousands(&integer, &self.thousands_separator(context))
        } else {
            integer
        };

        let mut out = String::new();
        if rounded.is_sign_negative() && !rounded.is_zero() {
            out.push('-');
        } else if self.show_plus_sign && !rounded.is_zero() {
            out.push('+');
        }
        out.push_str(&integer);
        if let Some(fraction) = fraction {
            out.push_str(&self.decimal_separator(context));
            out.push_str(&fraction);
        }
        out
    }

    pub fn describe(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("between {} and {}", min.normalize(), max.normalize()),
            (Some(min), None) => format!("at least {}", min.normalize()),
            (None, Some(max)) => format!("at most {}", max.normalize()),
            (None, None) => String::new(),
        }
    }
}

/// Insert `separator` between groups of three integer digits
pub fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}

/// Decimal input to a numeric type's `parse`: cast, round, range-check
pub(crate) fn parse_number(
    data_type: &dyn DataType,
    options: &NumberOptions,
    value: &Value,
    target: &str,
) -> Result<Option<Decimal>> {
    let decimal = options
        .cast_decimal(data_type.context(), value, target)
        .map_err(|e| data_type.to_validation_error(e))?;
    let Some(decimal) = decimal else {
        return Ok(None);
    };
    let rounded = options.round(decimal);
    options
        .check_range(rounded, data_type.is_sensitive())
        .map_err(|e| data_type.to_validation_error(e))?;
    Ok(Some(rounded))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NumberDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub options: NumberOptions,
}

impl NumberDataType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.options.precision_min = min;
        self.options.precision_max = max;
        self
    }

    pub fn with_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.options.min = min;
        self.options.max = max;
        self
    }

    pub fn with_thousands_separator(mut self, show: bool) -> Self {
        self.options.show_thousands_separator = show;
        self
    }

    pub fn with_plus_sign(mut self, show: bool) -> Self {
        self.options.show_plus_sign = show;
        self
    }
}

impl DataType for NumberDataType {
    crate::data_type_basics!("Number");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast(value)
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        Ok(parse_number(self, &self.options, value, "a number")?
            .map(Value::Number)
            .unwrap_or(Value::Null))
    }

    fn format(&self, value: &Value) -> String {
        match cast_decimal(value, Some('.'), "a number") {
            Ok(Some(d)) => self.options.format(self.context(), d),
            Ok(None) => String::new(),
            Err(_) => value.to_plain_string(),
        }
    }

    fn validation_description(&self) -> String {
        self.options.describe()
    }

    fn default_widget_type(&self) -> &'static str {
        "DisplayNumber"
    }
}
