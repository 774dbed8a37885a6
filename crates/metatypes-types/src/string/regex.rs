//! Regular expressions, bare or in delimited form (`/pattern/flags`)

use super::{parse_constrained, StringConstraints};
use crate::contract::{DataType, TypeMeta};
use crate::value::Value;
use ::regex::{Regex, RegexBuilder};
use metatypes_diagnostics::{describe_value, DataTypeError, Result, DT0017, DT0302};
use once_cell::sync::OnceCell;
use serde::Deserialize;

const FLAG_CHARS: &str = "imsxuUADSXJn";

/// Closing delimiter for an opening one
fn closing_delimiter(open: char) -> char {
    match open {
        '(' => ')',
        '{' => '}',
        '[' => ']',
        '<' => '>',
        other => other,
    }
}

/// The delimiter of a delimited pattern such as `/abc/i` or `#abc#`
pub fn find_delimiter(pattern: &str) -> Option<char> {
    split_delimited(pattern).map(|(delimiter, _, _)| delimiter)
}

/// Split `/body/flags` into `(delimiter, body, flags)`
pub fn split_delimited(pattern: &str) -> Option<(char, &str, &str)> {
    let open = pattern.chars().next()?;
    if open.is_alphanumeric() || open.is_whitespace() || open == '\\' {
        return None;
    }
    let close = closing_delimiter(open);
    let rest = &pattern[open.len_utf8()..];
    let end = rest.rfind(close)?;
    let flags = &rest[end + close.len_utf8()..];
    if !flags.chars().all(|c| FLAG_CHARS.contains(c)) {
        return None;
    }
    Some((open, &rest[..end], flags))
}

/// Compile a bare or delimited pattern
pub fn compile(pattern: &str) -> std::result::Result<Regex, String> {
    let Some((_, body, flags)) = split_delimited(pattern) else {
        return Regex::new(pattern).map_err(|e| e.to_string());
    };

    let mut builder = RegexBuilder::new(body);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            'U' => builder.swap_greed(true),
            // Always unicode-aware
            'u' => builder.unicode(true),
            other => return Err(format!("Unsupported regex modifier '{}'", other)),
        };
    }
    builder.build().map_err(|e| e.to_string())
}

/// Whether the string is a valid regular expression
pub fn is_regex(pattern: &str) -> bool {
    !pattern.is_empty() && compile(pattern).is_ok()
}

/// Compile a `validator_regex` from type configuration
pub(crate) fn compile_validator(pattern: &str) -> Result<Regex> {
    compile(pattern).map_err(|reason| {
        DataTypeError::configuration(
            DT0302,
            format!("Invalid validator regex {}: {}", pattern, reason),
        )
    })
}

/// Built-in pattern compiled on first use
pub(crate) struct StaticRegex {
    pattern: &'static str,
    cell: OnceCell<std::result::Result<Regex, String>>,
}

impl StaticRegex {
    pub(crate) const fn new(pattern: &'static str) -> Self {
        Self {
            pattern,
            cell: OnceCell::new(),
        }
    }

    pub(crate) fn get(&self) -> Result<&Regex> {
        self.cell
            .get_or_init(|| Regex::new(self.pattern).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|reason| {
                DataTypeError::configuration(
                    DT0302,
                    format!("Built-in pattern {} failed to compile: {}", self.pattern, reason),
                )
            })
    }

    /// Match test; an uncompilable pattern matches nothing
    pub(crate) fn is_match(&self, haystack: &str) -> bool {
        self.get().is_ok_and(|re| re.is_match(haystack))
    }
}

/// Stateless cast: the string must compile
pub fn cast(value: &Value) -> Result<Value> {
    let cast = super::cast(value)?;
    match &cast {
        Value::String(s) if !s.is_empty() => match compile(s) {
            Ok(_) => Ok(cast),
            Err(reason) => Err(DataTypeError::casting(
                DT0017,
                format!("{} is not a valid regular expression: {}", describe_value(s, false), reason),
            )),
        },
        _ => Ok(cast),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegularExpressionDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub constraints: StringConstraints,
}

impl DataType for RegularExpressionDataType {
    crate::data_type_basics!("RegularExpression");

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
