//! ICU-style display patterns such as `dd.MM.yyyy` or `EEEE, d. MMMM yyyy HH:mm`
//!
//! A pattern is compiled once into letter-run fields and literals. Letters
//! repeat to set the width: `M` is `3`, `MM` is `03`, `MMM` is `Mar` and
//! `MMMM` is `March`. Text in single quotes is literal and `''` stands for a
//! single quote.
//!
//! | Letter | Field |
//! |--------|-------|
//! | `y` | year (`yy` two digits) |
//! | `M` | month |
//! | `d` | day of month |
//! | `E` | weekday (`EEEE` full name) |
//! | `Q` | quarter |
//! | `H` | hour 0-23 |
//! | `h` | hour 1-12 |
//! | `m` | minute |
//! | `s` | second |
//! | `a` | AM/PM marker |

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use metatypes_diagnostics::{DataTypeError, Result, DT0304};

const FIELD_LETTERS: &str = "yMdEQHhmsa";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Field { symbol: char, width: usize },
}

impl Token {
    fn is_numeric(&self) -> bool {
        match self {
            Token::Field { symbol: 'M', width } => *width <= 2,
            Token::Field { symbol, .. } => matches!(symbol, 'y' | 'd' | 'H' | 'h' | 'm' | 's'),
            Token::Literal(_) => false,
        }
    }
}

struct Names {
    months: [&'static str; 12],
    months_short: [&'static str; 12],
    weekdays: [&'static str; 7],
    weekdays_short: [&'static str; 7],
    quarters: [&'static str; 4],
}

const ENGLISH: Names = Names {
    months: [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ],
    months_short: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    weekdays: [
        "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
    ],
    weekdays_short: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
    quarters: ["1st quarter", "2nd quarter", "3rd quarter", "4th quarter"],
};

const GERMAN: Names = Names {
    months: [
        "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September",
        "Oktober", "November", "Dezember",
    ],
    months_short: [
        "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
    ],
    weekdays: [
        "Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag", "Samstag", "Sonntag",
    ],
    weekdays_short: ["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"],
    quarters: ["1. Quartal", "2. Quartal", "3. Quartal", "4. Quartal"],
};

fn names(language: &str) -> &'static Names {
    if language.eq_ignore_ascii_case("de") {
        &GERMAN
    } else {
        &ENGLISH
    }
}

fn pad(n: impl std::fmt::Display, width: usize) -> String {
    format!("{:0>width$}", n.to_string(), width = width)
}

/// Two-digit years: `00`-`69` are 2000s, `70`-`99` are 1900s
pub fn expand_two_digit_year(year: u32) -> i32 {
    let year = year as i32;
    if year < 70 { 2000 + year } else { 1900 + year }
}

/// Case-insensitive match of the longest name at the start of `input`
fn match_name<'a>(input: &'a str, lists: &[&[&'static str]]) -> Option<(usize, &'a str)> {
    lists
        .iter()
        .flat_map(|list| list.iter().enumerate())
        .filter_map(|(index, name)| {
            let head = input.get(..name.len())?;
            (head.to_lowercase() == name.to_lowercase()).then(|| (index, name.len()))
        })
        .max_by_key(|(_, len)| *len)
        .map(|(index, len)| (index, &input[len..]))
}

fn take_digits(input: &str, limit: usize) -> (&str, &str) {
    let end = input
        .char_indices()
        .take(limit)
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map_or(0, |(i, c)| i + c.len_utf8());
    input.split_at(end)
}

fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    input
        .get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .map(|_| &input[prefix.len()..])
}

/// A compiled display pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPattern {
    source: String,
    tokens: Vec<Token>,
}

impl DisplayPattern {
    pub fn compile(pattern: &str) -> Result<Self> {
        let invalid = |reason: String| {
            DataTypeError::configuration(
                DT0304,
                format!("Invalid display pattern \"{}\": {}", pattern, reason),
            )
        };

        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    literal.push('\'');
                    continue;
                }
                let mut closed = false;
                while let Some(q) = chars.next() {
                    if q != '\'' {
                        literal.push(q);
                    } else if chars.peek() == Some(&'\'') {
                        chars.next();
                        literal.push('\'');
                    } else {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(invalid("unterminated quote".to_string()));
                }
            } else if c.is_ascii_alphabetic() {
                if !FIELD_LETTERS.contains(c) {
                    return Err(invalid(format!("unsupported field letter '{}'", c)));
                }
                let mut width = 1;
                while chars.peek() == Some(&c) {
                    chars.next();
                    width += 1;
                }
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Field { symbol: c, width });
            } else {
                literal.push(c);
            }
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }
        Ok(Self {
            source: pattern.to_string(),
            tokens,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the pattern renders any date field
    pub fn has_date(&self) -> bool {
        self.tokens
            .iter()
            .any(|t| matches!(t, Token::Field { symbol: 'y' | 'M' | 'd' | 'E' | 'Q', .. }))
    }

    /// Render using month and weekday names of `language` (English unless `de`)
    pub fn format(&self, value: &NaiveDateTime, language: &str) -> String {
        let names = names(language);
        let mut out = String::new();
        for token in &self.tokens {
            let (symbol, width) = match token {
                Token::Literal(text) => {
                    out.push_str(text);
                    continue;
                }
                Token::Field { symbol, width } => (*symbol, *width),
            };
            let month = value.month0() as usize;
            let quarter = month / 3;
            let rendered = match symbol {
                'y' if width == 2 => pad(value.year().rem_euclid(100), 2),
                'y' => pad(value.year(), width),
                'M' if width <= 2 => pad(value.month(), width),
                'M' if width == 3 => names.months_short[month].to_string(),
                'M' => names.months[month].to_string(),
                'd' => pad(value.day(), width),
                'E' => {
                    let weekday = value.weekday().num_days_from_monday() as usize;
                    if width >= 4 {
                        names.weekdays[weekday].to_string()
                    } else {
                        names.weekdays_short[weekday].to_string()
                    }
                }
                'Q' if width <= 2 => pad(quarter + 1, width),
                'Q' if width == 3 => format!("Q{}", quarter + 1),
                'Q' => names.quarters[quarter].to_string(),
                'H' => pad(value.hour(), width),
                'h' => pad(value.hour12().1, width),
                'm' => pad(value.minute(), width),
                's' => pad(value.second(), width),
                'a' if value.hour12().0 => "PM".to_string(),
                'a' => "AM".to_string(),
                _ => String::new(),
            };
            out.push_str(&rendered);
        }
        out
    }

    /// Read a value written in this pattern.
    ///
    /// Missing year defaults to the year of `today`; a pattern without any
    /// date field yields a time on `today`.
    pub fn parse(&self, input: &str, language: &str, today: NaiveDate) -> Option<NaiveDateTime> {
        let names = names(language);
        let mut rest = input.trim();
        let mut year = None;
        let mut month = None;
        let mut day = None;
        let (mut hour, mut minute, mut second) = (0, 0, 0);
        let mut pm = None;

        for (index, token) in self.tokens.iter().enumerate() {
            rest = rest.trim_start();
            let (symbol, width) = match token {
                Token::Literal(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        rest = strip_prefix_ignore_case(rest, text)?;
                    }
                    continue;
                }
                Token::Field { symbol, width } => (*symbol, *width),
            };

            match symbol {
                'M' if width >= 3 => {
                    let (found, tail) = match_name(rest, &[&names.months, &names.months_short])?;
                    month = Some(found as u32 + 1);
                    rest = tail;
                }
                'E' => {
                    rest = match_name(rest, &[&names.weekdays, &names.weekdays_short])?.1;
                }
                'a' => {
                    if let Some(tail) = strip_prefix_ignore_case(rest, "AM") {
                        pm = Some(false);
                        rest = tail;
                    } else {
                        rest = strip_prefix_ignore_case(rest, "PM")?;
                        pm = Some(true);
                    }
                }
                'Q' => {
                    // Carries no information beyond the month
                    let tail = strip_prefix_ignore_case(rest, "Q").unwrap_or(rest);
                    rest = take_digits(tail, 1).1;
                }
                _ => {
                    let adjacent = self.tokens.get(index + 1).is_some_and(Token::is_numeric);
                    let limit = match symbol {
                        'y' if width == 2 => 2,
                        'y' => 4,
                        _ => 2,
                    };
                    let (digits, tail) = take_digits(rest, limit);
                    if digits.is_empty() || (adjacent && digits.len() != limit) {
                        return None;
                    }
                    let n: u32 = digits.parse().ok()?;
                    match symbol {
                        'y' if digits.len() <= 2 => year = Some(expand_two_digit_year(n)),
                        'y' => year = Some(n as i32),
                        'M' => month = Some(n),
                        'd' => day = Some(n),
                        'H' | 'h' => hour = n,
                        'm' => minute = n,
                        _ => second = n,
                    }
                    rest = tail;
                }
            }
        }
        if !rest.trim().is_empty() {
            return None;
        }

        match pm {
            Some(true) if hour < 12 => hour += 12,
            Some(false) if hour == 12 => hour = 0,
            _ => {}
        }
        let date = if year.is_none() && month.is_none() && day.is_none() {
            today
        } else {
            NaiveDate::from_ymd_opt(
                year.unwrap_or_else(|| today.year()),
                month.unwrap_or(1),
                day.unwrap_or(1),
            )?
        };
        date.and_hms_opt(hour, minute, second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[rstest]
    #[case("dd.MM.yyyy", "en", "05.03.2024")]
    #[case("d.M.yy", "en", "5.3.24")]
    #[case("EEEE, d. MMMM yyyy", "de", "Dienstag, 5. März 2024")]
    #[case("EEE MMM d", "en", "Tue Mar 5")]
    #[case("QQQ yyyy", "en", "Q1 2024")]
    #[case("QQQQ", "de", "1. Quartal")]
    #[case("h:mm a", "en", "2:07 PM")]
    #[case("HH:mm:ss", "en", "14:07:09")]
    #[case("yyyy-MM-dd'T'HH:mm", "en", "2024-03-05T14:07")]
    #[case("'o''clock' H", "en", "o'clock 14")]
    fn test_format(#[case] pattern: &str, #[case] language: &str, #[case] expected: &str) {
        let compiled = DisplayPattern::compile(pattern).unwrap();
        assert_eq!(compiled.format(&at(2024, 3, 5, 14, 7, 9), language), expected);
    }

    #[rstest]
    #[case("dd.MM.yyyy", "05.03.2024", at(2024, 3, 5, 0, 0, 0))]
    #[case("d.M.yy", "5.3.24", at(2024, 3, 5, 0, 0, 0))]
    #[case("ddMMyyyy", "05032024", at(2024, 3, 5, 0, 0, 0))]
    #[case("d. MMMM yyyy", "5. march 2024", at(2024, 3, 5, 0, 0, 0))]
    #[case("M/d/yyyy h:mm a", "3/5/2024 12:30 am", at(2024, 3, 5, 0, 30, 0))]
    #[case("dd.MM.", "07.08.", at(2023, 8, 7, 0, 0, 0))]
    #[case("HH:mm", "09:15", at(2023, 6, 1, 9, 15, 0))]
    fn test_parse(#[case] pattern: &str, #[case] input: &str, #[case] expected: NaiveDateTime) {
        let today = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let compiled = DisplayPattern::compile(pattern).unwrap();
        assert_eq!(compiled.parse(input, "en", today), Some(expected));
    }

    #[rstest]
    #[case("dd.MM.yyyy", "5/3/2024")]
    #[case("dd.MM.yyyy", "32.01.2024")]
    #[case("ddMMyyyy", "5032024")]
    #[case("HH:mm", "09:15 extra")]
    fn test_parse_rejects(#[case] pattern: &str, #[case] input: &str) {
        let today = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let compiled = DisplayPattern::compile(pattern).unwrap();
        assert_eq!(compiled.parse(input, "en", today), None);
    }

    #[test]
    fn test_german_month_names_parse() {
        let today = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let compiled = DisplayPattern::compile("d. MMM yyyy").unwrap();
        assert_eq!(
            compiled.parse("1. Mär 2024", "de", today),
            Some(at(2024, 3, 1, 0, 0, 0))
        );
    }

    #[rstest]
    #[case("dd.MM.yyyy 'unterminated")]
    #[case("yyyy-MM-dd zzz")]
    fn test_compile_errors(#[case] pattern: &str) {
        let err = DisplayPattern::compile(pattern).unwrap_err();
        assert_eq!(err.code(), DT0304);
    }
}
