use super::regex::StaticRegex;
use super::{parse_constrained, StringConstraints};
use crate::contract::{DataType, TypeMeta};
use crate::value::Value;
use metatypes_diagnostics::{describe_value, DataTypeError, Result, DT0021, DT0109};
use serde::Deserialize;

static ABSOLUTE_URL: StaticRegex =
    StaticRegex::new(r"^(?:[A-Za-z][A-Za-z0-9+.\-]*:)?//[^\s/?#]+(?:[/?#][^\s]*)?$");

/// Lower-cased scheme of an absolute URL; `None` for protocol-relative URLs
pub fn find_scheme(url: &str) -> Option<String> {
    let (scheme, _) = url.split_once("://")?;
    if scheme.is_empty() {
        return None;
    }
    Some(scheme.to_ascii_lowercase())
}

pub fn is_url(value: &str) -> bool {
    ABSOLUTE_URL.is_match(value)
}

pub fn cast(value: &Value) -> Result<Value> {
    let cast = super::cast(value)?;
    let Value::String(s) = &cast else {
        return Ok(cast);
    };
    let trimmed = s.trim();
    if trimmed.is_empty() || is_url(trimmed) {
        return Ok(Value::string(trimmed));
    }
    Err(DataTypeError::casting(
        DT0021,
        format!("{} is not a valid URL", describe_value(s, false)),
    ))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UrlDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub constraints: StringConstraints,
    /// Schemes accepted by `parse`, e.g. `["https"]`; empty allows all
    pub allowed_schemes: Vec<String>,
}

impl UrlDataType {
    pub fn with_allowed_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    fn check_scheme(&self, url: &str) -> Result<()> {
        if self.allowed_schemes.is_empty() || url.is_empty() {
            return Ok(());
        }
        let allowed = find_scheme(url).is_some_and(|scheme| {
            self.allowed_schemes
                .iter()
                .any(|a| a.eq_ignore_ascii_case(&scheme))
        });
        if allowed {
            return Ok(());
        }
        Err(DataTypeError::validation(
            DT0109,
            format!(
                "The URL {} does not use one of the allowed schemes: {}",
                describe_value(url, self.is_sensitive()),
                self.allowed_schemes.join(", ")
            ),
        ))
    }
}

impl DataType for UrlDataType {
    crate::data_type_basics!("Url");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast(value)
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        let parsed = parse_constrained(self, &self.constraints, value)?;
        if let Value::String(url) = &parsed {
            self.check_scheme(url)
                .map_err(|e| self.to_validation_error(e))?;
        }
        Ok(parsed)
    }

    fn validation_description(&self) -> String {
        if self.allowed_schemes.is_empty() {
            return self.constraints.describe();
        }
        let schemes = format!("scheme one of {}", self.allowed_schemes.join(", "));
        match self.constraints.describe() {
            d if d.is_empty() => schemes,
            d => format!("{}, {}", d, schemes),
        }
    }

    fn check_configuration(&self) -> Result<()> {
        self.constraints.check_configuration()
    }

    fn default_widget_type(&self) -> &'static str {
        "DisplayUrl"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://example.com", true)]
    #[case("http://example.com/path?q=1#top", true)]
    #[case("ftp://files.example.com/a.txt", true)]
    #[case("//cdn.example.com/lib.js", true)]
    #[case("example.com", false)]
    #[case("https://", false)]
    #[case("https://exa mple.com", false)]
    fn test_is_url(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_url(input), expected);
    }

    #[test]
    fn test_find_scheme() {
        assert_eq!(find_scheme("HTTPS://x.org").as_deref(), Some("https"));
        assert_eq!(find_scheme("//x.org"), None);
    }

    #[test]
    fn test_allowed_schemes() {
        let t = UrlDataType::default().with_allowed_schemes(["https"]);
        assert!(t.parse(&Value::from("https://example.com")).is_ok());
        let err = t.parse(&Value::from("http://example.com")).unwrap_err();
        assert_eq!(err.code(), DT0109);
        assert_eq!(t.validation_description(), "scheme one of https");
    }
}
