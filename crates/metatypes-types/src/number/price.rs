use super::{cast_decimal, parse_number, NumberOptions};
use crate::contract::{DataType, TypeMeta};
use crate::value::Value;
use metatypes_diagnostics::Result;
use serde::Deserialize;

/// Fraction digits of prices unless configured otherwise
pub const DEFAULT_PRECISION: u32 = 2;

const CURRENCY_SYMBOLS: &[char] = &['€', '$', '£', '¥'];

/// Monetary amount; configured precision defaults to two digits
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PriceDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub options: NumberOptions,
    /// Appended when formatting, e.g. `EUR`
    pub currency: Option<String>,
}

impl PriceDataType {
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    fn effective_options(&self) -> NumberOptions {
        NumberOptions {
            precision_min: Some(self.options.precision_min.unwrap_or(DEFAULT_PRECISION)),
            precision_max: Some(self.options.precision_max.unwrap_or(DEFAULT_PRECISION)),
            ..self.options.clone()
        }
    }

    fn strip_currency(&self, value: &Value) -> Value {
        let Value::String(s) = value else {
            return value.clone();
        };
        let mut stripped = s.trim();
        if let Some(currency) = &self.currency {
            stripped = stripped
                .strip_suffix(currency.as_str())
                .or_else(|| stripped.strip_prefix(currency.as_str()))
                .unwrap_or(stripped);
        }
        Value::string(stripped.trim_matches(|c: char| c.is_whitespace() || CURRENCY_SYMBOLS.contains(&c)))
    }
}

impl DataType for PriceDataType {
    crate::data_type_basics!("Price");

    fn cast(&self, value: &Value) -> Result<Value> {
        super::cast(&self.strip_currency(value))
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        Ok(
            parse_number(self, &self.effective_options(), &self.strip_currency(value), "a price")?
                .map(Value::Number)
                .unwrap_or(Value::Null),
        )
    }

    fn format(&self, value: &Value) -> String {
        let amount = match cast_decimal(&self.strip_currency(value), Some('.'), "a price") {
            Ok(Some(d)) => self.effective_options().format(self.context(), d),
            Ok(None) => return String::new(),
            Err(_) => return value.to_plain_string(),
        };
        match &self.currency {
            Some(currency) => format!("{} {}", amount, currency),
            None => amount,
        }
    }

    fn validation_description(&self) -> String {
        self.options.describe()
    }

    fn default_widget_type(&self) -> &'static str {
        "DisplayNumber"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_parse_rounds_to_cents() {
        let t = PriceDataType::default().with_currency("EUR");
        assert_eq!(
            t.parse(&Value::from("19.999 EUR")).unwrap(),
            Value::Number(Decimal::from_str("20.00").unwrap())
        );
        assert_eq!(
            t.parse(&Value::from("€ 5")).unwrap(),
            Value::Number(Decimal::from(5))
        );
    }

    #[test]
    fn test_format() {
        let mut t = PriceDataType::default().with_currency("EUR");
        t.options.show_thousands_separator = true;
        assert_eq!(t.format(&Value::from("1234.5")), "1,234.50 EUR");
        assert_eq!(PriceDataType::default().format(&Value::from(3)), "3.00");
    }
}
