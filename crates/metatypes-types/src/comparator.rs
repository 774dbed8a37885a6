//! Relational operators used in filters and conditions

use crate::enums::{fixed_enum, FixedEnum, FixedEnumDataType};
use metatypes_diagnostics::{DataTypeError, Result, DT0029};

fixed_enum! {
    /// Comparison operator.
    ///
    /// `=` and `!=` compare loosely (e.g. substring match for strings),
    /// `==` and `!==` exactly.
    pub enum Comparator ("Comparator") {
        Is = "=" => "is",
        IsNot = "!=" => "is not",
        Equals = "==" => "equals",
        EqualsNot = "!==" => "does not equal",
        LessThan = "<" => "less than",
        LessThanOrEquals = "<=" => "less than or equal to",
        GreaterThan = ">" => "greater than",
        GreaterThanOrEquals = ">=" => "greater than or equal to",
        In = "[" => "in list",
        NotIn = "![" => "not in list",
        Between = ".." => "between",
    }
}

impl Comparator {
    /// Whether this is the negated form of an equality or membership test.
    ///
    /// Ordering operators and `..` are neither negated nor positive: `None`.
    pub fn is_negative(self) -> Option<bool> {
        match self {
            Self::Is | Self::Equals | Self::In => Some(false),
            Self::IsNot | Self::EqualsNot | Self::NotIn => Some(true),
            Self::LessThan
            | Self::LessThanOrEquals
            | Self::GreaterThan
            | Self::GreaterThanOrEquals
            | Self::Between => None,
        }
    }

    /// The operator yielding the logical negation for the same operands
    pub fn invert(self) -> Result<Self> {
        Ok(match self {
            Self::Is => Self::IsNot,
            Self::IsNot => Self::Is,
            Self::Equals => Self::EqualsNot,
            Self::EqualsNot => Self::Equals,
            Self::LessThan => Self::GreaterThanOrEquals,
            Self::GreaterThanOrEquals => Self::LessThan,
            Self::LessThanOrEquals => Self::GreaterThan,
            Self::GreaterThan => Self::LessThanOrEquals,
            Self::In => Self::NotIn,
            Self::NotIn => Self::In,
            Self::Between => {
                return Err(DataTypeError::casting(
                    DT0029,
                    format!("Comparator \"{}\" cannot be inverted", self),
                ));
            }
        })
    }

    /// Parse the operator symbol, e.g. `">="`
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.value().as_str() == Some(symbol.trim()))
    }

    pub fn symbol(self) -> String {
        self.value().to_plain_string()
    }
}

pub type ComparatorDataType = FixedEnumDataType<Comparator>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::DataType;
    use crate::value::Value;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(Comparator::GreaterThan, Comparator::LessThanOrEquals)]
    #[case(Comparator::LessThan, Comparator::GreaterThanOrEquals)]
    #[case(Comparator::In, Comparator::NotIn)]
    #[case(Comparator::Is, Comparator::IsNot)]
    #[case(Comparator::Equals, Comparator::EqualsNot)]
    fn test_invert(#[case] op: Comparator, #[case] expected: Comparator) {
        assert_eq!(op.invert().unwrap(), expected);
    }

    #[test]
    fn test_between_has_no_inverse() {
        let err = Comparator::Between.invert().unwrap_err();
        assert_eq!(err.code(), DT0029);
    }

    #[test]
    fn test_symbols() {
        assert_eq!(Comparator::from_symbol("!["), Some(Comparator::NotIn));
        assert_eq!(Comparator::from_symbol("<>"), None);
        assert_eq!(Comparator::GreaterThanOrEquals.symbol(), ">=");
    }

    #[test]
    fn test_data_type_accepts_symbols_and_keys() {
        let t = ComparatorDataType::new();
        assert_eq!(t.parse(&Value::from("==")).unwrap(), Value::from("=="));
        assert_eq!(t.parse(&Value::from("greaterthan")).unwrap(), Value::from(">"));
        assert!(t.parse(&Value::from("<>")).is_err());
    }

    fn invertible() -> impl Strategy<Value = Comparator> {
        prop::sample::select(
            Comparator::ALL
                .iter()
                .copied()
                .filter(|c| *c != Comparator::Between)
                .collect::<Vec<_>>(),
        )
    }

    proptest! {
        #[test]
        fn prop_invert_is_involution(op in invertible()) {
            prop_assert_eq!(op.invert().unwrap().invert().unwrap(), op);
        }

        #[test]
        fn prop_invert_flips_negation(op in invertible()) {
            let inverted = op.invert().unwrap();
            if let (Some(a), Some(b)) = (op.is_negative(), inverted.is_negative()) {
                prop_assert_ne!(a, b);
            }
        }
    }
}
