//! Fixed enumerations used across the platform

use super::fixed::fixed_enum;
use super::FixedEnumDataType;

fixed_enum! {
    /// Sort order
    pub enum SortingDirection ("SortingDirection") {
        Asc = "ASC" => "Ascending",
        Desc = "DESC" => "Descending",
    }
}

impl SortingDirection {
    pub fn is_ascending(self) -> bool {
        self == Self::Asc
    }

    pub fn reverse(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl Default for SortingDirection {
    /// Descending unless a type says otherwise
    fn default() -> Self {
        Self::Desc
    }
}

fixed_enum! {
    /// PSR-3 log levels, from least to most severe
    pub enum LogLevel ("LogLevel") {
        Debug = "debug" => "Debug",
        Info = "info" => "Info",
        Notice = "notice" => "Notice",
        Warning = "warning" => "Warning",
        Error = "error" => "Error",
        Critical = "critical" => "Critical",
        Alert = "alert" => "Alert",
        Emergency = "emergency" => "Emergency",
    }
}

impl LogLevel {
    /// Position on the severity scale, `Debug` being 0
    pub fn severity(self) -> usize {
        use super::FixedEnum;
        Self::ALL.iter().position(|l| *l == self).unwrap_or_default()
    }

    /// Whether `self` is at least as severe as `other`
    pub fn is_at_least(self, other: LogLevel) -> bool {
        self.severity() >= other.severity()
    }

    /// Closest level of the `log` facade
    pub fn to_log_level(self) -> log::Level {
        match self {
            Self::Debug => log::Level::Debug,
            Self::Info | Self::Notice => log::Level::Info,
            Self::Warning => log::Level::Warn,
            Self::Error | Self::Critical | Self::Alert | Self::Emergency => log::Level::Error,
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace | log::Level::Debug => Self::Debug,
            log::Level::Info => Self::Info,
            log::Level::Warn => Self::Warning,
            log::Level::Error => Self::Error,
        }
    }
}

fixed_enum! {
    /// Priority header values of outgoing emails
    pub enum EmailPriority ("EmailPriority") {
        Highest = 1 => "Highest",
        High = 2 => "High",
        Normal = 3 => "Normal",
        Low = 4 => "Low",
        Lowest = 5 => "Lowest",
    }
}

pub type SortingDirectionDataType = FixedEnumDataType<SortingDirection>;
pub type LogLevelDataType = FixedEnumDataType<LogLevel>;
pub type EmailPriorityDataType = FixedEnumDataType<EmailPriority>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::DataType;
    use crate::enums::{Enumeration, FixedEnum};
    use crate::value::Value;
    use rstest::rstest;

    #[test]
    fn test_log_levels_in_severity_order() {
        assert!(LogLevel::Critical.is_at_least(LogLevel::Error));
        assert!(!LogLevel::Notice.is_at_least(LogLevel::Warning));
        assert_eq!(LogLevel::Debug.severity(), 0);
        assert_eq!(LogLevel::ALL.len(), 8);
    }

    #[rstest]
    #[case(LogLevel::Notice, log::Level::Info)]
    #[case(LogLevel::Warning, log::Level::Warn)]
    #[case(LogLevel::Alert, log::Level::Error)]
    fn test_to_log_level(#[case] level: LogLevel, #[case] expected: log::Level) {
        assert_eq!(level.to_log_level(), expected);
    }

    #[test]
    fn test_email_priority_by_name() {
        let t = EmailPriorityDataType::new();
        assert_eq!(t.parse(&Value::from("high")).unwrap(), Value::Integer(2));
        assert_eq!(t.parse(&Value::from(5)).unwrap(), Value::Integer(5));
        assert!(t.parse(&Value::from(9)).is_err());
        assert_eq!(t.value_of("Lowest").unwrap(), Value::Integer(5));
    }

    #[test]
    fn test_sorting_direction() {
        let t = SortingDirectionDataType::new();
        assert_eq!(t.variant(&Value::from("asc")).unwrap(), Some(SortingDirection::Asc));
        assert_eq!(SortingDirection::default(), SortingDirection::Desc);
        assert_eq!(SortingDirection::Asc.reverse(), SortingDirection::Desc);
        assert_eq!(SortingDirection::Desc.to_string(), "DESC");
    }
}
