//! Data type error codes following a structured numbering system
//!
//! Error code ranges:
//! - DT0001-DT0099: Casting errors (input not interpretable as the type)
//! - DT0100-DT0199: Validation errors (input violates a declared constraint)
//! - DT0200-DT0299: Encryption errors
//! - DT0300-DT0399: Configuration errors (invalid type setup)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a casting error (0001-0099)
    pub const fn is_casting_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a validation error (0100-0199)
    pub const fn is_validation_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is an encryption error (0200-0299)
    pub const fn is_encryption_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a configuration error (0300-0399)
    pub const fn is_configuration_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DT{:04}", self.0)
    }
}

impl FromStr for ErrorCode {
    type Err = String;

    /// Accepts both `DT0101` and the bare number `101`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches("DT");
        digits
            .parse::<u16>()
            .map(Self)
            .map_err(|_| format!("Invalid error code '{}'", s))
    }
}

impl TryFrom<String> for ErrorCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        code.to_string()
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Casting errors (0001-0099)
    map.insert(1, ErrorInfo::new("Value cannot be converted to this data type"));
    map.insert(2, ErrorInfo::new("Invalid boolean value"));
    map.insert(3, ErrorInfo::new("Invalid number"));
    map.insert(4, ErrorInfo::new("Invalid integer"));
    map.insert(5, ErrorInfo::new("Invalid date"));
    map.insert(6, ErrorInfo::new("Invalid time"));
    map.insert(7, ErrorInfo::new("Invalid date/time"));
    map.insert(8, ErrorInfo::new("Invalid base64 value"));
    map.insert(9, ErrorInfo::new("Invalid hexadecimal value"));
    map.insert(10, ErrorInfo::new("Invalid bit string"));
    map.insert(11, ErrorInfo::new("Invalid IP address"));
    map.insert(12, ErrorInfo::new("Invalid IP range")
        .with_help("Use a wildcard (10.*.*.*), CIDR (10.0.0.0/8) or start-end range"));
    map.insert(13, ErrorInfo::new("Invalid semantic version"));
    map.insert(14, ErrorInfo::new("Invalid version constraint"));
    map.insert(15, ErrorInfo::new("Invalid UUID"));
    map.insert(16, ErrorInfo::new("Invalid JSON"));
    map.insert(17, ErrorInfo::new("Invalid regular expression"));
    map.insert(18, ErrorInfo::new("Invalid color"));
    map.insert(19, ErrorInfo::new("Invalid cron expression"));
    map.insert(20, ErrorInfo::new("Invalid email address"));
    map.insert(21, ErrorInfo::new("Invalid URL"));
    map.insert(22, ErrorInfo::new("Value not found in enumeration"));
    map.insert(23, ErrorInfo::new("Unknown enumeration key")
        .with_help("Enumeration keys are case-sensitive and come from developer configuration"));
    map.insert(24, ErrorInfo::new("Structured value where a scalar was expected"));
    map.insert(25, ErrorInfo::new("Invalid data URI"));
    map.insert(26, ErrorInfo::new("Invalid byte size"));
    map.insert(27, ErrorInfo::new("Invalid message code"));
    map.insert(28, ErrorInfo::new("Invalid metamodel alias"));
    map.insert(29, ErrorInfo::new("Operator has no inverse"));

    // Validation errors (0100-0199)
    map.insert(100, ErrorInfo::new("Value does not pass validation"));
    map.insert(101, ErrorInfo::new("Value is too short"));
    map.insert(102, ErrorInfo::new("Value is too long"));
    map.insert(103, ErrorInfo::new("Value does not match the required pattern"));
    map.insert(104, ErrorInfo::new("Value is below the minimum"));
    map.insert(105, ErrorInfo::new("Value exceeds the maximum"));
    map.insert(106, ErrorInfo::new("Binary value exceeds the maximum size"));
    map.insert(107, ErrorInfo::new("IP address family not allowed"));
    map.insert(108, ErrorInfo::new("Value is not one of the allowed values"));
    map.insert(109, ErrorInfo::new("URL scheme not allowed"));
    map.insert(110, ErrorInfo::new("Invalid list item"));
    map.insert(111, ErrorInfo::new("Invalid value inside encrypted field"));
    map.insert(112, ErrorInfo::new("Password does not meet the password policy"));

    // Encryption errors (0200-0299)
    map.insert(200, ErrorInfo::new("Encryption failed"));
    map.insert(201, ErrorInfo::new("Decryption failed")
        .with_help("The ciphertext was modified or was encrypted with a different secret"));
    map.insert(202, ErrorInfo::new("Invalid encryption secret"));
    map.insert(203, ErrorInfo::new("Secret store unavailable"));

    // Configuration errors (0300-0399)
    map.insert(300, ErrorInfo::new("Invalid data type configuration"));
    map.insert(301, ErrorInfo::new("Unknown data type"));
    map.insert(302, ErrorInfo::new("Invalid validator regex"));
    map.insert(303, ErrorInfo::new("Encrypted data types cannot be nested"));
    map.insert(304, ErrorInfo::new("Invalid display pattern"));

    map
});

// Casting errors
pub const DT0001: ErrorCode = ErrorCode::new(1);
pub const DT0002: ErrorCode = ErrorCode::new(2);
pub const DT0003: ErrorCode = ErrorCode::new(3);
pub const DT0004: ErrorCode = ErrorCode::new(4);
pub const DT0005: ErrorCode = ErrorCode::new(5);
pub const DT0006: ErrorCode = ErrorCode::new(6);
pub const DT0007: ErrorCode = ErrorCode::new(7);
pub const DT0008: ErrorCode = ErrorCode::new(8);
pub const DT0009: ErrorCode = ErrorCode::new(9);
pub const DT0010: ErrorCode = ErrorCode::new(10);
pub const DT0011: ErrorCode = ErrorCode::new(11);
pub const DT0012: ErrorCode = ErrorCode::new(12);
pub const DT0013: ErrorCode = ErrorCode::new(13);
pub const DT0014: ErrorCode = ErrorCode::new(14);
pub const DT0015: ErrorCode = ErrorCode::new(15);
pub const DT0016: ErrorCode = ErrorCode::new(16);
pub const DT0017: ErrorCode = ErrorCode::new(17);
pub const DT0018: ErrorCode = ErrorCode::new(18);
pub const DT0019: ErrorCode = ErrorCode::new(19);
pub const DT0020: ErrorCode = ErrorCode::new(20);
pub const DT0021: ErrorCode = ErrorCode::new(21);
pub const DT0022: ErrorCode = ErrorCode::new(22);
pub const DT0023: ErrorCode = ErrorCode::new(23);
pub const DT0024: ErrorCode = ErrorCode::new(24);
pub const DT0025: ErrorCode = ErrorCode::new(25);
pub const DT0026: ErrorCode = ErrorCode::new(26);
pub const DT0027: ErrorCode = ErrorCode::new(27);
pub const DT0028: ErrorCode = ErrorCode::new(28);
pub const DT0029: ErrorCode = ErrorCode::new(29);

// Validation errors
pub const DT0100: ErrorCode = ErrorCode::new(100);
pub const DT0101: ErrorCode = ErrorCode::new(101);
pub const DT0102: ErrorCode = ErrorCode::new(102);
pub const DT0103: ErrorCode = ErrorCode::new(103);
pub const DT0104: ErrorCode = ErrorCode::new(104);
pub const DT0105: ErrorCode = ErrorCode::new(105);
pub const DT0106: ErrorCode = ErrorCode::new(106);
pub const DT0107: ErrorCode = ErrorCode::new(107);
pub const DT0108: ErrorCode = ErrorCode::new(108);
pub const DT0109: ErrorCode = ErrorCode::new(109);
pub const DT0110: ErrorCode = ErrorCode::new(110);
pub const DT0111: ErrorCode = ErrorCode::new(111);
pub const DT0112: ErrorCode = ErrorCode::new(112);

// Encryption errors
pub const DT0200: ErrorCode = ErrorCode::new(200);
pub const DT0201: ErrorCode = ErrorCode::new(201);
pub const DT0202: ErrorCode = ErrorCode::new(202);
pub const DT0203: ErrorCode = ErrorCode::new(203);

// Configuration errors
pub const DT0300: ErrorCode = ErrorCode::new(300);
pub const DT0301: ErrorCode = ErrorCode::new(301);
pub const DT0302: ErrorCode = ErrorCode::new(302);
pub const DT0303: ErrorCode = ErrorCode::new(303);
pub const DT0304: ErrorCode = ErrorCode::new(304);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(DT0001.to_string(), "DT0001");
        assert_eq!(DT0101.to_string(), "DT0101");
    }

    #[test]
    fn test_error_categories() {
        assert!(DT0005.is_casting_error());
        assert!(!DT0005.is_validation_error());

        assert!(DT0102.is_validation_error());
        assert!(!DT0102.is_casting_error());

        assert!(DT0201.is_encryption_error());
        assert!(DT0303.is_configuration_error());
    }

    #[test]
    fn test_error_info() {
        assert_eq!(DT0005.info().description, "Invalid date");
        assert!(DT0201.info().help.is_some());
        assert_eq!(ErrorCode::new(999).info().description, "Unknown error");
    }

    #[test]
    fn test_parse_error_code() {
        assert_eq!("DT0106".parse::<ErrorCode>().unwrap(), DT0106);
        assert_eq!("106".parse::<ErrorCode>().unwrap(), DT0106);
        assert!("DTX".parse::<ErrorCode>().is_err());
    }
}
