//! Behaviour shared by every data type of the catalog

use chrono::NaiveDate;
use metatypes_model::{FileSecretStore, MemorySecretStore};
use metatypes_types::enums::LogLevel;
use metatypes_types::validators::{ip, semver};
use metatypes_types::{
    BuiltinType, Clock, Configurable, DataType, EncryptedDataType, EncryptionKeyProvider,
    EnumDataType, Enumeration, FixedEnum, PasswordDataType, TypeContext, Value,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

fn leap_day() -> TypeContext {
    TypeContext::default().with_clock(Clock::Fixed(
        NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap(),
    ))
}

fn instance(t: BuiltinType) -> Arc<dyn DataType> {
    t.instantiate(None, leap_day()).unwrap()
}

#[rstest]
#[case(BuiltinType::Boolean, "yes")]
#[case(BuiltinType::Integer, "42")]
#[case(BuiltinType::Date, "24.12.2023")]
#[case(BuiltinType::Date, "+1y")]
#[case(BuiltinType::Time, "7pm")]
#[case(BuiltinType::DateTime, "2024-01-05T13:45")]
#[case(BuiltinType::Uuid, "{3F2504E0-4F89-11D3-9A0C-0305E82C3301}")]
#[case(BuiltinType::IpAddress, "[::1]")]
#[case(BuiltinType::SemanticVersion, "v1.2.3")]
#[case(BuiltinType::Binary, "SGVsbG8=")]
#[case(BuiltinType::List, " a , b ")]
fn test_cast_is_idempotent(#[case] t: BuiltinType, #[case] input: &str) {
    let data_type = instance(t);
    let once = data_type.cast(&Value::from(input)).unwrap();
    let twice = data_type.cast(&once).unwrap();
    assert_eq!(once, twice, "{} is not idempotent for {:?}", t.alias(), input);
}

#[rstest]
#[case("0", "2024-02-29")]
#[case("+1y", "2025-02-28")]
#[case("-1m", "2024-01-29")]
#[case("1999", "1999-01-01")]
#[case("3112", "2024-12-31")]
fn test_relative_and_short_dates(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(
        instance(BuiltinType::Date).parse(&Value::from(input)).unwrap(),
        Value::from(expected)
    );
}

#[test]
fn test_zero_quadruple_is_not_a_date() {
    let date = instance(BuiltinType::Date);
    assert!(!date.validate(&Value::from("0000")));
    assert!(date.parse(&Value::from("0000")).unwrap_err().is_validation());
}

#[test]
fn test_format_is_deterministic() {
    for t in BuiltinType::ALL {
        let data_type = instance(*t);
        let value = Value::from("2024-03-05");
        assert_eq!(data_type.format(&value), data_type.format(&value));
    }
}

#[test]
fn test_sensitive_values_never_reach_messages() {
    let password = PasswordDataType::default();
    let err = password.parse(&Value::from("hunter2")).unwrap_err();
    assert!(err.is_validation());
    assert!(!err.to_string().contains("hunter2"));
    assert!(!err.message().contains("hunter2"));
}

#[test]
fn test_copies_are_independent() {
    let original = metatypes_types::StringDataType::default().with_name("Original");
    let copy = original.box_clone();
    let renamed = original.with_name("Renamed");
    assert_eq!(copy.name(), "Original");
    assert_eq!(renamed.name(), "Renamed");
}

#[test]
fn test_encrypted_values_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("installation.json");
    let encrypted = |store: FileSecretStore| {
        EncryptedDataType::new().with_context(
            TypeContext::default().with_keys(Arc::new(EncryptionKeyProvider::new(Arc::new(store)))),
        )
    };

    let stored = encrypted(FileSecretStore::new(&path))
        .parse(&Value::from("s3cret"))
        .unwrap();
    let reread = encrypted(FileSecretStore::new(&path));
    assert_eq!(reread.decrypt(&stored).unwrap(), Value::from("s3cret"));

    let again = reread.parse(&stored).unwrap();
    assert_ne!(again, stored);
    assert_eq!(reread.decrypt(&again).unwrap(), Value::from("s3cret"));
}

#[test]
fn test_encrypted_without_store_reports_encryption_error() {
    let err = EncryptedDataType::new()
        .with_context(TypeContext::default())
        .parse(&Value::from("x"))
        .unwrap_err();
    assert!(err.is_encryption());
    let with_store = EncryptedDataType::new().with_context(TypeContext::default().with_keys(
        Arc::new(EncryptionKeyProvider::new(Arc::new(MemorySecretStore::new()))),
    ));
    assert!(with_store.parse(&Value::from("x")).is_ok());
}

#[rstest]
#[case("192.168.1.5", "192.168.1.0/24", true)]
#[case("192.168.2.5", "192.168.1.0/24", false)]
#[case("10.0.0.7", "10.0.0.*", true)]
#[case("10.0.0.7", "10.0.0.1-10.0.0.5", false)]
#[case("2001:db8::1", "2001:db8::/32", true)]
#[case("2001:db9::1", "2001:db8::/32", false)]
fn test_ip_ranges(#[case] address: &str, #[case] range: &str, #[case] expected: bool) {
    assert_eq!(ip::is_ip_in_range(address, range), expected);
}

#[test]
fn test_semver_selection() {
    let versions = ["1.2.0", "1.3.0", "1.2.5", "2.0.0"];
    assert_eq!(
        semver::find_version_best("^1.2", &versions).unwrap().as_deref(),
        Some("1.3.0")
    );
    assert_eq!(
        semver::find_version_best("~1.2", &versions).unwrap().as_deref(),
        Some("1.2.5")
    );
    assert_eq!(semver::find_version_best(">=3", &versions).unwrap(), None);
}

#[test]
fn test_fixed_enums_are_stable() {
    let keys: Vec<&str> = LogLevel::ALL.iter().map(|l| l.key()).collect();
    assert_eq!(
        keys,
        ["Debug", "Info", "Notice", "Warning", "Error", "Critical", "Alert", "Emergency"]
    );
    let log_level = instance(BuiltinType::LogLevel);
    assert!(log_level.validate(&Value::from("error")));
    assert!(!log_level.validate(&Value::from("loud")));
}

#[test]
fn test_dynamic_enum_value_set() {
    let mut colors = EnumDataType::from_uxon(&json!({"values": {"r": "Red"}})).unwrap();
    colors.set_values([("g", "Green"), ("b", "Blue")]);
    assert!(colors.parse(&Value::from("g")).is_ok());
    assert!(colors.parse(&Value::from("r")).is_err());
    assert_eq!(colors.label_of(&Value::from("b")).as_deref(), Some("Blue"));
    assert_eq!(colors.label_of(&Value::from("x")), None);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_validate_agrees_with_cast(input in "[ -~]{0,24}") {
        for t in BuiltinType::ALL {
            let data_type = instance(*t);
            let value = Value::from(input.as_str());
            prop_assert_eq!(data_type.validate(&value), data_type.cast(&value).is_ok());
        }
    }
}
