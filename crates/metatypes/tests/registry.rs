//! End-to-end tests through the type registry

use chrono::NaiveDate;
use metatypes::model::{FileSecretStore, StaticLocale};
use metatypes::types::{Clock, EncryptionKeyProvider};
use metatypes::{DataType, TypeContext, TypeRegistry, Value};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;
use std::thread;

fn registry() -> Arc<TypeRegistry> {
    let now = NaiveDate::from_ymd_opt(2024, 2, 29)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    TypeRegistry::new(
        TypeContext::default()
            .with_clock(Clock::Fixed(now))
            .with_locale(Arc::new(StaticLocale::new("de_DE"))),
    )
}

#[rstest]
#[case("Date", "24.12.2023", "2023-12-24")]
#[case("Date", "+1y", "2025-02-28")]
#[case("Boolean", "on", "true")]
#[case("Integer", "1.234", "1234")]
#[case("IPAddress", "::FFFF:192.168.0.1", "::ffff:192.168.0.1")]
fn test_parse_by_alias(#[case] alias: &str, #[case] input: &str, #[case] expected: &str) {
    let data_type = registry().create(alias, None).unwrap();
    assert_eq!(
        data_type.parse(&Value::from(input)).unwrap().to_plain_string(),
        expected
    );
}

#[test]
fn test_list_of_dates_formats_per_locale() {
    let dates = registry()
        .create("List", Some(&json!({"value_type": "Date", "delimiter": ";"})))
        .unwrap();
    let parsed = dates.parse(&Value::from("1.3.2024; 0")).unwrap();
    assert_eq!(parsed, Value::from("2024-03-01;2024-02-29"));
    assert_eq!(dates.format(&parsed), "01.03.2024; 29.02.2024");
}

#[test]
fn test_encrypted_list_item_type() {
    let dir = tempfile::tempdir().unwrap();
    let keys = Arc::new(EncryptionKeyProvider::new(Arc::new(FileSecretStore::new(
        dir.path().join("installation.json"),
    ))));
    let registry = TypeRegistry::new(TypeContext::default().with_keys(keys));
    registry
        .register("Pin", "String", json!({"validator_regex": "/^[0-9]{4}$/"}))
        .unwrap();
    let pin = registry
        .create("Encrypted", Some(&json!({"inner_type": "Pin"})))
        .unwrap();

    let stored = pin.parse(&Value::from("1234")).unwrap();
    assert!(stored.to_plain_string().starts_with("$$~~"));
    assert_eq!(pin.format(&stored), "1234");
    assert!(pin.parse(&Value::from("12a4")).unwrap_err().is_validation());
}

#[test]
fn test_shared_instances_across_threads() {
    let registry = registry();
    let list: Arc<dyn DataType> = registry
        .create("List", Some(&json!({"value_type": "Integer"})))
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let list = Arc::clone(&list);
            thread::spawn(move || list.parse(&Value::from(format!("{}, {}", i, i + 1))).unwrap())
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(
            handle.join().unwrap(),
            Value::from(format!("{},{}", i, i + 1))
        );
    }
}
