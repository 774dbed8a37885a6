//! File-backed secret store tests

use metatypes_model::{FileSecretStore, SecretStore, SecretStoreError};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::thread;

#[test]
fn test_roundtrip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config").join("installation.json");

    let store = FileSecretStore::new(&path);
    assert!(store.get_variable("SECRET").unwrap().is_none());

    store.set_variable("SECRET", "abc").unwrap();
    store.set_variable("OTHER", "xyz").unwrap();

    // A fresh store over the same file sees the persisted values
    let reopened = FileSecretStore::new(&path);
    assert_eq!(reopened.get_variable("SECRET").unwrap().as_deref(), Some("abc"));
    assert_eq!(reopened.get_variable("OTHER").unwrap().as_deref(), Some("xyz"));
}

#[test]
fn test_concurrent_set_if_absent_single_winner() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileSecretStore::new(dir.path().join("vars.json")));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store
                    .set_variable_if_absent("SECRET", &format!("candidate-{}", i))
                    .unwrap()
            })
        })
        .collect();

    let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let stored = store.get_variable("SECRET").unwrap().unwrap();
    assert!(results.iter().all(|r| *r == stored));
}

#[test]
fn test_corrupt_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vars.json");
    std::fs::write(&path, "not json").unwrap();

    let store = FileSecretStore::new(&path);
    assert!(matches!(
        store.get_variable("SECRET"),
        Err(SecretStoreError::Corrupt { .. })
    ));
}
