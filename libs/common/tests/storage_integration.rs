//! Integration tests for the storage component
//!
//! These tests verify that the file-backed key-value store honors the
//! environment-driven configuration and performs durable round trips.

use common::storage::{KeyValueStore, StorageConfig};
use serial_test::serial;

/// Test that the env-driven configuration resolves and the store performs a
/// full set/get/delete round trip against it
#[test]
#[serial]
fn test_storage_integration() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir().join(format!("adminhub-int-{}", std::process::id()));
    // SAFETY: #[serial] guarantees no concurrent test touches the environment.
    unsafe { std::env::set_var("ADMINHUB_STATE_DIR", &dir) };

    let config = StorageConfig::from_env()?;
    assert_eq!(config.dir, dir);

    let store = KeyValueStore::open(&config)?;

    let test_key = "token";
    let test_value = "integration_test_value";

    store.set(test_key, test_value)?;

    // A second handle over the same directory observes the write.
    let other = KeyValueStore::open(&config)?;
    assert_eq!(
        other.get(test_key)?,
        Some(test_value.to_string()),
        "storage SET/GET test failed"
    );

    store.delete(test_key)?;
    assert_eq!(other.get(test_key)?, None, "storage delete failed");

    unsafe { std::env::remove_var("ADMINHUB_STATE_DIR") };
    Ok(())
}
