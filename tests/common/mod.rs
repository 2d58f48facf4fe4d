// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use cookme::{BlobStore, HouseInventory, RecipeBook, StoreConfig};
use std::time::Duration;
use tempfile::TempDir;

/// Create a fresh store in a temporary directory.
///
/// Returns (TempDir, BlobStore) - keep the TempDir alive to prevent cleanup.
pub fn temp_store() -> (TempDir, BlobStore) {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(temp_dir.path().join("cookme.db"))
        .with_open_timeout(Duration::from_secs(5));
    let store = BlobStore::open(config).unwrap();
    (temp_dir, store)
}

/// Inventory and recipe book sharing one store file.
pub fn temp_kitchen() -> (TempDir, HouseInventory, RecipeBook) {
    let (temp_dir, store) = temp_store();
    let inventory = HouseInventory::open(store.clone()).unwrap();
    let book = RecipeBook::open(store).unwrap();
    (temp_dir, inventory, book)
}

/// A fixed "now" so expiration arithmetic is deterministic.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}
