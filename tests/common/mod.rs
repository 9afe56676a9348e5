#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use squareone::{
    core::{time::FixedClock, AccountStore},
    storage::{JsonFileStore, StorageKeys},
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that outlives the calling test.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Mid-October 2023, the month the seed data lives in.
pub fn october() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 10, 20, 12, 0, 0).unwrap()
}

pub fn open_store(dir: &PathBuf, now: DateTime<Utc>) -> AccountStore {
    let storage = JsonFileStore::new(dir.clone()).expect("create json file store");
    AccountStore::open(Box::new(storage), Box::new(FixedClock(now)), StorageKeys::default())
        .expect("open account store")
}

pub fn dec(value: &str) -> Decimal {
    value.parse().expect("decimal literal")
}
