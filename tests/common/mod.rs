#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use expense_tracker::{
    core::{FinanceTracker, FixedClock, SyncPolicy},
    storage::{JsonStore, MemoryStore},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

pub fn days_ago(days: i64) -> NaiveDate {
    today() - chrono::Duration::days(days)
}

pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::on(today()))
}

/// Creates a JSON store rooted in a unique directory kept alive for the whole run.
pub fn json_store(retention: usize) -> JsonStore {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    JsonStore::new(Some(base), Some(retention)).expect("create json store")
}

pub fn memory_tracker(policy: SyncPolicy) -> (FinanceTracker, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let tracker = FinanceTracker::open(store.clone(), "tester", policy, clock())
        .expect("open tracker over memory store");
    (tracker, store)
}

pub fn json_tracker(store: &JsonStore, owner: &str) -> FinanceTracker {
    FinanceTracker::open(
        Arc::new(store.clone()),
        owner,
        SyncPolicy::WriteThrough,
        clock(),
    )
    .expect("open tracker over json store")
}
