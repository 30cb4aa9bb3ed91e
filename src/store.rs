//! Concurrency-safe store of the latest result per check name.
//!
//! One reader/writer lock guards the map for the lifetime of the process.
//! Submissions take the write side; snapshots and queries take the read side.
//! Nothing inside the critical sections touches the filesystem.

use crate::types::{CheckResult, Details, Status};
use chrono::Utc;
use log::debug;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
pub struct ResultStore {
    results: RwLock<HashMap<String, CheckResult>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation is a single insert or clear, so a poisoned map is intact.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CheckResult>> {
        self.results.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CheckResult>> {
        self.results.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace the result for `name`, stamped with the current time.
    ///
    /// Details are stored as given; validation happens (leniently) when the
    /// report is built.
    pub fn submit(&self, name: &str, status: Status, details: Details, error: Option<&str>) {
        let result = CheckResult {
            name: name.to_string(),
            status,
            details,
            error_message: error.map(|e| e.to_string()),
            timestamp: Utc::now(),
        };

        self.write().insert(name.to_string(), result);
        debug!("Added test result: {} = {}", name, status);
    }

    /// Copy of every stored result, detached from the lock.
    pub fn get_all(&self) -> HashMap<String, CheckResult> {
        self.read().clone()
    }

    pub fn get(&self, name: &str) -> Option<CheckResult> {
        self.read().get(name).cloned()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Names of all checks currently holding `status`, sorted.
    pub fn names_where_status(&self, status: Status) -> Vec<String> {
        let mut names: Vec<String> =
            self.read().values().filter(|r| r.status == status).map(|r| r.name.clone()).collect();
        names.sort();
        names
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
