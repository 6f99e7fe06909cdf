//! Lifetime sample counter, persisted once per increment.

use anyhow::Result;

use crate::storage::KeyValueStore;

const COUNTER_KEY: &str = "samples_recorded";

/// Monotonic count of samples taken across process restarts. Independent
/// of the track's row count; clearing or re-exporting a track never
/// touches it.
pub struct SampleCounter {
    store: Box<dyn KeyValueStore>,
    count: i64,
}

impl SampleCounter {
    /// Load the last persisted value, defaulting to 0.
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        let count = store.get_i64(COUNTER_KEY, 0);
        Self { store, count }
    }

    /// Bump the count and persist it immediately. The in-memory count
    /// advances even when persistence fails, so a retry on the next
    /// sample cannot double-count.
    pub fn increment(&mut self) -> Result<i64> {
        self.count += 1;
        self.store.set_i64(COUNTER_KEY, self.count)?;
        Ok(self.count)
    }

    pub fn count(&self) -> i64 {
        self.count
    }
}
