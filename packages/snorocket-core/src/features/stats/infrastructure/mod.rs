//! Statistics collection
//!
//! Counters are gathered by visiting [`StatsSource`]s. Nested sources get a
//! dotted prefix, so the classifier reports names such as
//! `saturation.rounds` or `taxonomy.nodes_created`.

use super::ports::StatsSource;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter that can be reset
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    #[inline]
    pub fn add(&self, n: u64) {
        if n > 0 {
            self.0.fetch_add(n, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn incr(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a high-water mark
    #[inline]
    pub fn max(&self, value: u64) {
        self.0.fetch_max(value, Ordering::Relaxed);
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

/// Receives counters from a [`StatsSource`]
#[derive(Debug, Default)]
pub struct StatsSink {
    prefix: String,
    values: BTreeMap<String, u64>,
}

impl StatsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&mut self, name: &str, value: u64) {
        let key = if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.prefix, name)
        };
        self.values.insert(key, value);
    }

    /// Collect from a sub-component under `prefix`
    pub fn nested(&mut self, prefix: &str, source: &dyn StatsSource) {
        let saved = self.prefix.clone();
        self.prefix = if saved.is_empty() {
            prefix.to_string()
        } else {
            format!("{}.{}", saved, prefix)
        };
        source.collect_stats(self);
        self.prefix = saved;
    }

    pub fn into_map(self) -> BTreeMap<String, u64> {
        self.values
    }
}

/// Entry points for reading and resetting statistics
pub struct Stats;

impl Stats {
    /// Flattened counters of `source`, keyed by dotted name
    pub fn get_stats(source: &dyn StatsSource) -> BTreeMap<String, u64> {
        let mut sink = StatsSink::new();
        source.collect_stats(&mut sink);
        sink.into_map()
    }

    pub fn reset_stats(source: &dyn StatsSource) {
        source.reset_stats();
    }
}
