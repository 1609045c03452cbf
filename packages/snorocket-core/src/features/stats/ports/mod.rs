//! Statistics port

use super::infrastructure::StatsSink;

/// A component that exposes counters
///
/// Counters are atomics, so both methods work through a shared reference
/// while other threads keep counting.
pub trait StatsSource {
    /// Report every counter to `sink`
    fn collect_stats(&self, sink: &mut StatsSink);

    /// Zero every counter
    fn reset_stats(&self);
}
