//! Statistics
//!
//! - ports: [`StatsSource`], implemented by every engine component
//! - infrastructure: [`Counter`], [`StatsSink`] and the [`Stats`] entry points

pub mod infrastructure;
pub mod ports;

pub use infrastructure::{Counter, Stats, StatsSink};
pub use ports::StatsSource;
