//! Classifier configuration
//!
//! Two levels, following the same progressive-disclosure approach as the rest
//! of the crate:
//! - Level 1: Preset - one-liner for the common cases
//! - Level 2: Builder / YAML - adjust individual fields
//!
//! # Examples
//!
//! ```rust,ignore
//! use snorocket_core::config::{ClassifierConfig, Preset};
//!
//! let config = ClassifierConfig::from_preset(Preset::Throughput);
//!
//! let config = ClassifierConfig::default()
//!     .num_threads(Some(4))
//!     .parallel_threshold(32);
//!
//! let config = ClassifierConfig::from_yaml("classifier.yaml")?;
//! ```

pub mod classifier_config;
pub mod error;
pub mod preset;

// Re-exports
pub use classifier_config::ClassifierConfig;
pub use error::{ConfigError, ConfigResult};
pub use preset::Preset;
