//! Preset configurations
//!
//! Presets provide complete default configurations for common use cases.

use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Single worker, every round runs inline
    ///
    /// Useful for debugging and for reproducing a run step by step.
    Sequential,

    /// Default: parallel rounds once enough contexts are active
    Balanced,

    /// Large terminologies: all cores, eager parallel rounds,
    /// deep overlay stacks before compaction
    Throughput,

    /// Custom: user-defined (YAML or builder)
    Custom,
}

impl Preset {
    /// Parse preset from string
    pub fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "balanced" => Ok(Self::Balanced),
            "throughput" => Ok(Self::Throughput),
            "custom" => Ok(Self::Custom),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }

    /// Preset name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Balanced => "balanced",
            Self::Throughput => "throughput",
            Self::Custom => "custom",
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::Balanced
    }
}
