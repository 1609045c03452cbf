//! Classifier configuration
//!
//! One struct covers the whole engine: worker pool sizing, when a saturation
//! round goes parallel, and how incremental runs layer their state.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use crate::shared::constants::{saturation::PARALLEL_THRESHOLD, taxonomy::MAX_OVERLAY_DEPTH};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Upper bound for an explicit worker count
const MAX_THREADS: usize = 512;

/// Classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierConfig {
    /// Preset this configuration was derived from
    pub preset: Preset,

    /// Dedicated worker pool size (None = shared global rayon pool)
    pub num_threads: Option<usize>,

    /// Minimum active contexts before a saturation round runs in parallel
    pub parallel_threshold: usize,

    /// Reuse saturated state across runs of the same ontology
    pub incremental: bool,

    /// Layered maps deeper than this are flattened at the next increment
    pub max_overlay_depth: usize,
}

impl ClassifierConfig {
    /// Get preset configuration
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Sequential => Self {
                preset,
                num_threads: Some(1),
                parallel_threshold: usize::MAX,
                incremental: true,
                max_overlay_depth: 4,
            },
            Preset::Balanced => Self {
                preset,
                num_threads: None,
                parallel_threshold: PARALLEL_THRESHOLD,
                incremental: true,
                max_overlay_depth: MAX_OVERLAY_DEPTH,
            },
            Preset::Throughput => Self {
                preset,
                num_threads: Some(num_cpus::get().clamp(1, MAX_THREADS)),
                parallel_threshold: 16,
                incremental: true,
                max_overlay_depth: 32,
            },
            Preset::Custom => Self {
                preset,
                ..Self::from_preset(Preset::Balanced)
            },
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(n) = self.num_threads {
            if n == 0 || n > MAX_THREADS {
                return Err(ConfigError::range_with_hint(
                    "num_threads",
                    n,
                    1,
                    MAX_THREADS,
                    "Use None to share the global rayon pool",
                ));
            }
        }

        if self.parallel_threshold == 0 {
            return Err(ConfigError::range_with_hint(
                "parallel_threshold",
                self.parallel_threshold,
                1,
                usize::MAX,
                "A round needs at least one active context",
            ));
        }

        if self.max_overlay_depth == 0 || self.max_overlay_depth > 1024 {
            return Err(ConfigError::range_with_hint(
                "max_overlay_depth",
                self.max_overlay_depth,
                1,
                1024,
                "Deep overlay stacks slow down every lookup",
            ));
        }

        Ok(())
    }

    /// Builder: Set num_threads
    pub fn num_threads(mut self, v: Option<usize>) -> Self {
        self.num_threads = v;
        self
    }

    /// Builder: Set parallel_threshold
    pub fn parallel_threshold(mut self, v: usize) -> Self {
        self.parallel_threshold = v;
        self
    }

    /// Builder: Set incremental
    pub fn incremental(mut self, v: bool) -> Self {
        self.incremental = v;
        self
    }

    /// Builder: Set max_overlay_depth
    pub fn max_overlay_depth(mut self, v: usize) -> Self {
        self.max_overlay_depth = v;
        self
    }

    /// Parse and validate a YAML document
    ///
    /// Starts from the named preset (Balanced when absent) and applies the
    /// fields the document sets.
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let overrides: ConfigOverrides = serde_yaml::from_str(yaml)?;
        let config = overrides.apply();
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// YAML document: a preset plus explicit field overrides
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigOverrides {
    preset: Option<Preset>,
    #[serde(deserialize_with = "explicit")]
    num_threads: Option<Option<usize>>,
    parallel_threshold: Option<usize>,
    incremental: Option<bool>,
    max_overlay_depth: Option<usize>,
}

impl ConfigOverrides {
    fn apply(self) -> ClassifierConfig {
        let mut config = ClassifierConfig::from_preset(self.preset.unwrap_or_default());
        if let Some(v) = self.num_threads {
            config.num_threads = v;
        }
        if let Some(v) = self.parallel_threshold {
            config.parallel_threshold = v;
        }
        if let Some(v) = self.incremental {
            config.incremental = v;
        }
        if let Some(v) = self.max_overlay_depth {
            config.max_overlay_depth = v;
        }
        config
    }
}

/// Tell an explicit `null` apart from a missing field
fn explicit<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}
