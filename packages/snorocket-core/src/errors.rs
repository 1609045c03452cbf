//! Error types for snorocket-core
//!
//! Provides unified error handling across the crate.

use crate::config::ConfigError;
use crate::features::concept_set::CollectionError;
use crate::features::model::{LiteralKind, ModelError};
use thiserror::Error;

/// Main error type for classifier operations
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// A feature is restricted with literals of different kinds
    #[error("Feature '{feature}' mixes {expected} and {found} literals")]
    LiteralTypeMismatch {
        feature: String,
        expected: LiteralKind,
        found: LiteralKind,
    },

    /// Model construction or comparison error
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Unsupported mutation of a read-only collection
    #[error("Collection error: {0}")]
    Collection(#[from] CollectionError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl ClassifierError {
    /// Create a literal mismatch error for a feature
    pub fn literal_mismatch(
        feature: impl Into<String>,
        expected: LiteralKind,
        found: LiteralKind,
    ) -> Self {
        ClassifierError::LiteralTypeMismatch {
            feature: feature.into(),
            expected,
            found,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for ClassifierError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        ClassifierError::ThreadPool(err.to_string())
    }
}

/// Result type alias for classifier operations
pub type Result<T> = std::result::Result<T, ClassifierError>;
