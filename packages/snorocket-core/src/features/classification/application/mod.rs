//! Classification use case

pub mod classifier;

pub use classifier::{ClassificationMode, ClassificationOutcome, Classifier};
