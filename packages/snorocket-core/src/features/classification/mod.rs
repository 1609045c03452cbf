//! Classification - EL++ saturation and taxonomy extraction
//!
//! Hexagonal Architecture:
//! - domain: normal forms and the internal id factory
//! - infrastructure: normaliser, indexes, saturation engine, taxonomy builder
//! - application: [`Classifier`], the facade driving full and incremental runs

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{ClassificationMode, ClassificationOutcome, Classifier};
pub use domain::{IdFactory, NormalForm};
