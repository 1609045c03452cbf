//! Common test utilities for snorocket-core
//!
//! Shared ontology builders and taxonomy assertions for the integration
//! tests.

#![allow(dead_code)]

mod assertions;
mod builders;

pub use assertions::*;
pub use builders::*;
