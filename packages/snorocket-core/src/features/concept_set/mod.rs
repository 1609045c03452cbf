//! Concept sets and maps
//!
//! Hexagonal Architecture:
//! - ports: `ConceptSet` / `ConceptMap` traits and `CollectionError`
//! - infrastructure: sparse, concurrent, layered and read-only implementations

pub mod infrastructure;
pub mod ports;

pub use infrastructure::{
    ConcurrentConceptSet, DuoConceptMap, ReadonlyConceptSet, SparseConceptMap, SparseConceptSet,
};
pub use ports::{CollectionError, CollectionResult, ConceptMap, ConceptSet};
