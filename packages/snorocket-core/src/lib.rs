/*
 * Snorocket Core - EL++ Description Logic Classifier
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Constants (sentinel ids, thresholds)
 * - features/    : Vertical slices (model → concept_set → classification → ontology, stats)
 * - config/      : Presets, builder and YAML configuration
 * - errors       : Crate-wide error type
 *
 * Performance:
 * - Rayon work-stealing saturation rounds
 * - Lock-free contexts, DashSet-backed taxonomy linking
 * - Incremental runs over layered copy-on-write maps
 */

// Crate-level lint configuration
#![allow(clippy::should_implement_trait)] // from_str naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::type_complexity)] // Closure parameter types in the taxonomy builder
#![allow(clippy::module_inception)] // Module naming intentional

/// Shared constants
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ClassifierConfig, ConfigError, Preset};
pub use errors::{ClassifierError, Result};
pub use features::classification::{ClassificationMode, ClassificationOutcome, Classifier};
pub use features::concept_set::{
    CollectionError, ConceptMap, ConceptSet, ConcurrentConceptSet, DuoConceptMap,
    ReadonlyConceptSet, SparseConceptMap, SparseConceptSet,
};
pub use features::model::{
    Axiom, Concept, Conjunction, Datatype, Existential, Factory, Literal, LiteralKind,
    ModelError, NamedConcept, NamedFeature, NamedRole, Operator,
};
pub use features::ontology::{Node, NodeId, Ontology};
pub use features::stats::{Stats, StatsSource};
pub use shared::constants::{BOTTOM_CONCEPT_ID, TOP_CONCEPT_ID};
