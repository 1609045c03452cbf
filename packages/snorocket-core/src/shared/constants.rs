//! Centralized constants
//!
//! Reserved identifiers and the tunable defaults used by the presets.

/// Reserved id of the universal concept
pub const TOP_CONCEPT_ID: &str = "_:TOP";

/// Reserved id of the unsatisfiable concept
pub const BOTTOM_CONCEPT_ID: &str = "_:BOTTOM";

/// Dense internal ids of the reserved concepts
pub mod internal_ids {
    pub const TOP: u32 = 0;
    pub const BOTTOM: u32 = 1;
}

/// Saturation tuning
pub mod saturation {
    /// Active contexts needed before a round goes parallel (balanced preset)
    pub const PARALLEL_THRESHOLD: usize = 64;

    /// Initial queue capacity of a fresh context
    pub const INITIAL_QUEUE_CAPACITY: usize = 8;
}

/// Taxonomy tuning
pub mod taxonomy {
    /// Overlay layers on the concept-to-node map before it is flattened
    pub const MAX_OVERLAY_DEPTH: usize = 8;
}

/// Concept set tuning
pub mod concept_set {
    /// Pending inserts buffered before a [`SparseConceptSet`] merges them
    ///
    /// [`SparseConceptSet`]: crate::features::concept_set::SparseConceptSet
    pub const PENDING_FLUSH_THRESHOLD: usize = 32;
}
