//! Concept collection implementations

pub mod concurrent_concept_set;
pub mod duo_concept_map;
pub mod readonly_concept_set;
pub mod sparse_concept_map;
pub mod sparse_concept_set;

pub use concurrent_concept_set::ConcurrentConceptSet;
pub use duo_concept_map::DuoConceptMap;
pub use readonly_concept_set::ReadonlyConceptSet;
pub use sparse_concept_map::SparseConceptMap;
pub use sparse_concept_set::SparseConceptSet;
