//! Classification engine
//!
//! Pipeline: normaliser → axiom/role/datatype indexes → saturation →
//! taxonomy builder.

pub mod axiom_index;
pub mod context;
pub mod datatype_index;
pub mod normaliser;
pub mod role_index;
pub mod saturation;
pub mod taxonomy_builder;

pub use axiom_index::{AxiomIndex, IndexView};
pub use context::{Context, Rules, WorkItem};
pub use datatype_index::DatatypeIndex;
pub use normaliser::{Normalised, Normaliser, NormaliserStats};
pub use role_index::RoleIndex;
pub use saturation::{SaturationEngine, SaturationStats};
pub use taxonomy_builder::{TaxonomyBuilder, TaxonomyStats, TaxonomyUpdate};
