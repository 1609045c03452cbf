//! Ontology domain types

pub mod node;
pub mod ontology;
pub mod taxonomy;

pub use node::Node;
pub use ontology::{ClassificationSnapshot, Ontology};
pub use taxonomy::{NodeId, Taxonomy, TaxonomyNode};
