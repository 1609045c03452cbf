//! Ontology - stated axioms and the published taxonomy

pub mod domain;

pub use domain::{ClassificationSnapshot, Node, NodeId, Ontology, Taxonomy, TaxonomyNode};
