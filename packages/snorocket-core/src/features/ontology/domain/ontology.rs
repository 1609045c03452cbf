//! Ontology: stated axioms plus the latest classification result

use super::node::Node;
use super::taxonomy::{NodeId, Taxonomy};
use crate::features::model::Axiom;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Everything one classification run publishes
#[derive(Debug, Clone)]
pub struct ClassificationSnapshot {
    pub taxonomy: Arc<Taxonomy>,
    /// Nodes created or relinked by the run that produced this snapshot
    pub affected: Arc<[NodeId]>,
    pub inferred: Arc<[Axiom]>,
}

impl ClassificationSnapshot {
    /// Unclassified state: TOP above BOTTOM, nothing inferred
    pub fn initial() -> Self {
        Self {
            taxonomy: Arc::new(Taxonomy::initial()),
            affected: Arc::from(Vec::new()),
            inferred: Arc::from(Vec::new()),
        }
    }
}

/// One version of a terminology
///
/// Stated axioms are fixed at construction. The classification result is
/// swapped in as a whole by the classifier; readers always see one complete
/// snapshot.
pub struct Ontology {
    id: Arc<str>,
    version: Arc<str>,
    stated: Arc<[Axiom]>,
    snapshot: RwLock<Arc<ClassificationSnapshot>>,
}

impl Ontology {
    pub fn new(id: &str, version: &str, axioms: Vec<Axiom>) -> Self {
        Self {
            id: Arc::from(id),
            version: Arc::from(version),
            stated: axioms.into(),
            snapshot: RwLock::new(Arc::new(ClassificationSnapshot::initial())),
        }
    }

    /// Next version: same id, stated axioms followed by `axioms`
    ///
    /// The new version starts from this version's classification result,
    /// ready for an incremental run.
    pub fn extend(&self, version: &str, axioms: Vec<Axiom>) -> Self {
        let mut stated = Vec::with_capacity(self.stated.len() + axioms.len());
        stated.extend(self.stated.iter().cloned());
        stated.extend(axioms);
        Self {
            id: Arc::clone(&self.id),
            version: Arc::from(version),
            stated: stated.into(),
            snapshot: RwLock::new(self.snapshot()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn stated_axioms(&self) -> &[Axiom] {
        &self.stated
    }

    pub fn inferred_axioms(&self) -> Arc<[Axiom]> {
        Arc::clone(&self.snapshot.read().inferred)
    }

    pub fn snapshot(&self) -> Arc<ClassificationSnapshot> {
        Arc::clone(&self.snapshot.read())
    }

    pub fn taxonomy(&self) -> Arc<Taxonomy> {
        Arc::clone(&self.snapshot.read().taxonomy)
    }

    /// Node of the concept with external id `concept_id`
    pub fn node(&self, concept_id: &str) -> Option<Node> {
        let taxonomy = self.taxonomy();
        let id = taxonomy.node_by_name(concept_id)?;
        Node::new(taxonomy, id)
    }

    /// All nodes, ordered by node id
    pub fn nodes(&self) -> Vec<Node> {
        let taxonomy = self.taxonomy();
        (0..taxonomy.len() as NodeId)
            .filter_map(|id| Node::new(Arc::clone(&taxonomy), id))
            .collect()
    }

    /// Concept id to node, for every named concept
    pub fn node_map(&self) -> BTreeMap<Arc<str>, Node> {
        let taxonomy = self.taxonomy();
        let mut map = BTreeMap::new();
        for node in taxonomy.nodes() {
            if let Some(handle) = Node::new(Arc::clone(&taxonomy), node.id()) {
                for name in node.equivalents() {
                    map.insert(Arc::clone(name), handle.clone());
                }
            }
        }
        map
    }

    pub fn top_node(&self) -> Option<Node> {
        let taxonomy = self.taxonomy();
        let top = taxonomy.top();
        Node::new(taxonomy, top)
    }

    pub fn bottom_node(&self) -> Option<Node> {
        let taxonomy = self.taxonomy();
        let bottom = taxonomy.bottom();
        Node::new(taxonomy, bottom)
    }

    /// Nodes changed by the last run; every node after a full run
    pub fn affected_nodes(&self) -> Vec<Node> {
        let snapshot = self.snapshot();
        snapshot
            .affected
            .iter()
            .filter_map(|&id| Node::new(Arc::clone(&snapshot.taxonomy), id))
            .collect()
    }

    /// Replace the classification result in one step
    pub(crate) fn publish(&self, snapshot: ClassificationSnapshot) {
        *self.snapshot.write() = Arc::new(snapshot);
    }
}

impl std::fmt::Debug for Ontology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ontology")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("stated", &self.stated.len())
            .finish()
    }
}
