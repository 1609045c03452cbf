//! Node handles

use super::taxonomy::{NodeId, Taxonomy, TaxonomyNode};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An equivalence class in a published taxonomy
///
/// A handle keeps its taxonomy snapshot alive. Two handles are equal when
/// they point at the same node of the same snapshot; handles from different
/// runs never compare equal, even for identical contents.
#[derive(Clone)]
pub struct Node {
    taxonomy: Arc<Taxonomy>,
    id: NodeId,
}

impl Node {
    pub(crate) fn new(taxonomy: Arc<Taxonomy>, id: NodeId) -> Option<Self> {
        taxonomy.node(id)?;
        Some(Self { taxonomy, id })
    }

    fn data(&self) -> &TaxonomyNode {
        // Constructor checked the id against this very arena
        &self.taxonomy.nodes()[self.id as usize]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// External ids of the equivalent concepts, sorted
    pub fn equivalent_concepts(&self) -> &[Arc<str>] {
        self.data().equivalents()
    }

    /// Name of the concept with the lowest internal id
    pub fn representative(&self) -> &str {
        self.data().representative()
    }

    pub fn contains(&self, concept: &str) -> bool {
        self.taxonomy.node_by_name(concept) == Some(self.id)
    }

    /// Direct parents, ordered by node id
    pub fn parents(&self) -> Vec<Node> {
        self.handles(self.data().parents().to_sorted_vec())
    }

    /// Direct children, ordered by node id
    pub fn children(&self) -> Vec<Node> {
        self.handles(self.data().children().to_sorted_vec())
    }

    fn handles(&self, ids: Vec<u32>) -> Vec<Node> {
        ids.into_iter()
            .filter_map(|id| Node::new(Arc::clone(&self.taxonomy), id))
            .collect()
    }

    pub fn is_top(&self) -> bool {
        self.id == self.taxonomy.top()
    }

    pub fn is_bottom(&self) -> bool {
        self.id == self.taxonomy.bottom()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.taxonomy, &other.taxonomy)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        (Arc::as_ptr(&self.taxonomy) as *const () as usize).hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("equivalents", &self.equivalent_concepts())
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, name) in self.equivalent_concepts().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_per_snapshot() {
        let a = Arc::new(Taxonomy::initial());
        let b = Arc::new(Taxonomy::initial());

        let top_a = Node::new(Arc::clone(&a), 0).unwrap();
        assert_eq!(top_a, Node::new(Arc::clone(&a), 0).unwrap());
        assert_ne!(top_a, Node::new(b, 0).unwrap());
        assert!(Node::new(a, 7).is_none());
    }

    #[test]
    fn test_navigation() {
        let taxonomy = Arc::new(Taxonomy::initial());
        let top = Node::new(Arc::clone(&taxonomy), taxonomy.top()).unwrap();
        assert!(top.is_top());
        assert!(top.parents().is_empty());

        let children = top.children();
        assert_eq!(children.len(), 1);
        assert!(children[0].is_bottom());
        assert!(children[0].contains("_:BOTTOM"));
        assert_eq!(children[0].to_string(), "{_:BOTTOM}");
    }
}
