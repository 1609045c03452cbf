//! Taxonomy arena
//!
//! Nodes are addressed by [`NodeId`], their index in the arena. Parent and
//! child links are node ids held in [`ConcurrentConceptSet`]s, so the linking
//! phase can run on several workers without locks. A published taxonomy is
//! never mutated again; an incremental update clones the arena (nodes are
//! shared `Arc`s) and copies only the nodes it touches.

use crate::features::concept_set::{ConceptMap, ConcurrentConceptSet, SparseConceptMap};
use crate::shared::constants::internal_ids::{BOTTOM, TOP};
use crate::shared::constants::{BOTTOM_CONCEPT_ID, TOP_CONCEPT_ID};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Index of a node in its taxonomy
pub type NodeId = u32;

/// One equivalence class
#[derive(Debug, Clone)]
pub struct TaxonomyNode {
    id: NodeId,
    /// Internal concept ids, ascending
    concepts: Arc<[u32]>,
    /// Name of the lowest concept id
    representative: Arc<str>,
    /// All names, sorted
    equivalents: Arc<[Arc<str>]>,
    parents: ConcurrentConceptSet,
    children: ConcurrentConceptSet,
}

impl TaxonomyNode {
    pub(crate) fn new(id: NodeId, concepts: Vec<u32>, names: Vec<Arc<str>>) -> Self {
        let representative = names
            .first()
            .cloned()
            .unwrap_or_else(|| Arc::from(BOTTOM_CONCEPT_ID));
        let mut equivalents = names;
        equivalents.sort();
        Self {
            id,
            concepts: concepts.into(),
            representative,
            equivalents: equivalents.into(),
            parents: ConcurrentConceptSet::new(),
            children: ConcurrentConceptSet::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn concepts(&self) -> &[u32] {
        &self.concepts
    }

    pub fn representative(&self) -> &Arc<str> {
        &self.representative
    }

    pub fn equivalents(&self) -> &[Arc<str>] {
        &self.equivalents
    }

    pub fn parents(&self) -> &ConcurrentConceptSet {
        &self.parents
    }

    pub fn children(&self) -> &ConcurrentConceptSet {
        &self.children
    }
}

/// Subsumption DAG over equivalence classes
#[derive(Clone)]
pub struct Taxonomy {
    nodes: Vec<Arc<TaxonomyNode>>,
    concept_nodes: Arc<dyn ConceptMap<NodeId>>,
    node_by_name: FxHashMap<Arc<str>, NodeId>,
    top: NodeId,
    bottom: NodeId,
}

impl Taxonomy {
    /// TOP directly above BOTTOM, nothing else
    pub fn initial() -> Self {
        let top = TaxonomyNode::new(0, vec![TOP], vec![Arc::from(TOP_CONCEPT_ID)]);
        let bottom = TaxonomyNode::new(1, vec![BOTTOM], vec![Arc::from(BOTTOM_CONCEPT_ID)]);
        top.children.insert(1);
        bottom.parents.insert(0);

        let concept_nodes: SparseConceptMap<NodeId> = [(TOP, 0), (BOTTOM, 1)].into_iter().collect();
        Self::from_parts(
            vec![Arc::new(top), Arc::new(bottom)],
            Arc::new(concept_nodes),
            0,
            1,
        )
    }

    pub(crate) fn from_parts(
        nodes: Vec<Arc<TaxonomyNode>>,
        concept_nodes: Arc<dyn ConceptMap<NodeId>>,
        top: NodeId,
        bottom: NodeId,
    ) -> Self {
        let node_by_name = nodes
            .iter()
            .flat_map(|node| {
                node.equivalents
                    .iter()
                    .map(move |name| (Arc::clone(name), node.id))
            })
            .collect();
        Self {
            nodes,
            concept_nodes,
            node_by_name,
            top,
            bottom,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn top(&self) -> NodeId {
        self.top
    }

    pub fn bottom(&self) -> NodeId {
        self.bottom
    }

    pub fn node(&self, id: NodeId) -> Option<&Arc<TaxonomyNode>> {
        self.nodes.get(id as usize)
    }

    pub fn nodes(&self) -> &[Arc<TaxonomyNode>] {
        &self.nodes
    }

    /// Node holding the concept with external id `name`
    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.node_by_name.get(name).copied()
    }

    /// Node holding internal concept id `concept`
    pub fn node_of_concept(&self, concept: u32) -> Option<NodeId> {
        self.concept_nodes.get(concept).copied()
    }

    pub fn concept_nodes(&self) -> &Arc<dyn ConceptMap<NodeId>> {
        &self.concept_nodes
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Copy-on-write editing (incremental updates)
    // ═══════════════════════════════════════════════════════════════════════

    /// Mutable access to a node, copying it if it is shared
    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut TaxonomyNode> {
        self.nodes.get_mut(id as usize).map(Arc::make_mut)
    }

    pub(crate) fn push_node(&mut self, node: TaxonomyNode) -> NodeId {
        let id = self.nodes.len() as NodeId;
        for name in node.equivalents.iter() {
            self.node_by_name.insert(Arc::clone(name), id);
        }
        self.nodes.push(Arc::new(node));
        id
    }

    pub(crate) fn set_concept_nodes(&mut self, concept_nodes: Arc<dyn ConceptMap<NodeId>>) {
        self.concept_nodes = concept_nodes;
    }

    /// Add the edge `parent → child`, copying both ends when shared
    pub(crate) fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(p) = self.node_mut(parent) {
            p.children.insert(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parents.insert(parent);
        }
    }

    /// Remove the edge `parent → child`, copying both ends when shared
    pub(crate) fn unlink(&mut self, parent: NodeId, child: NodeId) {
        if let Some(p) = self.node_mut(parent) {
            p.children.take(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parents.take(parent);
        }
    }
}

impl std::fmt::Debug for Taxonomy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Taxonomy")
            .field("nodes", &self.nodes.len())
            .field("top", &self.top)
            .field("bottom", &self.bottom)
            .finish()
    }
}
