//! Taxonomy assertions

use snorocket_core::{Node, Ontology};
use std::collections::{BTreeMap, BTreeSet};

/// Sorted names of the parents of `id`'s node
pub fn parent_names(ontology: &Ontology, id: &str) -> Vec<String> {
    ontology
        .node(id)
        .map(|n| {
            n.parents()
                .iter()
                .map(|p| p.representative().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Every node's equivalents mapped to its parents' representatives
pub fn shape(ontology: &Ontology) -> BTreeMap<Vec<String>, BTreeSet<String>> {
    ontology
        .nodes()
        .iter()
        .map(|n| {
            let equivalents = n.equivalent_concepts().iter().map(|s| s.to_string()).collect();
            let parents = n.parents().iter().map(|p| p.representative().to_string()).collect();
            (equivalents, parents)
        })
        .collect()
}

/// TOP has no parents, BOTTOM no children, everything reaches BOTTOM and
/// no node reaches itself through children
pub fn assert_dag(ontology: &Ontology) {
    let top = ontology.top_node().expect("top node");
    let bottom = ontology.bottom_node().expect("bottom node");
    assert!(top.parents().is_empty(), "TOP has parents");
    assert!(bottom.children().is_empty(), "BOTTOM has children");

    for node in ontology.nodes() {
        let mut seen: BTreeSet<u32> = BTreeSet::new();
        let mut stack: Vec<Node> = node.children();
        let mut reaches_bottom = node.is_bottom();
        while let Some(next) = stack.pop() {
            assert_ne!(next.id(), node.id(), "cycle through {}", node);
            if next.is_bottom() {
                reaches_bottom = true;
            }
            if seen.insert(next.id()) {
                stack.extend(next.children());
            }
        }
        assert!(reaches_bottom, "{} does not reach BOTTOM", node);

        for parent in node.parents() {
            assert!(parent.children().contains(&node), "{} missing child link", parent);
        }
    }
}
