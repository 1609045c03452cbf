//! Role hierarchy, chains and reflexivity
//!
//! The super-role closure comes from a DFS over the NF5 graph. Chains are
//! indexed on both ends because the saturation rule for `r ∘ s ⊑ t` fires at
//! the middle context, either when the `r` predecessor or the `s` successor
//! arrives.

use crate::features::classification::domain::NormalForm;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Default, Clone)]
pub struct RoleIndex {
    /// role → strict super-roles (transitive)
    supers: FxHashMap<u32, Vec<u32>>,
    /// left role → (right role, super-role)
    chains_by_left: FxHashMap<u32, Vec<(u32, u32)>>,
    /// right role → (left role, super-role)
    chains_by_right: FxHashMap<u32, Vec<(u32, u32)>>,
    /// Reflexive roles, closed under super-roles
    reflexive: Vec<u32>,
}

impl RoleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from the role normal forms
    pub fn build<'a>(forms: impl IntoIterator<Item = &'a NormalForm>) -> Self {
        let mut graph: DiGraph<u32, ()> = DiGraph::new();
        let mut nodes: FxHashMap<u32, NodeIndex> = FxHashMap::default();
        let mut index = Self::new();
        let mut reflexive = Vec::new();

        let mut node_of = |graph: &mut DiGraph<u32, ()>, role: u32| {
            *nodes.entry(role).or_insert_with(|| graph.add_node(role))
        };

        for form in forms {
            match *form {
                NormalForm::RoleInclusion { sub, sup } => {
                    let a = node_of(&mut graph, sub);
                    let b = node_of(&mut graph, sup);
                    graph.add_edge(a, b, ());
                }
                NormalForm::RoleChain { left, right, sup } => {
                    index
                        .chains_by_left
                        .entry(left)
                        .or_default()
                        .push((right, sup));
                    index
                        .chains_by_right
                        .entry(right)
                        .or_default()
                        .push((left, sup));
                }
                NormalForm::ReflexiveRole { role } => reflexive.push(role),
                _ => {}
            }
        }

        // Reachability from every role in the hierarchy
        for start in graph.node_indices() {
            let role = graph[start];
            let mut dfs = Dfs::new(&graph, start);
            let mut strict = Vec::new();
            while let Some(nx) = dfs.next(&graph) {
                if nx != start {
                    strict.push(graph[nx]);
                }
            }
            if !strict.is_empty() {
                strict.sort_unstable();
                index.supers.insert(role, strict);
            }
        }

        let mut closed: FxHashSet<u32> = FxHashSet::default();
        for role in reflexive {
            closed.insert(role);
            closed.extend(index.strict_supers(role).iter().copied());
        }
        index.reflexive = closed.into_iter().collect();
        index.reflexive.sort_unstable();

        index
    }

    /// Strict super-roles of `role`
    pub fn strict_supers(&self, role: u32) -> &[u32] {
        self.supers.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `role` followed by its strict super-roles
    pub fn super_roles(&self, role: u32) -> impl Iterator<Item = u32> + '_ {
        std::iter::once(role).chain(self.strict_supers(role).iter().copied())
    }

    /// `(right, sup)` for every chain `role ∘ right ⊑ sup`
    pub fn chains_by_left(&self, role: u32) -> &[(u32, u32)] {
        self.chains_by_left
            .get(&role)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `(left, sup)` for every chain `left ∘ role ⊑ sup`
    pub fn chains_by_right(&self, role: u32) -> &[(u32, u32)] {
        self.chains_by_right
            .get(&role)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn reflexive(&self) -> &[u32] {
        &self.reflexive
    }

    pub fn has_chains(&self) -> bool {
        !self.chains_by_left.is_empty()
    }
}
