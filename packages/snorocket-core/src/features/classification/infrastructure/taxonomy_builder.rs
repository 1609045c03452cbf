//! Taxonomy extraction
//!
//! Turns saturated subsumer sets into the node DAG.
//!
//! Full build:
//! 1. Classes (parallel): an unsatisfiable concept joins BOTTOM, any other
//!    concept's class is its mutually subsuming named concepts
//! 2. Nodes in ascending representative order, so TOP and BOTTOM come first
//! 3. Direct parents (parallel): the subsuming nodes that are not strictly
//!    below another subsuming node
//! 4. Linking (parallel) into the concurrent parent/child sets, then every
//!    leaf is attached to BOTTOM
//!
//! Incremental update reuses the previous arena. It stays valid only while no
//! equivalence class changes; otherwise the caller rebuilds in full and the
//! affected set is the difference against the previous taxonomy.

use super::saturation::SaturationEngine;
use crate::features::classification::domain::IdFactory;
use crate::features::concept_set::{ConceptMap, ConcurrentConceptSet, DuoConceptMap, SparseConceptMap};
use crate::features::ontology::{NodeId, Taxonomy, TaxonomyNode};
use crate::features::stats::{Counter, StatsSink, StatsSource};
use crate::shared::constants::internal_ids::{BOTTOM, TOP};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Taxonomy counters
#[derive(Debug, Default)]
pub struct TaxonomyStats {
    pub full_builds: Counter,
    pub incremental_updates: Counter,
    pub nodes_created: Counter,
    pub edges: Counter,
    pub relinked: Counter,
}

impl StatsSource for TaxonomyStats {
    fn collect_stats(&self, sink: &mut StatsSink) {
        sink.counter("full_builds", self.full_builds.get());
        sink.counter("incremental_updates", self.incremental_updates.get());
        sink.counter("nodes_created", self.nodes_created.get());
        sink.counter("edges", self.edges.get());
        sink.counter("relinked", self.relinked.get());
    }

    fn reset_stats(&self) {
        self.full_builds.reset();
        self.incremental_updates.reset();
        self.nodes_created.reset();
        self.edges.reset();
        self.relinked.reset();
    }
}

/// Result of an incremental update or a rebuild
pub struct TaxonomyUpdate {
    pub taxonomy: Taxonomy,
    /// New nodes plus nodes whose links changed, ascending
    pub affected: Vec<NodeId>,
}

pub struct TaxonomyBuilder<'a> {
    engine: &'a SaturationEngine,
    ids: &'a IdFactory,
    stats: &'a TaxonomyStats,
}

/// Map `f` over `items`, on the rayon pool when available
fn map_items<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        items.par_iter().map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        items.iter().map(f).collect()
    }
}

/// Nodes of `current` without a counterpart in `previous`, or whose
/// equivalents, parents or children differ from it
///
/// A node's counterpart is the previous node holding its representative.
fn changed_nodes(previous: &Taxonomy, current: &Taxonomy) -> Vec<NodeId> {
    let counterpart: Vec<Option<NodeId>> = current
        .nodes()
        .iter()
        .map(|node| previous.node_by_name(node.representative()))
        .collect();
    let mapped = |links: &ConcurrentConceptSet| -> Option<Vec<NodeId>> {
        let mut out = links
            .to_sorted_vec()
            .into_iter()
            .map(|n| counterpart.get(n as usize).copied().flatten())
            .collect::<Option<Vec<NodeId>>>()?;
        out.sort_unstable();
        Some(out)
    };

    current
        .nodes()
        .iter()
        .enumerate()
        .filter(|(i, node)| {
            let Some(before) = counterpart[*i].and_then(|p| previous.node(p)) else {
                return true;
            };
            before.equivalents() != node.equivalents()
                || mapped(node.parents()) != Some(before.parents().to_sorted_vec())
                || mapped(node.children()) != Some(before.children().to_sorted_vec())
        })
        .map(|(i, _)| i as NodeId)
        .collect()
}

impl<'a> TaxonomyBuilder<'a> {
    pub fn new(engine: &'a SaturationEngine, ids: &'a IdFactory, stats: &'a TaxonomyStats) -> Self {
        Self { engine, ids, stats }
    }

    fn is_unsat(&self, concept: u32) -> bool {
        concept == BOTTOM || self.engine.subsumes(concept, BOTTOM)
    }

    /// Named concepts equivalent to `concept`, itself included, ascending.
    /// Unsatisfiable concepts report the BOTTOM class marker `[BOTTOM]`.
    fn class_of(&self, concept: u32) -> Vec<u32> {
        if self.is_unsat(concept) {
            return vec![BOTTOM];
        }
        let Some(subsumers) = self.engine.subsumers(concept) else {
            return vec![concept];
        };
        let mut class: Vec<u32> = subsumers
            .iter()
            .filter(|&d| d == concept || (self.ids.is_named(d) && self.engine.subsumes(d, concept)))
            .collect();
        if !class.contains(&concept) {
            class.push(concept);
            class.sort_unstable();
        }
        class
    }

    /// Direct parent nodes of the node represented by `rep`
    fn direct_parents(
        &self,
        rep: u32,
        own: NodeId,
        node_of: &(dyn Fn(u32) -> Option<NodeId> + Sync),
        rep_of: &(dyn Fn(NodeId) -> u32 + Sync),
        top: NodeId,
        bottom: NodeId,
    ) -> Vec<NodeId> {
        if own == top {
            return Vec::new();
        }
        let Some(subsumers) = self.engine.subsumers(rep) else {
            return vec![top];
        };

        let mut candidates: Vec<NodeId> = subsumers
            .iter()
            .filter(|&d| self.ids.is_named(d))
            .filter_map(node_of)
            .filter(|&n| n != own && n != bottom)
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        let parents: Vec<NodeId> = candidates
            .iter()
            .copied()
            .filter(|&p| {
                let p_rep = rep_of(p);
                !candidates
                    .iter()
                    .any(|&q| q != p && self.engine.subsumes(rep_of(q), p_rep))
            })
            .collect();

        if parents.is_empty() {
            vec![top]
        } else {
            parents
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Full build
    // ═══════════════════════════════════════════════════════════════════════

    pub fn build(&self) -> Taxonomy {
        let named: Vec<u32> = self.ids.named_ids().collect();

        // Phase 1: classes
        let classes = map_items(&named, |&c| self.class_of(c));

        // Phase 2: nodes ordered by representative
        let mut members: FxHashMap<u32, Vec<u32>> = FxHashMap::default();
        for (&concept, class) in named.iter().zip(&classes) {
            let rep = class.first().copied().unwrap_or(concept);
            members.entry(rep).or_default().push(concept);
        }
        // An unsatisfiable TOP makes everything unsatisfiable: one node
        if self.is_unsat(TOP) {
            let all = named.clone();
            members.clear();
            members.insert(BOTTOM, all);
        }

        let mut reps: Vec<u32> = members.keys().copied().collect();
        reps.sort_unstable();

        let mut concept_node: SparseConceptMap<NodeId> = SparseConceptMap::with_capacity(named.len());
        let mut nodes = Vec::with_capacity(reps.len());
        for (node_id, rep) in reps.iter().enumerate() {
            let mut concepts = members.remove(rep).unwrap_or_default();
            concepts.sort_unstable();
            concepts.dedup();
            let names = concepts
                .iter()
                .filter_map(|&c| self.ids.name(c).cloned())
                .collect();
            for &c in &concepts {
                concept_node.insert(c, node_id as NodeId);
            }
            nodes.push(Arc::new(TaxonomyNode::new(node_id as NodeId, concepts, names)));
        }

        let top = concept_node.lookup(TOP).copied().unwrap_or(0);
        let bottom = concept_node.lookup(BOTTOM).copied().unwrap_or(top);
        self.stats.nodes_created.add(nodes.len() as u64);

        // Phase 3: direct parents
        let node_of = |c: u32| concept_node.lookup(c).copied();
        let node_reps: Vec<u32> = nodes.iter().map(|n| n.concepts()[0]).collect();
        let rep_of = |n: NodeId| node_reps[n as usize];
        let ids: Vec<NodeId> = (0..nodes.len() as NodeId).collect();
        let parents = map_items(&ids, |&n| {
            if n == bottom {
                Vec::new()
            } else {
                self.direct_parents(rep_of(n), n, &node_of, &rep_of, top, bottom)
            }
        });

        // Phase 4: linking
        let link = |(child, ps): (usize, &Vec<NodeId>)| {
            for &p in ps {
                nodes[p as usize].children().insert(child as NodeId);
                nodes[child].parents().insert(p);
            }
        };
        #[cfg(feature = "parallel")]
        parents.par_iter().enumerate().for_each(link);
        #[cfg(not(feature = "parallel"))]
        parents.iter().enumerate().for_each(link);

        let mut edges: u64 = parents.iter().map(|p| p.len() as u64).sum();
        if top != bottom {
            for node in &nodes {
                if node.id() != bottom && node.children().is_empty() {
                    node.children().insert(bottom);
                    nodes[bottom as usize].parents().insert(node.id());
                    edges += 1;
                }
            }
        }
        self.stats.edges.add(edges);
        self.stats.full_builds.incr();
        debug!(nodes = nodes.len(), edges, "taxonomy built");

        Taxonomy::from_parts(nodes, Arc::new(concept_node), top, bottom)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Incremental update
    // ═══════════════════════════════════════════════════════════════════════

    /// Full build after `previous` could not be updated in place
    pub fn rebuild(&self, previous: &Taxonomy) -> TaxonomyUpdate {
        let taxonomy = self.build();
        let affected = changed_nodes(previous, &taxonomy);
        debug!(
            nodes = taxonomy.len(),
            affected = affected.len(),
            "taxonomy rebuilt"
        );
        TaxonomyUpdate { taxonomy, affected }
    }

    /// Update `previous` after an incremental saturation
    ///
    /// `changed` lists the contexts whose subsumers grew. Concepts from
    /// `ids.layer_start()` on are new. Returns `None` when an equivalence
    /// class changed, when a new concept is unsatisfiable or equivalent to
    /// another concept, or when TOP became unsatisfiable.
    pub fn update(&self, previous: &Taxonomy, changed: &[u32], max_overlay_depth: usize) -> Option<TaxonomyUpdate> {
        if self.is_unsat(TOP) {
            return None;
        }
        let layer_start = self.ids.layer_start();
        let bottom = previous.bottom();
        let top = previous.top();

        // Stability check
        let changed_named: Vec<u32> = changed
            .iter()
            .copied()
            .filter(|&c| c < layer_start && self.ids.is_named(c))
            .collect();
        for &c in &changed_named {
            let node = previous.node_of_concept(c)?;
            let now = self.class_of(c);
            let before = previous.node(node)?.concepts();
            let stable = if node == bottom {
                now == [BOTTOM]
            } else {
                now == before
            };
            if !stable {
                debug!(concept = c, "equivalence class changed");
                return None;
            }
        }
        let new_concepts: Vec<u32> = self
            .ids
            .named_ids()
            .filter(|&c| c >= layer_start)
            .collect();
        for &c in &new_concepts {
            if self.class_of(c) != [c] {
                debug!(concept = c, "new concept joins an existing class");
                return None;
            }
        }

        // Copy-on-write arena with the new nodes appended
        let mut taxonomy = previous.clone();
        let mut overlay = SparseConceptMap::with_capacity(new_concepts.len());
        let mut affected: FxHashSet<NodeId> = FxHashSet::default();
        for &c in &new_concepts {
            let name = self.ids.name(c).cloned().into_iter().collect();
            let id = taxonomy.len() as NodeId;
            let pushed = taxonomy.push_node(TaxonomyNode::new(id, vec![c], name));
            overlay.insert(c, pushed);
            affected.insert(pushed);
        }
        self.stats.nodes_created.add(new_concepts.len() as u64);

        let base = Arc::clone(previous.concept_nodes());
        let layered = DuoConceptMap::with_overlay(base, overlay);
        let concept_nodes: Arc<dyn ConceptMap<NodeId>> = if layered.layers() >= max_overlay_depth {
            Arc::new(layered.flatten())
        } else {
            Arc::new(layered)
        };
        taxonomy.set_concept_nodes(concept_nodes);

        // Nodes whose parents may differ: changed, new, and children of changed
        let mut recompute: FxHashSet<NodeId> = affected.clone();
        for &c in &changed_named {
            if let Some(node) = taxonomy.node_of_concept(c) {
                if node == bottom || node == top {
                    continue;
                }
                recompute.insert(node);
                if let Some(data) = previous.node(node) {
                    recompute.extend(data.children().to_sorted_vec().into_iter().filter(|&n| n != bottom));
                }
            }
        }
        let mut recompute: Vec<NodeId> = recompute.into_iter().collect();
        recompute.sort_unstable();

        let snapshot = &taxonomy;
        let node_of = |c: u32| snapshot.node_of_concept(c);
        let rep_of = |n: NodeId| {
            snapshot
                .node(n)
                .and_then(|d| d.concepts().first().copied())
                .unwrap_or(TOP)
        };
        let fresh_parents = map_items(&recompute, |&n| {
            self.direct_parents(rep_of(n), n, &node_of, &rep_of, top, bottom)
        });

        // Apply parent changes
        let mut touched: FxHashSet<NodeId> = FxHashSet::default();
        let mut relinked = 0u64;
        for (&n, parents) in recompute.iter().zip(fresh_parents) {
            let old: Vec<NodeId> = taxonomy
                .node(n)
                .map(|d| d.parents().to_sorted_vec())
                .unwrap_or_default();
            let mut changed_links = false;
            for &p in &old {
                if !parents.contains(&p) {
                    taxonomy.unlink(p, n);
                    touched.insert(p);
                    changed_links = true;
                }
            }
            for &p in &parents {
                if !old.contains(&p) {
                    taxonomy.link(p, n);
                    touched.insert(p);
                    changed_links = true;
                }
            }
            if changed_links {
                affected.insert(n);
                relinked += 1;
            }
        }

        // BOTTOM links: exactly the nodes without other children
        let mut check: Vec<NodeId> = affected.iter().chain(touched.iter()).copied().collect();
        check.sort_unstable();
        check.dedup();
        for n in check {
            if n == bottom {
                continue;
            }
            let Some(data) = taxonomy.node(n) else {
                continue;
            };
            let children = data.children();
            let has_bottom = children.contains(bottom);
            let others = children.len() - usize::from(has_bottom);
            if others == 0 && !has_bottom {
                taxonomy.link(n, bottom);
                touched.insert(bottom);
            } else if others > 0 && has_bottom {
                taxonomy.unlink(n, bottom);
                touched.insert(bottom);
            }
        }
        affected.extend(touched);

        self.stats.relinked.add(relinked);
        self.stats.incremental_updates.incr();
        let mut affected: Vec<NodeId> = affected.into_iter().collect();
        affected.sort_unstable();
        debug!(
            new_nodes = new_concepts.len(),
            affected = affected.len(),
            "taxonomy updated"
        );

        Some(TaxonomyUpdate { taxonomy, affected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::classification::domain::NormalForm;
    use crate::features::classification::infrastructure::axiom_index::{AxiomIndex, IndexView};
    use crate::features::classification::infrastructure::context::Rules;
    use crate::features::classification::infrastructure::role_index::RoleIndex;
    use crate::features::classification::infrastructure::saturation::SaturationStats;
    use crate::features::model::{Concept, NamedConcept};

    fn named(ids: &mut IdFactory, name: &str) -> u32 {
        let concept = Concept::Named(NamedConcept::from_interned(Arc::from(name)));
        ids.concept_id(&concept).map(|(id, _)| id).unwrap_or(u32::MAX)
    }

    fn sub(lhs: u32, rhs: u32) -> NormalForm {
        NormalForm::Subsumption { lhs, rhs }
    }

    struct Fixture {
        ids: IdFactory,
        engine: SaturationEngine,
        base: AxiomIndex,
        roles: RoleIndex,
        stats: SaturationStats,
    }

    // A ⊑ B, C ⊑ B, A ≡ D, E ⊑ ⊥
    fn fixture() -> Fixture {
        let mut ids = IdFactory::new();
        let [a, b, c, d, e] = ["A", "B", "C", "D", "E"].map(|n| named(&mut ids, n));
        let base = AxiomIndex::from_forms(&[sub(a, b), sub(c, b), sub(a, d), sub(d, a), sub(e, BOTTOM)]);
        let roles = RoleIndex::new();
        let stats = SaturationStats::default();
        let mut engine = SaturationEngine::new();
        engine.ensure_contexts(ids.concept_count(), &roles, &stats);
        engine.saturate(
            Rules {
                index: IndexView::only(&base),
                delta: None,
                roles: &roles,
            },
            usize::MAX,
            &stats,
        );
        engine.take_changed();
        Fixture {
            ids,
            engine,
            base,
            roles,
            stats,
        }
    }

    fn names(taxonomy: &Taxonomy, node: NodeId) -> Vec<String> {
        taxonomy
            .node(node)
            .map(|n| n.equivalents().iter().map(|s| s.to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_full_build_groups_equivalents_and_links_direct_parents() {
        let fx = fixture();
        let stats = TaxonomyStats::default();
        let taxonomy = TaxonomyBuilder::new(&fx.engine, &fx.ids, &stats).build();

        assert_eq!(taxonomy.len(), 5);
        assert_eq!(taxonomy.top(), 0);
        assert_eq!(taxonomy.bottom(), 1);
        assert_eq!(names(&taxonomy, 1), vec!["E", "_:BOTTOM"]);
        assert_eq!(names(&taxonomy, 2), vec!["A", "D"]);

        let parents = |n: NodeId| taxonomy.node(n).map(|d| d.parents().to_sorted_vec()).unwrap_or_default();
        assert_eq!(parents(2), vec![3]);
        assert_eq!(parents(3), vec![0]);
        assert_eq!(parents(4), vec![3]);
        assert_eq!(parents(1), vec![2, 4]);
        assert_eq!(taxonomy.node_by_name("D"), Some(2));
        assert_eq!(stats.full_builds.get(), 1);
    }

    #[test]
    fn test_unsatisfiable_top_collapses_to_one_node() {
        let mut ids = IdFactory::new();
        let a = named(&mut ids, "A");
        let base = AxiomIndex::from_forms(&[sub(TOP, BOTTOM)]);
        let roles = RoleIndex::new();
        let sat = SaturationStats::default();
        let mut engine = SaturationEngine::new();
        engine.ensure_contexts(ids.concept_count(), &roles, &sat);
        engine.saturate(
            Rules {
                index: IndexView::only(&base),
                delta: None,
                roles: &roles,
            },
            1,
            &sat,
        );

        let stats = TaxonomyStats::default();
        let taxonomy = TaxonomyBuilder::new(&engine, &ids, &stats).build();
        assert_eq!(taxonomy.len(), 1);
        assert_eq!(taxonomy.top(), taxonomy.bottom());
        assert_eq!(taxonomy.node_of_concept(a), Some(0));
    }

    #[test]
    fn test_update_appends_new_node_without_touching_previous() {
        let mut fx = fixture();
        let stats = TaxonomyStats::default();
        let previous = TaxonomyBuilder::new(&fx.engine, &fx.ids, &stats).build();

        // F ⊑ A
        fx.ids.begin_layer(8);
        let f = named(&mut fx.ids, "F");
        let a = fx.ids.named_id("A").unwrap_or(u32::MAX);
        let delta = AxiomIndex::from_forms(&[sub(f, a)]);
        fx.engine.ensure_contexts(fx.ids.concept_count(), &fx.roles, &fx.stats);
        fx.engine.seed_delta(&delta);
        fx.engine.saturate(
            Rules {
                index: IndexView::new(&fx.base, Some(&delta)),
                delta: Some(&delta),
                roles: &fx.roles,
            },
            usize::MAX,
            &fx.stats,
        );
        let changed = fx.engine.take_changed();
        assert_eq!(changed, vec![f]);

        let update = TaxonomyBuilder::new(&fx.engine, &fx.ids, &stats)
            .update(&previous, &changed, 8)
            .expect("stable classes");
        let taxonomy = update.taxonomy;
        assert_eq!(taxonomy.len(), 6);
        assert_eq!(taxonomy.node_by_name("F"), Some(5));
        assert_eq!(taxonomy.node_of_concept(f), Some(5));
        assert_eq!(update.affected, vec![1, 2, 5]);

        let children = |t: &Taxonomy, n: NodeId| t.node(n).map(|d| d.children().to_sorted_vec()).unwrap_or_default();
        assert_eq!(children(&taxonomy, 2), vec![5]);
        assert_eq!(children(&taxonomy, 5), vec![1]);
        // The previous taxonomy is untouched
        assert_eq!(children(&previous, 2), vec![1]);
        assert_eq!(previous.len(), 5);
        assert_eq!(stats.incremental_updates.get(), 1);
    }

    #[test]
    fn test_update_rejects_new_equivalence() {
        let mut fx = fixture();
        let stats = TaxonomyStats::default();
        let previous = TaxonomyBuilder::new(&fx.engine, &fx.ids, &stats).build();

        // B ⊑ C makes B ≡ C
        fx.ids.begin_layer(8);
        let b = fx.ids.named_id("B").unwrap_or(u32::MAX);
        let c = fx.ids.named_id("C").unwrap_or(u32::MAX);
        let delta = AxiomIndex::from_forms(&[sub(b, c)]);
        fx.engine.seed_delta(&delta);
        fx.engine.saturate(
            Rules {
                index: IndexView::new(&fx.base, Some(&delta)),
                delta: Some(&delta),
                roles: &fx.roles,
            },
            usize::MAX,
            &fx.stats,
        );
        let changed = fx.engine.take_changed();
        let builder = TaxonomyBuilder::new(&fx.engine, &fx.ids, &stats);
        assert!(builder.update(&previous, &changed, 8).is_none());

        // Only the merged class and BOTTOM, which lost C as a parent
        let rebuilt = builder.rebuild(&previous);
        assert_eq!(rebuilt.taxonomy.len(), 4);
        assert_eq!(names(&rebuilt.taxonomy, 3), vec!["B", "C"]);
        assert_eq!(rebuilt.affected, vec![1, 3]);
    }

    #[test]
    fn test_rebuild_of_unchanged_state_affects_nothing() {
        let fx = fixture();
        let stats = TaxonomyStats::default();
        let builder = TaxonomyBuilder::new(&fx.engine, &fx.ids, &stats);
        let previous = builder.build();
        assert!(builder.rebuild(&previous).affected.is_empty());
        assert!(changed_nodes(&Taxonomy::initial(), &previous).contains(&2));
    }
}
