//! Classifier facade
//!
//! Drives one classification run end to end and publishes the result on the
//! ontology:
//! 1. Validate datatype restrictions (the only input error)
//! 2. Normalise and index
//! 3. Saturate
//! 4. Build or update the taxonomy, derive the inferred axioms
//! 5. Publish one snapshot
//!
//! The saturated state is kept between runs. An incremental run absorbs only
//! the stated axioms appended since the previous run of the same ontology;
//! whenever that is not sound it falls back to a full run.

use crate::config::ClassifierConfig;
use crate::errors::Result;
use crate::features::classification::domain::IdFactory;
use crate::features::classification::infrastructure::{
    AxiomIndex, DatatypeIndex, IndexView, Normalised, Normaliser, NormaliserStats, RoleIndex,
    Rules, SaturationEngine, SaturationStats, TaxonomyBuilder, TaxonomyStats, TaxonomyUpdate,
};
use crate::features::concept_set::{ReadonlyConceptSet, SparseConceptSet};
use crate::features::model::{Axiom, Concept, NamedConcept};
use crate::features::ontology::{ClassificationSnapshot, NodeId, Ontology, Taxonomy};
use crate::features::stats::{Counter, StatsSink, StatsSource};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// How a run was carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationMode {
    Full,
    Incremental,
}

/// Summary of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationOutcome {
    pub mode: ClassificationMode,
    /// Nodes in the published taxonomy
    pub nodes: usize,
    /// Nodes reported as affected
    pub affected: usize,
    /// Saturation rounds
    pub rounds: usize,
    pub duration_ms: u64,
}

/// Everything kept between runs of one ontology
struct ReasonerState {
    ontology_id: Arc<str>,
    /// Stated axioms absorbed so far
    stated: Vec<Axiom>,
    ids: IdFactory,
    normaliser: Normaliser,
    datatypes: DatatypeIndex,
    index: AxiomIndex,
    roles: RoleIndex,
    engine: SaturationEngine,
    taxonomy: Arc<Taxonomy>,
    inferred: Arc<[Axiom]>,
}

enum Plan {
    Full(&'static str),
    Unchanged,
    Delta(usize),
}

/// EL++ classifier
///
/// ```text
/// let factory = Factory::new();
/// let a = factory.create_named_concept("A");
/// let b = factory.create_named_concept("B");
/// let ontology = Ontology::new("demo", "1", vec![factory.create_concept_inclusion(a, b)]);
///
/// let mut classifier = Classifier::new(ClassifierConfig::default())?;
/// classifier.classify(&ontology)?;
/// assert!(ontology.node("A").is_some());
/// ```
pub struct Classifier {
    config: ClassifierConfig,
    pool: Option<Arc<ThreadPool>>,
    state: Option<ReasonerState>,

    normaliser_stats: NormaliserStats,
    saturation_stats: SaturationStats,
    taxonomy_stats: TaxonomyStats,
    full_runs: Counter,
    incremental_runs: Counter,
    fallbacks: Counter,
    taxonomy_rebuilds: Counter,
}

fn in_pool<R: Send>(pool: Option<&ThreadPool>, f: impl FnOnce() -> R + Send) -> R {
    match pool {
        Some(pool) => pool.install(f),
        None => f(),
    }
}

/// Add the entailments of newly seen datatype restrictions as NF1 forms
fn register_datatypes(datatypes: &mut DatatypeIndex, normalised: &mut Normalised) {
    let entailed: Vec<_> = normalised
        .datatypes
        .iter()
        .flat_map(|(id, datatype)| datatypes.register(*id, datatype))
        .collect();
    normalised.forms.extend(entailed);
}

fn named(name: &Arc<str>) -> Concept {
    Concept::Named(NamedConcept::from_interned(Arc::clone(name)))
}

/// Equivalences inside each node and inclusions to each non-TOP parent,
/// written with node representatives
fn inferred_axioms(taxonomy: &Taxonomy) -> Vec<Axiom> {
    let mut axioms = Vec::new();
    for node in taxonomy.nodes() {
        let rep = node.representative();
        for other in node.equivalents().iter().filter(|n| *n != rep) {
            axioms.push(Axiom::ConceptEquivalence {
                left: named(rep),
                right: named(other),
            });
        }
        if node.id() == taxonomy.bottom() {
            continue;
        }
        for parent in node.parents().to_sorted_vec() {
            if parent == taxonomy.top() {
                continue;
            }
            if let Some(p) = taxonomy.node(parent) {
                axioms.push(Axiom::ConceptInclusion {
                    lhs: named(rep),
                    rhs: named(p.representative()),
                });
            }
        }
    }
    axioms
}

impl Classifier {
    /// Validate `config` and set up the worker pool
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        let pool = match config.num_threads {
            Some(n) => Some(Arc::new(ThreadPoolBuilder::new().num_threads(n).build()?)),
            None => None,
        };
        Ok(Self {
            config,
            pool,
            state: None,
            normaliser_stats: NormaliserStats::default(),
            saturation_stats: SaturationStats::default(),
            taxonomy_stats: TaxonomyStats::default(),
            full_runs: Counter::new(),
            incremental_runs: Counter::new(),
            fallbacks: Counter::new(),
            taxonomy_rebuilds: Counter::new(),
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify `ontology` from scratch and publish the result
    pub fn classify(&mut self, ontology: &Ontology) -> Result<ClassificationOutcome> {
        let pool = self.pool.clone();
        in_pool(pool.as_deref(), || self.full_run(ontology))
    }

    /// Classify the axioms appended since the previous run of this ontology
    ///
    /// Falls back to a full run when incremental mode is off, when there is
    /// no previous run of the same ontology, when the previously absorbed
    /// axioms are no longer a prefix of the stated axioms, or when role
    /// axioms were added.
    pub fn classify_incremental(&mut self, ontology: &Ontology) -> Result<ClassificationOutcome> {
        let pool = self.pool.clone();
        in_pool(pool.as_deref(), || self.incremental_run(ontology))
    }

    /// Named subsumers of `concept_id` from the last run, itself included
    pub fn subsumers(&self, concept_id: &str) -> Option<ReadonlyConceptSet> {
        let state = self.state.as_ref()?;
        let id = state.ids.named_id(concept_id)?;
        let set: SparseConceptSet = state
            .engine
            .subsumers(id)?
            .iter()
            .filter(|&d| state.ids.is_named(d))
            .collect();
        Some(ReadonlyConceptSet::from_set(set))
    }

    /// Internal id of a named concept
    pub fn concept_id(&self, concept_id: &str) -> Option<u32> {
        self.state.as_ref()?.ids.named_id(concept_id)
    }

    /// External id of an internal named concept id
    pub fn concept_name(&self, id: u32) -> Option<Arc<str>> {
        self.state.as_ref()?.ids.name(id).cloned()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Full run
    // ═══════════════════════════════════════════════════════════════════════

    fn full_run(&mut self, ontology: &Ontology) -> Result<ClassificationOutcome> {
        let started = Instant::now();
        let stated = ontology.stated_axioms();
        info!(
            ontology = ontology.id(),
            version = ontology.version(),
            axioms = stated.len(),
            "full classification started"
        );

        let mut datatypes = DatatypeIndex::new();
        datatypes.validate(stated)?;

        let mut ids = IdFactory::new();
        let mut normaliser = Normaliser::new();
        let mut normalised = normaliser.normalise(stated, &mut ids, &self.normaliser_stats)?;
        register_datatypes(&mut datatypes, &mut normalised);
        debug!(
            forms = normalised.forms.len(),
            concepts = ids.concept_count(),
            roles = ids.role_count(),
            "normalised"
        );

        let index = AxiomIndex::from_forms(normalised.concept_forms());
        let roles = RoleIndex::build(normalised.role_forms());
        let mut engine = SaturationEngine::new();
        engine.ensure_contexts(ids.concept_count(), &roles, &self.saturation_stats);
        let rounds = engine.saturate(
            Rules {
                index: IndexView::only(&index),
                delta: None,
                roles: &roles,
            },
            self.config.parallel_threshold,
            &self.saturation_stats,
        );
        engine.take_changed();
        debug!(rounds, contexts = engine.len(), "saturated");

        let taxonomy = Arc::new(TaxonomyBuilder::new(&engine, &ids, &self.taxonomy_stats).build());
        let affected: Vec<NodeId> = (0..taxonomy.len() as NodeId).collect();
        let inferred: Arc<[Axiom]> = inferred_axioms(&taxonomy).into();

        let outcome = ClassificationOutcome {
            mode: ClassificationMode::Full,
            nodes: taxonomy.len(),
            affected: affected.len(),
            rounds,
            duration_ms: started.elapsed().as_millis() as u64,
        };
        ontology.publish(ClassificationSnapshot {
            taxonomy: Arc::clone(&taxonomy),
            affected: affected.into(),
            inferred: Arc::clone(&inferred),
        });

        self.state = Some(ReasonerState {
            ontology_id: Arc::from(ontology.id()),
            stated: stated.to_vec(),
            ids,
            normaliser,
            datatypes,
            index,
            roles,
            engine,
            taxonomy,
            inferred,
        });
        self.full_runs.incr();
        info!(
            nodes = outcome.nodes,
            rounds,
            duration_ms = outcome.duration_ms,
            "full classification finished"
        );
        Ok(outcome)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Incremental run
    // ═══════════════════════════════════════════════════════════════════════

    fn plan(&self, ontology: &Ontology) -> Plan {
        if !self.config.incremental {
            return Plan::Full("incremental mode disabled");
        }
        let Some(state) = self.state.as_ref() else {
            return Plan::Full("no previous run");
        };
        if *state.ontology_id != *ontology.id() {
            return Plan::Full("different ontology");
        }
        let stated = ontology.stated_axioms();
        let absorbed = state.stated.len();
        if stated.len() < absorbed || stated[..absorbed] != state.stated[..] {
            return Plan::Full("stated axioms are not an extension of the previous run");
        }
        if stated.len() == absorbed {
            return Plan::Unchanged;
        }
        if stated[absorbed..].iter().any(Axiom::is_role_axiom) {
            return Plan::Full("role axioms added");
        }
        Plan::Delta(absorbed)
    }

    fn incremental_run(&mut self, ontology: &Ontology) -> Result<ClassificationOutcome> {
        match self.plan(ontology) {
            Plan::Full(reason) => {
                warn!(ontology = ontology.id(), reason, "falling back to full classification");
                self.fallbacks.incr();
                self.full_run(ontology)
            }
            Plan::Unchanged => {
                let Some(state) = self.state.as_ref() else {
                    return self.full_run(ontology);
                };
                ontology.publish(ClassificationSnapshot {
                    taxonomy: Arc::clone(&state.taxonomy),
                    affected: Arc::from(Vec::new()),
                    inferred: Arc::clone(&state.inferred),
                });
                self.incremental_runs.incr();
                debug!(ontology = ontology.id(), "no new axioms");
                Ok(ClassificationOutcome {
                    mode: ClassificationMode::Incremental,
                    nodes: state.taxonomy.len(),
                    affected: 0,
                    rounds: 0,
                    duration_ms: 0,
                })
            }
            Plan::Delta(absorbed) => {
                let Some(mut state) = self.state.take() else {
                    return self.full_run(ontology);
                };
                let result = self.absorb(&mut state, ontology, absorbed);
                self.state = Some(state);
                if result.is_ok() {
                    self.incremental_runs.incr();
                }
                result
            }
        }
    }

    fn absorb(
        &self,
        state: &mut ReasonerState,
        ontology: &Ontology,
        absorbed: usize,
    ) -> Result<ClassificationOutcome> {
        let started = Instant::now();
        let delta_axioms = &ontology.stated_axioms()[absorbed..];
        info!(
            ontology = ontology.id(),
            version = ontology.version(),
            added = delta_axioms.len(),
            "incremental classification started"
        );

        // Input errors leave the state untouched
        state.datatypes.validate(delta_axioms)?;
        state.ids.begin_layer(self.config.max_overlay_depth);
        let mut normalised =
            match state
                .normaliser
                .normalise(delta_axioms, &mut state.ids, &self.normaliser_stats)
            {
                Ok(normalised) => normalised,
                Err(err) => {
                    state.ids.discard_layer();
                    return Err(err.into());
                }
            };
        register_datatypes(&mut state.datatypes, &mut normalised);
        debug!(
            forms = normalised.forms.len(),
            new_concepts = state.ids.concept_count() - state.ids.layer_start() as usize,
            "normalised delta"
        );

        let delta = AxiomIndex::from_forms(normalised.concept_forms());
        state
            .engine
            .ensure_contexts(state.ids.concept_count(), &state.roles, &self.saturation_stats);
        state.engine.seed_delta(&delta);
        let rounds = state.engine.saturate(
            Rules {
                index: IndexView::new(&state.index, Some(&delta)),
                delta: Some(&delta),
                roles: &state.roles,
            },
            self.config.parallel_threshold,
            &self.saturation_stats,
        );
        state.index.merge(delta);
        let changed = state.engine.take_changed();
        debug!(rounds, changed = changed.len(), "saturated delta");

        let builder = TaxonomyBuilder::new(&state.engine, &state.ids, &self.taxonomy_stats);
        let TaxonomyUpdate { taxonomy, affected } = builder
            .update(&state.taxonomy, &changed, self.config.max_overlay_depth)
            .unwrap_or_else(|| {
                warn!(
                    ontology = ontology.id(),
                    "equivalence classes changed, rebuilding taxonomy"
                );
                self.taxonomy_rebuilds.incr();
                builder.rebuild(&state.taxonomy)
            });
        let taxonomy = Arc::new(taxonomy);
        let inferred: Arc<[Axiom]> = inferred_axioms(&taxonomy).into();

        let outcome = ClassificationOutcome {
            mode: ClassificationMode::Incremental,
            nodes: taxonomy.len(),
            affected: affected.len(),
            rounds,
            duration_ms: started.elapsed().as_millis() as u64,
        };
        ontology.publish(ClassificationSnapshot {
            taxonomy: Arc::clone(&taxonomy),
            affected: affected.into(),
            inferred: Arc::clone(&inferred),
        });

        state.stated.extend_from_slice(delta_axioms);
        state.taxonomy = taxonomy;
        state.inferred = inferred;
        info!(
            nodes = outcome.nodes,
            affected = outcome.affected,
            rounds,
            duration_ms = outcome.duration_ms,
            "incremental classification finished"
        );
        Ok(outcome)
    }
}

impl StatsSource for Classifier {
    fn collect_stats(&self, sink: &mut StatsSink) {
        sink.counter("full_runs", self.full_runs.get());
        sink.counter("incremental_runs", self.incremental_runs.get());
        sink.counter("fallbacks", self.fallbacks.get());
        sink.counter("taxonomy_rebuilds", self.taxonomy_rebuilds.get());
        sink.nested("normaliser", &self.normaliser_stats);
        sink.nested("saturation", &self.saturation_stats);
        sink.nested("taxonomy", &self.taxonomy_stats);
    }

    fn reset_stats(&self) {
        self.full_runs.reset();
        self.incremental_runs.reset();
        self.fallbacks.reset();
        self.taxonomy_rebuilds.reset();
        self.normaliser_stats.reset_stats();
        self.saturation_stats.reset_stats();
        self.taxonomy_stats.reset_stats();
    }
}
