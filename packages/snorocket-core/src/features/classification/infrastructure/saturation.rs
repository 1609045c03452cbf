//! Saturation engine
//!
//! Runs the completion rules to a fixpoint in rounds. Each round processes
//! every context with queued work, in parallel once enough contexts are
//! active; messages between contexts are delivered after the round. The run
//! ends when a round leaves no queued work anywhere.
//!
//! # Performance Characteristics
//! - No locks: a context is only touched by the worker processing it
//! - Counters are summed per context and flushed to the atomics once
//! - The fixpoint does not depend on processing order, so results are
//!   identical for any thread count

use super::axiom_index::AxiomIndex;
use super::context::{Context, ProcessCounts, Rules, WorkItem};
use super::role_index::RoleIndex;
use crate::features::concept_set::SparseConceptSet;
use crate::features::stats::{Counter, StatsSink, StatsSource};
use crate::shared::constants::internal_ids::TOP;
use std::time::Instant;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Saturation counters
#[derive(Debug, Default)]
pub struct SaturationStats {
    pub rounds: Counter,
    pub parallel_rounds: Counter,
    pub contexts: Counter,
    pub items: Counter,
    pub subsumers: Counter,
    pub links: Counter,
    pub messages: Counter,
    pub max_active: Counter,
    pub duration_ms: Counter,
}

impl SaturationStats {
    fn record(&self, counts: ProcessCounts) {
        self.items.add(counts.items);
        self.subsumers.add(counts.subsumers);
        self.links.add(counts.links);
        self.messages.add(counts.messages);
    }
}

impl StatsSource for SaturationStats {
    fn collect_stats(&self, sink: &mut StatsSink) {
        sink.counter("rounds", self.rounds.get());
        sink.counter("parallel_rounds", self.parallel_rounds.get());
        sink.counter("contexts", self.contexts.get());
        sink.counter("items", self.items.get());
        sink.counter("subsumers", self.subsumers.get());
        sink.counter("links", self.links.get());
        sink.counter("messages", self.messages.get());
        sink.counter("max_active", self.max_active.get());
        sink.counter("duration_ms", self.duration_ms.get());
    }

    fn reset_stats(&self) {
        self.rounds.reset();
        self.parallel_rounds.reset();
        self.contexts.reset();
        self.items.reset();
        self.subsumers.reset();
        self.links.reset();
        self.messages.reset();
        self.max_active.reset();
        self.duration_ms.reset();
    }
}

/// One context per concept id, indexed densely
#[derive(Debug, Default)]
pub struct SaturationEngine {
    contexts: Vec<Context>,
}

impl SaturationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create contexts for every id below `count`
    pub fn ensure_contexts(&mut self, count: usize, roles: &RoleIndex, stats: &SaturationStats) {
        let start = self.contexts.len();
        if count <= start {
            return;
        }
        self.contexts.reserve(count - start);
        for id in start..count {
            self.contexts.push(Context::new(id as u32, roles, TOP));
        }
        stats.contexts.add((count - start) as u64);
    }

    /// Queue the new axioms of `delta` at every context already holding one
    /// of their left concepts
    pub fn seed_delta(&mut self, delta: &AxiomIndex) {
        let keys = delta.keys();
        if keys.is_empty() {
            return;
        }
        let seed = |ctx: &mut Context| {
            let hits: Vec<u32> = keys
                .iter()
                .copied()
                .filter(|&k| ctx.subsumers().contains(k))
                .collect();
            for key in hits {
                ctx.push(WorkItem::DeltaSubsumer(key));
            }
        };

        #[cfg(feature = "parallel")]
        self.contexts.par_iter_mut().for_each(seed);

        #[cfg(not(feature = "parallel"))]
        self.contexts.iter_mut().for_each(seed);
    }

    /// Run to the fixpoint. Returns the number of rounds.
    pub fn saturate(&mut self, rules: Rules<'_>, parallel_threshold: usize, stats: &SaturationStats) -> usize {
        let started = Instant::now();
        let mut rounds = 0usize;

        loop {
            let active = self.contexts.iter().filter(|c| c.has_work()).count();
            if active == 0 {
                break;
            }
            rounds += 1;
            stats.rounds.incr();
            stats.max_active.max(active as u64);

            let outboxes = if active >= parallel_threshold {
                stats.parallel_rounds.incr();
                self.round_parallel(rules, stats)
            } else {
                self.round_sequential(rules, stats)
            };

            let mut delivered = 0usize;
            for outbox in outboxes {
                delivered += outbox.len();
                for (target, item) in outbox {
                    if let Some(ctx) = self.contexts.get_mut(target as usize) {
                        ctx.push(item);
                    }
                }
            }
            debug!(round = rounds, active, delivered, "saturation round");
        }

        stats
            .duration_ms
            .add(started.elapsed().as_millis() as u64);
        rounds
    }

    fn round_sequential(&mut self, rules: Rules<'_>, stats: &SaturationStats) -> Vec<Vec<(u32, WorkItem)>> {
        let mut out = Vec::new();
        for ctx in self.contexts.iter_mut().filter(|c| c.has_work()) {
            stats.record(ctx.process(rules, &mut out));
        }
        vec![out]
    }

    #[cfg(feature = "parallel")]
    fn round_parallel(&mut self, rules: Rules<'_>, stats: &SaturationStats) -> Vec<Vec<(u32, WorkItem)>> {
        self.contexts
            .par_iter_mut()
            .filter(|c| c.has_work())
            .map(|ctx| {
                let mut out = Vec::new();
                stats.record(ctx.process(rules, &mut out));
                out
            })
            .filter(|out| !out.is_empty())
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn round_parallel(&mut self, rules: Rules<'_>, stats: &SaturationStats) -> Vec<Vec<(u32, WorkItem)>> {
        self.round_sequential(rules, stats)
    }

    /// Ids whose subsumer set grew since the last call, ascending
    pub fn take_changed(&mut self) -> Vec<u32> {
        self.contexts
            .iter_mut()
            .filter_map(|c| c.take_changed().then(|| c.id()))
            .collect()
    }

    pub fn subsumers(&self, id: u32) -> Option<&SparseConceptSet> {
        self.contexts.get(id as usize).map(Context::subsumers)
    }

    /// `sup ∈ S(sub)`
    #[inline]
    pub fn subsumes(&self, sub: u32, sup: u32) -> bool {
        self.subsumers(sub).map(|s| s.contains(sup)).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
