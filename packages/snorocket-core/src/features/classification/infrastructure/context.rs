//! Per-concept saturation context
//!
//! A context owns everything derived about one concept `A`: its subsumers
//! S(A), its outgoing links `A → B` and incoming links `C → A`, both per role.
//! Only the worker processing `A` touches these; other contexts learn about
//! new facts through [`WorkItem`] messages delivered between rounds.
//!
//! Role chains `r ∘ s ⊑ t` fire at the middle context: when a predecessor
//! over `r` or a successor over `s` arrives, whichever comes second.

use super::axiom_index::{AxiomIndex, IndexView};
use super::role_index::RoleIndex;
use crate::features::concept_set::SparseConceptSet;
use crate::shared::constants::internal_ids::BOTTOM;
use crate::shared::constants::saturation::INITIAL_QUEUE_CAPACITY;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

/// A unit of work for one context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkItem {
    /// `x ∈ S(A)`
    Subsumer(u32),
    /// `x` is already in S(A); apply only the new axioms about `x`
    DeltaSubsumer(u32),
    /// `A → target` over `role`
    Link { role: u32, target: u32 },
    /// `source → A` over `role`
    Predecessor { role: u32, source: u32 },
}

/// Rules in force for one saturation run
#[derive(Clone, Copy)]
pub struct Rules<'a> {
    pub index: IndexView<'a>,
    pub delta: Option<&'a AxiomIndex>,
    pub roles: &'a RoleIndex,
}

/// Counts from one `process` call
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessCounts {
    pub items: u64,
    pub subsumers: u64,
    pub links: u64,
    pub messages: u64,
}

#[derive(Debug, Clone)]
pub struct Context {
    id: u32,
    subsumers: SparseConceptSet,
    successors: FxHashMap<u32, SparseConceptSet>,
    predecessors: FxHashMap<u32, SparseConceptSet>,
    queue: VecDeque<WorkItem>,
    changed: bool,
}

/// Routes a message to the local queue or to the outbox
struct Outbox<'a> {
    me: u32,
    queue: &'a mut VecDeque<WorkItem>,
    out: &'a mut Vec<(u32, WorkItem)>,
    sent: u64,
}

impl Outbox<'_> {
    #[inline]
    fn send(&mut self, target: u32, item: WorkItem) {
        if target == self.me {
            self.queue.push_back(item);
        } else {
            self.sent += 1;
            self.out.push((target, item));
        }
    }
}

impl Context {
    /// Fresh context, seeded with itself, TOP and its reflexive links
    pub fn new(id: u32, roles: &RoleIndex, top: u32) -> Self {
        let mut queue = VecDeque::with_capacity(INITIAL_QUEUE_CAPACITY);
        queue.push_back(WorkItem::Subsumer(id));
        if id != top {
            queue.push_back(WorkItem::Subsumer(top));
        }
        for &role in roles.reflexive() {
            queue.push_back(WorkItem::Link { role, target: id });
        }
        Self {
            id,
            subsumers: SparseConceptSet::new(),
            successors: FxHashMap::default(),
            predecessors: FxHashMap::default(),
            queue,
            changed: false,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn subsumers(&self) -> &SparseConceptSet {
        &self.subsumers
    }

    pub fn successors(&self, role: u32) -> Option<&SparseConceptSet> {
        self.successors.get(&role)
    }

    #[inline]
    pub fn has_work(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn push(&mut self, item: WorkItem) {
        self.queue.push_back(item);
    }

    /// Whether S(A) grew since the flag was last cleared
    pub fn take_changed(&mut self) -> bool {
        std::mem::replace(&mut self.changed, false)
    }

    /// Drain the queue; messages for other contexts are appended to `out`
    pub fn process(&mut self, rules: Rules<'_>, out: &mut Vec<(u32, WorkItem)>) -> ProcessCounts {
        let Context {
            id,
            subsumers,
            successors,
            predecessors,
            queue,
            changed,
        } = self;
        let mut outbox = Outbox {
            me: *id,
            queue,
            out,
            sent: 0,
        };
        let mut counts = ProcessCounts::default();

        while let Some(item) = outbox.queue.pop_front() {
            counts.items += 1;
            match item {
                WorkItem::Subsumer(x) => {
                    if subsumers.insert(x) {
                        *changed = true;
                        counts.subsumers += 1;
                        apply_subsumer(x, rules.index, subsumers, predecessors, &mut outbox);
                    }
                }
                WorkItem::DeltaSubsumer(x) => {
                    if subsumers.contains(x) {
                        if let Some(delta) = rules.delta {
                            apply_subsumer(
                                x,
                                IndexView::only(delta),
                                subsumers,
                                predecessors,
                                &mut outbox,
                            );
                        }
                    } else if subsumers.insert(x) {
                        *changed = true;
                        counts.subsumers += 1;
                        apply_subsumer(x, rules.index, subsumers, predecessors, &mut outbox);
                    }
                }
                WorkItem::Link { role, target } => {
                    for s in rules.roles.super_roles(role) {
                        if !successors.entry(s).or_default().insert(target) {
                            continue;
                        }
                        counts.links += 1;
                        outbox.send(target, WorkItem::Predecessor { role: s, source: *id });

                        // left ∘ s ⊑ u with this context in the middle
                        for &(left, u) in rules.roles.chains_by_right(s) {
                            if let Some(preds) = predecessors.get(&left) {
                                for source in preds.iter() {
                                    outbox.send(source, WorkItem::Link { role: u, target });
                                }
                            }
                        }
                    }
                }
                WorkItem::Predecessor { role, source } => {
                    if !predecessors.entry(role).or_default().insert(source) {
                        continue;
                    }

                    // NF4 for everything already in S(A)
                    for x in subsumers.iter() {
                        for b in rules.index.nf4_for_role(x, role) {
                            outbox.send(source, WorkItem::Subsumer(b));
                        }
                    }
                    if subsumers.contains(BOTTOM) {
                        outbox.send(source, WorkItem::Subsumer(BOTTOM));
                    }

                    // role ∘ right ⊑ u with this context in the middle
                    for &(right, u) in rules.roles.chains_by_left(role) {
                        if let Some(succs) = successors.get(&right) {
                            for target in succs.iter() {
                                outbox.send(source, WorkItem::Link { role: u, target });
                            }
                        }
                    }
                }
            }
        }

        counts.messages = outbox.sent;
        counts
    }
}

/// Rules triggered by `x ∈ S(A)`
fn apply_subsumer(
    x: u32,
    index: IndexView<'_>,
    subsumers: &SparseConceptSet,
    predecessors: &FxHashMap<u32, SparseConceptSet>,
    outbox: &mut Outbox<'_>,
) {
    let me = outbox.me;

    for b in index.nf1(x) {
        outbox.send(me, WorkItem::Subsumer(b));
    }

    for (other, b) in index.nf2(x) {
        if subsumers.contains(other) {
            outbox.send(me, WorkItem::Subsumer(b));
        }
    }

    for (role, filler) in index.nf3(x) {
        outbox.send(me, WorkItem::Link { role, target: filler });
    }

    for (role, b) in index.nf4(x) {
        if let Some(preds) = predecessors.get(&role) {
            for source in preds.iter() {
                outbox.send(source, WorkItem::Subsumer(b));
            }
        }
    }

    if x == BOTTOM {
        for preds in predecessors.values() {
            for source in preds.iter() {
                outbox.send(source, WorkItem::Subsumer(BOTTOM));
            }
        }
    }
}
