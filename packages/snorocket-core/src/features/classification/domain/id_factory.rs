//! Dense internal ids for concepts and roles
//!
//! Concepts and roles live in separate id spaces. TOP and BOTTOM are fixed at
//! ids 0 and 1. Complex sub-expressions get ids too, so a repeated expression
//! is normalised once; auxiliary concepts and roles introduced by
//! normalisation are anonymous.
//!
//! The id to name table is layered per increment: each incremental run
//! freezes the current table as the base of a [`DuoConceptMap`] and writes only
//! the fresh ids of that run into the overlay.

use crate::features::concept_set::{CollectionResult, ConceptMap, DuoConceptMap, SparseConceptMap};
use crate::features::model::{Concept, NamedConcept, NamedRole};
use crate::shared::constants::internal_ids::{BOTTOM, TOP};
use rustc_hash::FxHashMap;
use std::sync::Arc;

pub struct IdFactory {
    concept_ids: FxHashMap<Concept, u32>,
    names: DuoConceptMap<Arc<str>>,
    named_flags: Vec<bool>,
    layer_start: u32,
    role_layer_start: u32,

    role_ids: FxHashMap<NamedRole, u32>,
    role_names: Vec<Option<NamedRole>>,
}

impl IdFactory {
    pub fn new() -> Self {
        let mut factory = Self {
            concept_ids: FxHashMap::default(),
            names: DuoConceptMap::new(Arc::new(SparseConceptMap::new())),
            named_flags: Vec::new(),
            layer_start: 0,
            role_layer_start: 0,
            role_ids: FxHashMap::default(),
            role_names: Vec::new(),
        };
        for (expected, sentinel) in [(TOP, Concept::top()), (BOTTOM, Concept::bottom())] {
            let id = factory.push_concept(Some(&sentinel));
            debug_assert_eq!(id, expected);
            factory.concept_ids.insert(sentinel, id);
        }
        factory
    }

    fn push_concept(&mut self, concept: Option<&Concept>) -> u32 {
        let id = self.named_flags.len() as u32;
        let named = matches!(concept, Some(Concept::Named(_)));
        self.named_flags.push(named);
        if let Some(Concept::Named(n)) = concept {
            // Fresh ids never collide with a frozen layer
            let _ = self.names.put(id, Arc::from(n.id()));
        }
        id
    }

    /// Get or allocate the id of `concept`. The flag is true for a fresh id.
    pub fn concept_id(&mut self, concept: &Concept) -> CollectionResult<(u32, bool)> {
        if let Some(&id) = self.concept_ids.get(concept) {
            return Ok((id, false));
        }
        let id = self.named_flags.len() as u32;
        self.named_flags.push(matches!(concept, Concept::Named(_)));
        if let Concept::Named(n) = concept {
            self.names.put(id, Arc::from(n.id()))?;
        }
        self.concept_ids.insert(concept.clone(), id);
        Ok((id, true))
    }

    /// Allocate an anonymous auxiliary concept
    pub fn fresh_concept(&mut self) -> u32 {
        self.push_concept(None)
    }

    pub fn lookup(&self, concept: &Concept) -> Option<u32> {
        self.concept_ids.get(concept).copied()
    }

    pub fn named_id(&self, name: &str) -> Option<u32> {
        self.lookup(&Concept::Named(NamedConcept::from_interned(Arc::from(name))))
    }

    pub fn is_named(&self, id: u32) -> bool {
        self.named_flags.get(id as usize).copied().unwrap_or(false)
    }

    pub fn name(&self, id: u32) -> Option<&Arc<str>> {
        self.names.get(id)
    }

    /// Ids of all named concepts, TOP and BOTTOM included, ascending
    pub fn named_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.named_flags
            .iter()
            .enumerate()
            .filter(|(_, &named)| named)
            .map(|(id, _)| id as u32)
    }

    pub fn concept_count(&self) -> usize {
        self.named_flags.len()
    }

    /// First id allocated in the current layer
    pub fn layer_start(&self) -> u32 {
        self.layer_start
    }

    pub fn names(&self) -> &DuoConceptMap<Arc<str>> {
        &self.names
    }

    /// Freeze the name table and start a new overlay
    ///
    /// Once the table is `max_depth` layers deep it is flattened into a
    /// single base first.
    pub fn begin_layer(&mut self, max_depth: usize) {
        let current = std::mem::replace(
            &mut self.names,
            DuoConceptMap::new(Arc::new(SparseConceptMap::new())),
        );
        let base: Arc<dyn ConceptMap<Arc<str>>> = if current.layers() >= max_depth {
            Arc::new(current.flatten())
        } else {
            Arc::new(current)
        };
        self.names = DuoConceptMap::new(base);
        self.layer_start = self.named_flags.len() as u32;
        self.role_layer_start = self.role_names.len() as u32;
    }

    /// Drop every concept and role id allocated since the last
    /// [`begin_layer`](Self::begin_layer)
    pub fn discard_layer(&mut self) {
        let start = self.layer_start;
        self.concept_ids.retain(|_, id| *id < start);
        self.named_flags.truncate(start as usize);
        self.names = DuoConceptMap::new(Arc::clone(self.names.base()));

        let roles = self.role_layer_start;
        self.role_ids.retain(|_, id| *id < roles);
        self.role_names.truncate(roles as usize);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Roles
    // ═══════════════════════════════════════════════════════════════════════

    pub fn role_id(&mut self, role: &NamedRole) -> u32 {
        if let Some(&id) = self.role_ids.get(role) {
            return id;
        }
        let id = self.role_names.len() as u32;
        self.role_names.push(Some(role.clone()));
        self.role_ids.insert(role.clone(), id);
        id
    }

    pub fn lookup_role(&self, role: &NamedRole) -> Option<u32> {
        self.role_ids.get(role).copied()
    }

    /// Allocate an anonymous auxiliary role
    pub fn fresh_role(&mut self) -> u32 {
        let id = self.role_names.len() as u32;
        self.role_names.push(None);
        id
    }

    pub fn role_name(&self, id: u32) -> Option<&NamedRole> {
        self.role_names.get(id as usize).and_then(|r| r.as_ref())
    }

    pub fn role_count(&self) -> usize {
        self.role_names.len()
    }
}

impl Default for IdFactory {
    fn default() -> Self {
        Self::new()
    }
}
