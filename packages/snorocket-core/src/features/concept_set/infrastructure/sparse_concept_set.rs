//! Sparse concept set
//!
//! Sorted vector with a deferred pending buffer:
//! - Insert: O(1) amortized, new ids go to an unsorted buffer
//! - Contains: O(log n) plus a short scan of the buffer
//! - Iteration: ascending order, merging both parts without consolidating
//!
//! The pending buffer never holds an id that is already in the sorted part,
//! so the size is always the sum of both lengths.

use crate::features::concept_set::ports::{CollectionResult, ConceptSet};
use crate::shared::constants::concept_set::PENDING_FLUSH_THRESHOLD;
use std::cmp::Ordering;

/// Working set of concept ids used by the saturation engine
#[derive(Debug, Clone, Default)]
pub struct SparseConceptSet {
    /// Sorted elements (main storage)
    elements: Vec<u32>,

    /// Pending insertions, unsorted, disjoint from `elements`
    pending: Vec<u32>,
}

impl SparseConceptSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
            pending: Vec::new(),
        }
    }

    #[inline]
    pub fn singleton(concept: u32) -> Self {
        Self {
            elements: vec![concept],
            pending: Vec::new(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Internal: Consolidation (Deferred Sorting)
    // ═══════════════════════════════════════════════════════════════════════

    /// Merge the pending buffer into the sorted storage
    fn consolidate(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        self.pending.sort_unstable();

        if self.elements.is_empty() {
            std::mem::swap(&mut self.elements, &mut self.pending);
            return;
        }

        let mut merged = Vec::with_capacity(self.elements.len() + self.pending.len());
        let mut i = 0;
        let mut j = 0;

        while i < self.elements.len() && j < self.pending.len() {
            match self.elements[i].cmp(&self.pending[j]) {
                Ordering::Less => {
                    merged.push(self.elements[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    merged.push(self.pending[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    merged.push(self.elements[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&self.elements[i..]);
        merged.extend_from_slice(&self.pending[j..]);

        self.elements = merged;
        self.pending.clear();
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Basic Operations
    // ═══════════════════════════════════════════════════════════════════════

    /// Insert a concept. Returns true if it was not present.
    #[inline]
    pub fn insert(&mut self, concept: u32) -> bool {
        if self.contains(concept) {
            return false;
        }

        self.pending.push(concept);
        if self.pending.len() >= PENDING_FLUSH_THRESHOLD {
            self.consolidate();
        }
        true
    }

    /// Remove a concept. Returns true if it was present.
    pub fn take(&mut self, concept: u32) -> bool {
        if let Some(pos) = self.pending.iter().position(|&p| p == concept) {
            self.pending.swap_remove(pos);
            return true;
        }
        match self.elements.binary_search(&concept) {
            Ok(pos) => {
                self.elements.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    #[inline]
    pub fn contains(&self, concept: u32) -> bool {
        self.pending.contains(&concept) || self.elements.binary_search(&concept).is_ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len() + self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.pending.is_empty()
    }

    pub fn reset(&mut self) {
        self.elements.clear();
        self.pending.clear();
    }

    /// Iterate in ascending order
    pub fn iter(&self) -> MergedIterator<'_> {
        if self.pending.is_empty() {
            MergedIterator::sorted_only(&self.elements)
        } else {
            MergedIterator::new(&self.elements, &self.pending)
        }
    }

    /// Union in place. Returns the ids that were new.
    pub fn union_with(&mut self, other: &SparseConceptSet) -> Vec<u32> {
        let added: Vec<u32> = other.iter().filter(|&c| !self.contains(c)).collect();
        if added.is_empty() {
            return added;
        }
        self.pending.extend_from_slice(&added);
        self.consolidate();
        added
    }

    pub fn is_subset_of(&self, other: &SparseConceptSet) -> bool {
        self.len() <= other.len() && self.iter().all(|c| other.contains(c))
    }

    pub fn first(&self) -> Option<u32> {
        let elem_min = self.elements.first().copied();
        let pending_min = self.pending.iter().copied().min();
        match (elem_min, pending_min) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Merge pending inserts now (useful before a long read-only phase)
    pub fn compact(&mut self) {
        self.consolidate();
    }
}

impl PartialEq for SparseConceptSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for SparseConceptSet {}

impl FromIterator<u32> for SparseConceptSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut elements: Vec<u32> = iter.into_iter().collect();
        elements.sort_unstable();
        elements.dedup();
        Self {
            elements,
            pending: Vec::new(),
        }
    }
}

impl Extend<u32> for SparseConceptSet {
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) {
        for concept in iter {
            self.insert(concept);
        }
    }
}

impl ConceptSet for SparseConceptSet {
    fn add(&mut self, concept: u32) -> CollectionResult<bool> {
        Ok(self.insert(concept))
    }

    fn remove(&mut self, concept: u32) -> CollectionResult<bool> {
        Ok(self.take(concept))
    }

    fn clear(&mut self) -> CollectionResult<()> {
        self.reset();
        Ok(())
    }

    fn contains(&self, concept: u32) -> bool {
        SparseConceptSet::contains(self, concept)
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        Box::new(SparseConceptSet::iter(self))
    }
}

/// Iterator that merges sorted and pending elements
pub struct MergedIterator<'a> {
    sorted: std::iter::Peekable<std::slice::Iter<'a, u32>>,
    pending_sorted: Vec<u32>,
    pending_idx: usize,
}

impl<'a> MergedIterator<'a> {
    fn new(sorted: &'a [u32], pending: &[u32]) -> Self {
        let mut pending_sorted = pending.to_vec();
        pending_sorted.sort_unstable();
        Self {
            sorted: sorted.iter().peekable(),
            pending_sorted,
            pending_idx: 0,
        }
    }

    fn sorted_only(sorted: &'a [u32]) -> Self {
        Self {
            sorted: sorted.iter().peekable(),
            pending_sorted: Vec::new(),
            pending_idx: 0,
        }
    }
}

impl Iterator for MergedIterator<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let pending_next = self.pending_sorted.get(self.pending_idx).copied();
        match (self.sorted.peek().copied().copied(), pending_next) {
            (Some(s), Some(p)) if p < s => {
                self.pending_idx += 1;
                Some(p)
            }
            (Some(_), _) => self.sorted.next().copied(),
            (None, Some(p)) => {
                self.pending_idx += 1;
                Some(p)
            }
            (None, None) => None,
        }
    }
}
