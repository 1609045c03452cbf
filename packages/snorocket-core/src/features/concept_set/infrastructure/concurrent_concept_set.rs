//! Concurrent concept set
//!
//! DashSet-backed set that several rayon workers can write through a shared
//! reference. Used for taxonomy parent and child links.

use crate::features::concept_set::ports::{CollectionResult, ConceptSet};
use dashmap::DashSet;
use rustc_hash::FxBuildHasher;

#[derive(Debug, Clone)]
pub struct ConcurrentConceptSet {
    inner: DashSet<u32, FxBuildHasher>,
}

impl Default for ConcurrentConceptSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ConcurrentConceptSet {
    pub fn new() -> Self {
        Self {
            inner: DashSet::with_hasher(FxBuildHasher),
        }
    }

    /// Insert through a shared reference. Returns true if newly added.
    #[inline]
    pub fn insert(&self, concept: u32) -> bool {
        self.inner.insert(concept)
    }

    #[inline]
    pub fn take(&self, concept: u32) -> bool {
        self.inner.remove(&concept).is_some()
    }

    #[inline]
    pub fn contains(&self, concept: u32) -> bool {
        self.inner.contains(&concept)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Snapshot of the members in ascending order
    pub fn to_sorted_vec(&self) -> Vec<u32> {
        let mut members: Vec<u32> = self.inner.iter().map(|entry| *entry).collect();
        members.sort_unstable();
        members
    }
}

impl FromIterator<u32> for ConcurrentConceptSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let set = Self::new();
        for concept in iter {
            set.insert(concept);
        }
        set
    }
}

impl PartialEq for ConcurrentConceptSet {
    fn eq(&self, other: &Self) -> bool {
        self.to_sorted_vec() == other.to_sorted_vec()
    }
}

impl Eq for ConcurrentConceptSet {}

impl ConceptSet for ConcurrentConceptSet {
    fn add(&mut self, concept: u32) -> CollectionResult<bool> {
        Ok(self.insert(concept))
    }

    fn remove(&mut self, concept: u32) -> CollectionResult<bool> {
        Ok(self.take(concept))
    }

    fn clear(&mut self) -> CollectionResult<()> {
        self.inner.clear();
        Ok(())
    }

    fn contains(&self, concept: u32) -> bool {
        ConcurrentConceptSet::contains(self, concept)
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        Box::new(self.to_sorted_vec().into_iter())
    }
}
