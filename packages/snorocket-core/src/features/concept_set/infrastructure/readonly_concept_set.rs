//! Read-only view of a concept set

use super::sparse_concept_set::SparseConceptSet;
use crate::features::concept_set::ports::{CollectionError, CollectionResult, ConceptSet};
use std::sync::Arc;

const COLLECTION: &str = "ReadonlyConceptSet";

/// Shares a set and rejects every mutation
///
/// Cloning is cheap; all clones see the same underlying set.
#[derive(Debug)]
pub struct ReadonlyConceptSet<S = SparseConceptSet> {
    inner: Arc<S>,
}

impl<S> Clone for ReadonlyConceptSet<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ConceptSet> ReadonlyConceptSet<S> {
    pub fn new(inner: Arc<S>) -> Self {
        Self { inner }
    }

    pub fn from_set(set: S) -> Self {
        Self {
            inner: Arc::new(set),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: ConceptSet> ConceptSet for ReadonlyConceptSet<S> {
    fn add(&mut self, _concept: u32) -> CollectionResult<bool> {
        Err(CollectionError::unsupported("add", COLLECTION))
    }

    fn add_all(&mut self, _other: &dyn ConceptSet) -> CollectionResult<()> {
        Err(CollectionError::unsupported("add_all", COLLECTION))
    }

    fn remove(&mut self, _concept: u32) -> CollectionResult<bool> {
        Err(CollectionError::unsupported("remove", COLLECTION))
    }

    fn remove_all(&mut self, _other: &dyn ConceptSet) -> CollectionResult<()> {
        Err(CollectionError::unsupported("remove_all", COLLECTION))
    }

    fn clear(&mut self) -> CollectionResult<()> {
        Err(CollectionError::unsupported("clear", COLLECTION))
    }

    fn contains(&self, concept: u32) -> bool {
        self.inner.contains(concept)
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        self.inner.iter()
    }
}
