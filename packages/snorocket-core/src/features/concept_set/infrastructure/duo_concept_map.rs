//! Layered concept map
//!
//! A shared, read-only base under a private mutable overlay. Lookups consult
//! the base first, so the base wins when both layers hold a key. Only the
//! overlay can change; mutations that would shadow or drop a base key are
//! rejected.
//!
//! Callers keep the two key sets disjoint by writing only fresh ids into the
//! overlay. [`DuoConceptMap::key_iter`] relies on that and yields base keys
//! followed by overlay keys without deduplicating.

use super::sparse_concept_map::SparseConceptMap;
use crate::features::concept_set::ports::{CollectionError, CollectionResult, ConceptMap};
use std::sync::Arc;

const COLLECTION: &str = "DuoConceptMap";

pub struct DuoConceptMap<V> {
    base: Arc<dyn ConceptMap<V>>,
    overlay: SparseConceptMap<V>,
}

impl<V> DuoConceptMap<V> {
    pub fn new(base: Arc<dyn ConceptMap<V>>) -> Self {
        Self {
            base,
            overlay: SparseConceptMap::new(),
        }
    }

    pub fn with_overlay(base: Arc<dyn ConceptMap<V>>, overlay: SparseConceptMap<V>) -> Self {
        Self { base, overlay }
    }

    pub fn base(&self) -> &Arc<dyn ConceptMap<V>> {
        &self.base
    }

    pub fn overlay(&self) -> &SparseConceptMap<V> {
        &self.overlay
    }
}

impl<V: Clone> DuoConceptMap<V> {
    /// Materialise both layers into a single map
    pub fn flatten(&self) -> SparseConceptMap<V> {
        let mut flat = SparseConceptMap::with_capacity(self.base.size() + self.overlay.len());
        for key in self.base.key_iter() {
            if let Some(value) = self.base.get(key) {
                flat.insert(key, value.clone());
            }
        }
        for (key, value) in self.overlay.iter() {
            if !self.base.contains_key(key) {
                flat.insert(key, value.clone());
            }
        }
        flat
    }
}

impl<V: Send + Sync> ConceptMap<V> for DuoConceptMap<V> {
    fn get(&self, key: u32) -> Option<&V> {
        self.base.get(key).or_else(|| self.overlay.lookup(key))
    }

    fn put(&mut self, key: u32, value: V) -> CollectionResult<Option<V>> {
        if self.base.contains_key(key) {
            return Err(CollectionError::unsupported("put of a base key", COLLECTION));
        }
        Ok(self.overlay.insert(key, value))
    }

    fn contains_key(&self, key: u32) -> bool {
        self.base.contains_key(key) || self.overlay.lookup(key).is_some()
    }

    fn remove(&mut self, key: u32) -> CollectionResult<Option<V>> {
        if self.base.contains_key(key) {
            return Err(CollectionError::unsupported("remove of a base key", COLLECTION));
        }
        Ok(self.overlay.delete(key))
    }

    fn key_iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        Box::new(
            self.base
                .key_iter()
                .chain(self.overlay.iter().map(|(key, _)| key)),
        )
    }

    fn size(&self) -> usize {
        self.base.size() + self.overlay.len()
    }

    fn grow(&mut self, _additional: usize) -> CollectionResult<()> {
        Err(CollectionError::unsupported("grow", COLLECTION))
    }

    fn clear(&mut self) -> CollectionResult<()> {
        Err(CollectionError::unsupported("clear", COLLECTION))
    }

    fn layers(&self) -> usize {
        self.base.layers() + 1
    }

    fn layer_keys(&self) -> Vec<Vec<u32>> {
        let mut layers = self.base.layer_keys();
        layers.push(self.overlay.iter().map(|(key, _)| key).collect());
        layers
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for DuoConceptMap<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuoConceptMap")
            .field("base_size", &self.base.size())
            .field("overlay", &self.overlay)
            .finish()
    }
}
