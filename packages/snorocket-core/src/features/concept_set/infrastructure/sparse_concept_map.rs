//! Sorted-key concept map

use crate::features::concept_set::ports::{CollectionResult, ConceptMap};

/// Map from concept id to `V`, stored as a vector sorted by key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseConceptMap<V> {
    entries: Vec<(u32, V)>,
}

impl<V> Default for SparseConceptMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> SparseConceptMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    fn position(&self, key: u32) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&key, |(k, _)| *k)
    }

    pub fn insert(&mut self, key: u32, value: V) -> Option<V> {
        match self.position(key) {
            Ok(pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            Err(pos) => {
                self.entries.insert(pos, (key, value));
                None
            }
        }
    }

    pub fn lookup(&self, key: u32) -> Option<&V> {
        self.position(key).ok().map(|pos| &self.entries[pos].1)
    }

    pub fn delete(&mut self, key: u32) -> Option<V> {
        self.position(key).ok().map(|pos| self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &V)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v))
    }
}

impl<V> FromIterator<(u32, V)> for SparseConceptMap<V> {
    /// Later entries win on duplicate keys
    fn from_iter<I: IntoIterator<Item = (u32, V)>>(iter: I) -> Self {
        let mut entries: Vec<(u32, V)> = iter.into_iter().collect();
        entries.reverse();
        entries.sort_by_key(|(k, _)| *k);
        entries.dedup_by_key(|(k, _)| *k);
        Self { entries }
    }
}

impl<V: Send + Sync> ConceptMap<V> for SparseConceptMap<V> {
    fn get(&self, key: u32) -> Option<&V> {
        self.lookup(key)
    }

    fn put(&mut self, key: u32, value: V) -> CollectionResult<Option<V>> {
        Ok(self.insert(key, value))
    }

    fn contains_key(&self, key: u32) -> bool {
        self.position(key).is_ok()
    }

    fn remove(&mut self, key: u32) -> CollectionResult<Option<V>> {
        Ok(self.delete(key))
    }

    fn key_iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        Box::new(self.entries.iter().map(|(k, _)| *k))
    }

    fn size(&self) -> usize {
        self.entries.len()
    }

    fn grow(&mut self, additional: usize) -> CollectionResult<()> {
        self.entries.reserve(additional);
        Ok(())
    }

    fn clear(&mut self) -> CollectionResult<()> {
        self.entries.clear();
        Ok(())
    }
}
