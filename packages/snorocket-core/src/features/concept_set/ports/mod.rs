//! Concept collection ports
//!
//! Integer-keyed sets and maps used by the classification engine. Mutators
//! return [`CollectionResult`] so read-only and layered implementations can
//! refuse an operation instead of panicking.

use thiserror::Error;

/// Errors raised by concept collections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// The collection does not support this mutation
    #[error("{operation} is not supported by {collection}")]
    Unsupported {
        operation: &'static str,
        collection: &'static str,
    },
}

impl CollectionError {
    pub(crate) fn unsupported(operation: &'static str, collection: &'static str) -> Self {
        Self::Unsupported {
            operation,
            collection,
        }
    }
}

pub type CollectionResult<T> = Result<T, CollectionError>;

/// A set of concept ids
pub trait ConceptSet: Send + Sync {
    /// Add a concept. Returns `true` if it was not present.
    fn add(&mut self, concept: u32) -> CollectionResult<bool>;

    fn add_all(&mut self, other: &dyn ConceptSet) -> CollectionResult<()> {
        for concept in other.iter() {
            self.add(concept)?;
        }
        Ok(())
    }

    /// Remove a concept. Returns `true` if it was present.
    fn remove(&mut self, concept: u32) -> CollectionResult<bool>;

    fn remove_all(&mut self, other: &dyn ConceptSet) -> CollectionResult<()> {
        for concept in other.iter() {
            self.remove(concept)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> CollectionResult<()>;

    fn contains(&self, concept: u32) -> bool;

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Iterate in ascending id order
    fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_>;

    fn to_array(&self) -> Vec<u32> {
        self.iter().collect()
    }
}

/// A map keyed by concept id
pub trait ConceptMap<V>: Send + Sync {
    fn get(&self, key: u32) -> Option<&V>;

    /// Insert or replace. Returns the previous value.
    fn put(&mut self, key: u32, value: V) -> CollectionResult<Option<V>>;

    fn contains_key(&self, key: u32) -> bool;

    fn remove(&mut self, key: u32) -> CollectionResult<Option<V>>;

    fn key_iter(&self) -> Box<dyn Iterator<Item = u32> + '_>;

    fn size(&self) -> usize;

    /// Reserve room for `additional` more keys
    fn grow(&mut self, additional: usize) -> CollectionResult<()>;

    fn clear(&mut self) -> CollectionResult<()>;

    /// Number of stacked layers (1 for a flat map)
    fn layers(&self) -> usize {
        1
    }

    /// Keys held by each layer, bottom layer first
    fn layer_keys(&self) -> Vec<Vec<u32>> {
        vec![self.key_iter().collect()]
    }
}
