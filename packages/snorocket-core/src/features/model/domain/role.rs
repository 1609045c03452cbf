//! Named roles and features

use std::fmt;
use std::sync::Arc;

/// A named role (object property)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedRole {
    id: Arc<str>,
}

impl NamedRole {
    pub(crate) fn from_interned(id: Arc<str>) -> Self {
        Self { id }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for NamedRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// A named feature (data property)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedFeature {
    id: Arc<str>,
}

impl NamedFeature {
    pub(crate) fn from_interned(id: Arc<str>) -> Self {
        Self { id }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for NamedFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
