//! Axioms over concepts and roles

use super::concept::Concept;
use super::role::NamedRole;
use std::fmt;
use std::sync::Arc;

/// A stated or inferred axiom
///
/// `RoleInclusion` covers three shapes, depending on the length of `lhs`:
/// one role is a role hierarchy axiom, two or more a role chain, and zero
/// states that `rhs` is reflexive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Axiom {
    ConceptInclusion { lhs: Concept, rhs: Concept },
    ConceptEquivalence { left: Concept, right: Concept },
    RoleInclusion { lhs: Arc<[NamedRole]>, rhs: NamedRole },
}

impl Axiom {
    pub fn is_role_axiom(&self) -> bool {
        matches!(self, Axiom::RoleInclusion { .. })
    }

    /// Concepts appearing at the top level of the axiom
    pub fn concepts(&self) -> Vec<&Concept> {
        match self {
            Axiom::ConceptInclusion { lhs, rhs } => vec![lhs, rhs],
            Axiom::ConceptEquivalence { left, right } => vec![left, right],
            Axiom::RoleInclusion { .. } => Vec::new(),
        }
    }
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axiom::ConceptInclusion { lhs, rhs } => write!(f, "{} ⊑ {}", lhs, rhs),
            Axiom::ConceptEquivalence { left, right } => write!(f, "{} ≡ {}", left, right),
            Axiom::RoleInclusion { lhs, rhs } if lhs.is_empty() => write!(f, "reflexive({})", rhs),
            Axiom::RoleInclusion { lhs, rhs } => {
                for (i, role) in lhs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ∘ ")?;
                    }
                    write!(f, "{}", role)?;
                }
                write!(f, " ⊑ {}", rhs)
            }
        }
    }
}
