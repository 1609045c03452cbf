//! Concept expressions
//!
//! Concepts are immutable trees with structural equality and hashing. They
//! also have a total order: a deterministic structural hash first, then a
//! per-variant tie-break ([`Concept::compare_when_hashes_equal`]). Conjunction
//! operands are kept sorted in that order, so two equal conjunctions always
//! end up with the same operand sequence.

use super::literal::Literal;
use super::operator::Operator;
use super::role::{NamedFeature, NamedRole};
use crate::shared::constants::{BOTTOM_CONCEPT_ID, TOP_CONCEPT_ID};
use rustc_hash::FxHasher;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A named (atomic) concept
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedConcept {
    id: Arc<str>,
}

impl NamedConcept {
    pub(crate) fn from_interned(id: Arc<str>) -> Self {
        Self { id }
    }

    /// The universal concept
    pub fn top() -> Self {
        Self {
            id: Arc::from(TOP_CONCEPT_ID),
        }
    }

    /// The unsatisfiable concept
    pub fn bottom() -> Self {
        Self {
            id: Arc::from(BOTTOM_CONCEPT_ID),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_top(&self) -> bool {
        &*self.id == TOP_CONCEPT_ID
    }

    pub fn is_bottom(&self) -> bool {
        &*self.id == BOTTOM_CONCEPT_ID
    }
}

/// Conjunction of two or more concepts (canonical operand order)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Conjunction {
    operands: Arc<[Concept]>,
}

impl Conjunction {
    pub fn operands(&self) -> &[Concept] {
        &self.operands
    }

    /// Build the canonical form of `operands`
    ///
    /// Nested conjunctions are flattened, TOP operands dropped, duplicates
    /// removed and the rest sorted. An operand of BOTTOM makes the whole
    /// expression BOTTOM; zero operands give TOP; one operand is returned as is.
    pub(crate) fn canonical(operands: impl IntoIterator<Item = Concept>) -> Concept {
        let mut flat = Vec::new();
        let mut stack: Vec<Concept> = operands.into_iter().collect();
        while let Some(concept) = stack.pop() {
            match concept {
                Concept::Conjunction(inner) => stack.extend(inner.operands.iter().cloned()),
                Concept::Named(ref n) if n.is_top() => {}
                Concept::Named(ref n) if n.is_bottom() => {
                    return Concept::Named(NamedConcept::bottom());
                }
                other => flat.push(other),
            }
        }

        flat.sort();
        flat.dedup();

        match flat.len() {
            0 => Concept::Named(NamedConcept::top()),
            1 => flat.pop().unwrap_or_else(|| Concept::Named(NamedConcept::top())),
            _ => Concept::Conjunction(Conjunction {
                operands: flat.into(),
            }),
        }
    }

    /// Lexicographic comparison of the operand sequences
    pub fn compare_when_hashes_equal(&self, other: &Conjunction) -> Ordering {
        self.operands.iter().cmp(other.operands.iter())
    }
}

/// Existential restriction `∃role.filler`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Existential {
    role: NamedRole,
    filler: Arc<Concept>,
}

impl Existential {
    pub(crate) fn new(role: NamedRole, filler: Concept) -> Self {
        Self {
            role,
            filler: Arc::new(filler),
        }
    }

    pub fn role(&self) -> &NamedRole {
        &self.role
    }

    pub fn filler(&self) -> &Concept {
        &self.filler
    }

    /// Role first, then filler
    pub fn compare_when_hashes_equal(&self, other: &Existential) -> Ordering {
        self.role
            .cmp(&other.role)
            .then_with(|| self.filler.cmp(&other.filler))
    }
}

/// Datatype restriction `feature <operator> literal`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Datatype {
    feature: NamedFeature,
    operator: Operator,
    literal: Literal,
}

impl Datatype {
    pub(crate) fn new(feature: NamedFeature, operator: Operator, literal: Literal) -> Self {
        Self {
            feature,
            operator,
            literal,
        }
    }

    pub fn feature(&self) -> &NamedFeature {
        &self.feature
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn literal(&self) -> &Literal {
        &self.literal
    }

    /// Tie-break order: feature id, then operator, then the literal's string
    /// form. Literal kind and value settle the remaining cases so the order
    /// agrees with `Eq`.
    pub fn compare_when_hashes_equal(&self, other: &Datatype) -> Ordering {
        self.feature
            .cmp(&other.feature)
            .then_with(|| self.operator.cmp(&other.operator))
            .then_with(|| self.literal.to_string().cmp(&other.literal.to_string()))
            .then_with(|| self.literal.kind().cmp(&other.literal.kind()))
            .then_with(|| {
                self.literal
                    .compare(&other.literal)
                    .unwrap_or(Ordering::Equal)
            })
    }
}

/// A concept expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Concept {
    Named(NamedConcept),
    Conjunction(Conjunction),
    Existential(Existential),
    Datatype(Datatype),
}

impl Concept {
    pub fn top() -> Self {
        Concept::Named(NamedConcept::top())
    }

    pub fn bottom() -> Self {
        Concept::Named(NamedConcept::bottom())
    }

    /// Deterministic hash of the expression structure
    pub fn structural_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Named concepts and datatype restrictions are atomic for normalisation
    pub fn is_atomic(&self) -> bool {
        matches!(self, Concept::Named(_) | Concept::Datatype(_))
    }

    fn variant_rank(&self) -> u8 {
        match self {
            Concept::Named(_) => 0,
            Concept::Conjunction(_) => 1,
            Concept::Existential(_) => 2,
            Concept::Datatype(_) => 3,
        }
    }

    /// Order between two concepts whose structural hashes collide
    pub fn compare_when_hashes_equal(&self, other: &Concept) -> Ordering {
        match (self, other) {
            (Concept::Named(a), Concept::Named(b)) => a.cmp(b),
            (Concept::Conjunction(a), Concept::Conjunction(b)) => a.compare_when_hashes_equal(b),
            (Concept::Existential(a), Concept::Existential(b)) => a.compare_when_hashes_equal(b),
            (Concept::Datatype(a), Concept::Datatype(b)) => a.compare_when_hashes_equal(b),
            _ => self.variant_rank().cmp(&other.variant_rank()),
        }
    }

    /// Visit this expression and every sub-expression
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Concept)) {
        visit(self);
        match self {
            Concept::Conjunction(c) => {
                for operand in c.operands() {
                    operand.walk(visit);
                }
            }
            Concept::Existential(e) => e.filler().walk(visit),
            Concept::Named(_) | Concept::Datatype(_) => {}
        }
    }
}

impl PartialOrd for Concept {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Concept {
    fn cmp(&self, other: &Self) -> Ordering {
        if self == other {
            return Ordering::Equal;
        }
        self.structural_hash()
            .cmp(&other.structural_hash())
            .then_with(|| self.compare_when_hashes_equal(other))
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concept::Named(n) => f.write_str(n.id()),
            Concept::Conjunction(c) => {
                f.write_str("(")?;
                for (i, operand) in c.operands().iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ⊓ ")?;
                    }
                    write!(f, "{}", operand)?;
                }
                f.write_str(")")
            }
            Concept::Existential(e) => write!(f, "∃{}.{}", e.role(), e.filler()),
            Concept::Datatype(d) => write!(f, "{} {} {}", d.feature(), d.operator(), d.literal()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::model::domain::literal::{FloatLiteral, IntegerLiteral};

    fn named(id: &str) -> Concept {
        Concept::Named(NamedConcept::from_interned(Arc::from(id)))
    }

    fn feature(id: &str) -> NamedFeature {
        NamedFeature::from_interned(Arc::from(id))
    }

    #[test]
    fn test_conjunction_canonical_order() {
        let a = Conjunction::canonical([named("B"), named("A"), named("C")]);
        let b = Conjunction::canonical([named("C"), named("B"), named("A"), named("A")]);
        assert_eq!(a, b);
        assert_eq!(a.structural_hash(), b.structural_hash());
    }

    #[test]
    fn test_conjunction_flattening() {
        let inner = Conjunction::canonical([named("A"), named("B")]);
        let outer = Conjunction::canonical([inner, named("C")]);
        match outer {
            Concept::Conjunction(c) => assert_eq!(c.operands().len(), 3),
            other => panic!("expected conjunction, got {}", other),
        }
    }

    #[test]
    fn test_conjunction_degenerate_cases() {
        assert_eq!(Conjunction::canonical([]), Concept::top());
        assert_eq!(Conjunction::canonical([named("A")]), named("A"));
        assert_eq!(
            Conjunction::canonical([named("A"), Concept::top()]),
            named("A")
        );
        assert_eq!(
            Conjunction::canonical([named("A"), Concept::bottom()]),
            Concept::bottom()
        );
    }

    #[test]
    fn test_datatype_tie_break_precedence() {
        let base = Datatype::new(feature("f"), Operator::Equals, IntegerLiteral::of(5).into());
        let other_feature =
            Datatype::new(feature("g"), Operator::Equals, IntegerLiteral::of(1).into());
        let other_operator =
            Datatype::new(feature("f"), Operator::LessThan, IntegerLiteral::of(1).into());
        let other_literal =
            Datatype::new(feature("f"), Operator::Equals, IntegerLiteral::of(7).into());

        // Feature dominates operator and literal
        assert_eq!(base.compare_when_hashes_equal(&other_feature), Ordering::Less);
        // Operator dominates literal
        assert_eq!(base.compare_when_hashes_equal(&other_operator), Ordering::Less);
        // Literal string form last
        assert_eq!(base.compare_when_hashes_equal(&other_literal), Ordering::Less);
        assert_eq!(other_literal.compare_when_hashes_equal(&base), Ordering::Greater);
        assert_eq!(base.compare_when_hashes_equal(&base.clone()), Ordering::Equal);
    }

    #[test]
    fn test_datatype_kind_breaks_string_tie() {
        let int = Datatype::new(feature("f"), Operator::Equals, IntegerLiteral::of(1).into());
        let float = Datatype::new(feature("f"), Operator::Equals, FloatLiteral::of(1.0).into());
        assert_ne!(int.compare_when_hashes_equal(&float), Ordering::Equal);
    }

    #[test]
    fn test_walk_visits_sub_expressions() {
        let role = NamedRole::from_interned(Arc::from("r"));
        let expr = Conjunction::canonical([
            named("A"),
            Concept::Existential(Existential::new(role, named("B"))),
        ]);
        let mut seen = 0;
        expr.walk(&mut |_| seen += 1);
        assert_eq!(seen, 4);
    }
}
