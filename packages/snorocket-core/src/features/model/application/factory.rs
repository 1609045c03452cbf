//! Factory for model values
//!
//! Every concept, role, literal and axiom is created here. Identifier strings
//! are interned through a concurrent map so equal names share one allocation,
//! and conjunctions are canonicalised on construction.

use crate::features::model::domain::{
    Axiom, BigIntegerLiteral, Concept, Conjunction, Datatype, DateLiteral, DecimalLiteral,
    Existential, FloatLiteral, IntegerLiteral, Literal, LongLiteral, NamedConcept, NamedFeature,
    NamedRole, Operator, StringLiteral,
};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use dashmap::DashMap;
use num_bigint::BigInt;
use std::sync::Arc;

/// Construction surface for the model
///
/// `Factory` is `Sync`; axioms can be built from several threads at once.
#[derive(Debug, Default)]
pub struct Factory {
    interner: DashMap<Arc<str>, Arc<str>>,
}

impl Factory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string (concurrent-safe, deduplicates automatically)
    fn intern(&self, s: &str) -> Arc<str> {
        if let Some(entry) = self.interner.get(s) {
            return Arc::clone(entry.value());
        }

        let arc: Arc<str> = Arc::from(s);
        self.interner
            .entry(Arc::clone(&arc))
            .or_insert(arc)
            .clone()
    }

    /// Number of distinct identifier strings seen
    pub fn interned_count(&self) -> usize {
        self.interner.len()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Concepts
    // ═══════════════════════════════════════════════════════════════════════

    pub fn create_named_concept(&self, id: &str) -> Concept {
        Concept::Named(NamedConcept::from_interned(self.intern(id)))
    }

    pub fn top(&self) -> Concept {
        Concept::top()
    }

    pub fn bottom(&self) -> Concept {
        Concept::bottom()
    }

    /// Canonical conjunction of `operands`
    ///
    /// Zero operands give TOP and a single operand is returned unchanged.
    pub fn create_conjunction(&self, operands: impl IntoIterator<Item = Concept>) -> Concept {
        Conjunction::canonical(operands)
    }

    pub fn create_existential(&self, role: NamedRole, filler: Concept) -> Concept {
        Concept::Existential(Existential::new(role, filler))
    }

    pub fn create_datatype(
        &self,
        feature: NamedFeature,
        operator: Operator,
        literal: impl Into<Literal>,
    ) -> Concept {
        Concept::Datatype(Datatype::new(feature, operator, literal.into()))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Roles and features
    // ═══════════════════════════════════════════════════════════════════════

    pub fn create_named_role(&self, id: &str) -> NamedRole {
        NamedRole::from_interned(self.intern(id))
    }

    pub fn create_named_feature(&self, id: &str) -> NamedFeature {
        NamedFeature::from_interned(self.intern(id))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Literals
    // ═══════════════════════════════════════════════════════════════════════

    pub fn create_integer_literal(&self, value: i32) -> Literal {
        IntegerLiteral::of(value).into()
    }

    pub fn create_long_literal(&self, value: i64) -> Literal {
        LongLiteral::of(value).into()
    }

    pub fn create_float_literal(&self, value: f32) -> Literal {
        FloatLiteral::of(value).into()
    }

    pub fn create_big_integer_literal(&self, value: BigInt) -> Literal {
        BigIntegerLiteral::of(value).into()
    }

    pub fn create_decimal_literal(&self, value: BigDecimal) -> Literal {
        DecimalLiteral::of(value).into()
    }

    pub fn create_date_literal(&self, value: NaiveDate) -> Literal {
        DateLiteral::of(value).into()
    }

    pub fn create_string_literal(&self, value: &str) -> Literal {
        StringLiteral::of(value).into()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Axioms
    // ═══════════════════════════════════════════════════════════════════════

    /// `lhs ⊑ rhs`
    pub fn create_concept_inclusion(&self, lhs: Concept, rhs: Concept) -> Axiom {
        Axiom::ConceptInclusion { lhs, rhs }
    }

    /// `left ≡ right`
    pub fn create_concept_equivalence(&self, left: Concept, right: Concept) -> Axiom {
        Axiom::ConceptEquivalence { left, right }
    }

    /// `sub ⊑ sup` over roles
    pub fn create_role_inclusion(&self, sub: NamedRole, sup: NamedRole) -> Axiom {
        Axiom::RoleInclusion {
            lhs: Arc::from(vec![sub]),
            rhs: sup,
        }
    }

    /// `r1 ∘ r2 ∘ ... ⊑ sup`
    pub fn create_role_chain(&self, chain: Vec<NamedRole>, sup: NamedRole) -> Axiom {
        Axiom::RoleInclusion {
            lhs: Arc::from(chain),
            rhs: sup,
        }
    }

    /// `role` is reflexive (an empty chain below it)
    pub fn create_reflexive_role(&self, role: NamedRole) -> Axiom {
        Axiom::RoleInclusion {
            lhs: Arc::from(Vec::new()),
            rhs: role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning_shares_allocations() {
        let factory = Factory::new();
        let a1 = factory.create_named_role("hasPart");
        let a2 = factory.create_named_role("hasPart");
        assert!(std::ptr::eq(a1.id(), a2.id()));
        assert_eq!(factory.interned_count(), 1);

        factory.create_named_concept("Heart");
        factory.create_named_feature("hasPart");
        assert_eq!(factory.interned_count(), 2);
    }

    #[test]
    fn test_reserved_names_map_to_sentinels() {
        let factory = Factory::new();
        assert_eq!(factory.create_named_concept("_:TOP"), factory.top());
        assert_eq!(factory.create_named_concept("_:BOTTOM"), factory.bottom());
    }

    #[test]
    fn test_conjunction_construction_is_canonical() {
        let factory = Factory::new();
        let a = factory.create_named_concept("A");
        let b = factory.create_named_concept("B");
        let ab = factory.create_conjunction([a.clone(), b.clone()]);
        let ba = factory.create_conjunction([b, a.clone(), a.clone()]);
        assert_eq!(ab, ba);
        assert_eq!(factory.create_conjunction([a.clone()]), a);
    }

    #[test]
    fn test_role_axiom_shapes() {
        let factory = Factory::new();
        let r = factory.create_named_role("r");
        let s = factory.create_named_role("s");
        let t = factory.create_named_role("t");

        match factory.create_role_chain(vec![r.clone(), s], t.clone()) {
            Axiom::RoleInclusion { lhs, rhs } => {
                assert_eq!(lhs.len(), 2);
                assert_eq!(rhs, t);
            }
            other => panic!("unexpected axiom {}", other),
        }
        match factory.create_reflexive_role(r) {
            Axiom::RoleInclusion { lhs, .. } => assert!(lhs.is_empty()),
            other => panic!("unexpected axiom {}", other),
        }
    }
}
