//! Datatype restriction entailment
//!
//! Datatype restrictions are atomic concepts for saturation. Their mutual
//! subsumptions are computed here, per feature, when a restriction is first
//! seen: `f < 3` is subsumed by `f <= 5`, `f = 4` by `f > 1`, and so on. Each
//! entailment becomes an NF1 axiom between the two restriction ids.

use crate::errors::{ClassifierError, Result};
use crate::features::classification::domain::NormalForm;
use crate::features::model::{Axiom, Concept, Datatype, Literal, LiteralKind, NamedFeature, Operator};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

struct FeatureEntry {
    kind: LiteralKind,
    restrictions: Vec<(u32, Operator, Literal)>,
}

#[derive(Default)]
pub struct DatatypeIndex {
    by_feature: FxHashMap<NamedFeature, FeatureEntry>,
}

impl DatatypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that every feature is restricted with a single literal kind
    ///
    /// Covers both the restrictions already registered and those in
    /// `axioms`. Nothing is registered.
    pub fn validate(&self, axioms: &[Axiom]) -> Result<()> {
        let mut seen: FxHashMap<&NamedFeature, LiteralKind> = FxHashMap::default();
        let mut outcome = Ok(());

        for axiom in axioms {
            for concept in axiom.concepts() {
                concept.walk(&mut |c| {
                    if outcome.is_err() {
                        return;
                    }
                    if let Concept::Datatype(d) = c {
                        let found = d.literal().kind();
                        let expected = self
                            .by_feature
                            .get(d.feature())
                            .map(|entry| entry.kind)
                            .unwrap_or_else(|| *seen.entry(d.feature()).or_insert(found));
                        if expected != found {
                            outcome = Err(ClassifierError::literal_mismatch(
                                d.feature().id(),
                                expected,
                                found,
                            ));
                        }
                    }
                });
            }
        }
        outcome
    }

    /// Register restriction `id` and return the entailments it takes part in
    ///
    /// A restriction whose literal kind disagrees with its feature is skipped;
    /// run [`DatatypeIndex::validate`] first to turn that into an error.
    pub fn register(&mut self, id: u32, datatype: &Datatype) -> Vec<NormalForm> {
        let kind = datatype.literal().kind();
        let entry = self
            .by_feature
            .entry(datatype.feature().clone())
            .or_insert_with(|| FeatureEntry {
                kind,
                restrictions: Vec::new(),
            });

        if entry.kind != kind || entry.restrictions.iter().any(|(other, _, _)| *other == id) {
            return Vec::new();
        }

        let op = datatype.operator();
        let value = datatype.literal();
        let mut entailed = Vec::new();
        for (other, other_op, other_value) in &entry.restrictions {
            if entails(op, value, *other_op, other_value) {
                entailed.push(NormalForm::Subsumption {
                    lhs: id,
                    rhs: *other,
                });
            }
            if entails(*other_op, other_value, op, value) {
                entailed.push(NormalForm::Subsumption {
                    lhs: *other,
                    rhs: id,
                });
            }
        }
        entry.restrictions.push((id, op, value.clone()));
        entailed
    }

    /// Number of registered restrictions
    pub fn len(&self) -> usize {
        self.by_feature.values().map(|e| e.restrictions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_feature.is_empty()
    }
}

/// Is every value satisfying `op1 v1` also a value satisfying `op2 v2`?
fn entails(op1: Operator, v1: &Literal, op2: Operator, v2: &Literal) -> bool {
    let Ok(cmp) = v1.compare(v2) else {
        return false;
    };
    match (op1, op2) {
        (Operator::Equals, _) => op2.accepts(cmp),
        (Operator::LessThan, Operator::LessThan | Operator::LessThanEquals) => {
            cmp != Ordering::Greater
        }
        (Operator::LessThanEquals, Operator::LessThan) => cmp == Ordering::Less,
        (Operator::LessThanEquals, Operator::LessThanEquals) => cmp != Ordering::Greater,
        (Operator::GreaterThan, Operator::GreaterThan | Operator::GreaterThanEquals) => {
            cmp != Ordering::Less
        }
        (Operator::GreaterThanEquals, Operator::GreaterThan) => cmp == Ordering::Greater,
        (Operator::GreaterThanEquals, Operator::GreaterThanEquals) => cmp != Ordering::Less,
        _ => false,
    }
}
