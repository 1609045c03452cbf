//! Axiom normalisation
//!
//! Rewrites stated axioms into the seven normal forms over internal ids.
//! Every complex sub-expression gets an id of its own and is defined once per
//! polarity:
//! - on the left (`lhs_id`) a conjunction `C1 ⊓ ... ⊓ Cn` becomes a chain of
//!   binary NF2 axioms through anonymous auxiliaries, and `∃r.C` an NF4 axiom
//! - on the right (`rhs_id`) a conjunction becomes one NF1 per operand, and
//!   `∃r.C` an NF3 axiom
//!
//! Role chains longer than two are split through auxiliary roles the same way.

use crate::features::classification::domain::{IdFactory, NormalForm};
use crate::features::concept_set::CollectionResult;
use crate::features::model::{Axiom, Concept, Datatype, NamedRole};
use crate::features::stats::{Counter, StatsSink, StatsSource};
use rustc_hash::FxHashSet;

/// Normaliser counters
#[derive(Debug, Default)]
pub struct NormaliserStats {
    pub axioms: Counter,
    pub forms: Counter,
    pub aux_concepts: Counter,
    pub aux_roles: Counter,
    pub datatypes: Counter,
}

impl StatsSource for NormaliserStats {
    fn collect_stats(&self, sink: &mut StatsSink) {
        sink.counter("axioms", self.axioms.get());
        sink.counter("forms", self.forms.get());
        sink.counter("aux_concepts", self.aux_concepts.get());
        sink.counter("aux_roles", self.aux_roles.get());
        sink.counter("datatypes", self.datatypes.get());
    }

    fn reset_stats(&self) {
        self.axioms.reset();
        self.forms.reset();
        self.aux_concepts.reset();
        self.aux_roles.reset();
        self.datatypes.reset();
    }
}

/// Output of one normalisation pass
#[derive(Debug, Default)]
pub struct Normalised {
    pub forms: Vec<NormalForm>,
    /// Datatype restrictions seen for the first time, with their ids
    pub datatypes: Vec<(u32, Datatype)>,
}

impl Normalised {
    pub fn concept_forms(&self) -> impl Iterator<Item = &NormalForm> {
        self.forms.iter().filter(|f| !f.is_role_form())
    }

    pub fn role_forms(&self) -> impl Iterator<Item = &NormalForm> {
        self.forms.iter().filter(|f| f.is_role_form())
    }
}

/// Stateful normaliser
///
/// Remembers which expressions are already defined, so later increments
/// reuse the earlier definitions.
#[derive(Debug, Default)]
pub struct Normaliser {
    lhs_defined: FxHashSet<u32>,
    rhs_defined: FxHashSet<u32>,
}

struct Pass<'a> {
    ids: &'a mut IdFactory,
    out: Normalised,
    /// Definitions made by this pass, forgotten again if it fails
    lhs_new: Vec<u32>,
    rhs_new: Vec<u32>,
    aux_concepts: u64,
    aux_roles: u64,
}

impl Normaliser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalise(
        &mut self,
        axioms: &[Axiom],
        ids: &mut IdFactory,
        stats: &NormaliserStats,
    ) -> CollectionResult<Normalised> {
        let mut pass = Pass {
            ids,
            out: Normalised::default(),
            lhs_new: Vec::new(),
            rhs_new: Vec::new(),
            aux_concepts: 0,
            aux_roles: 0,
        };

        for axiom in axioms {
            if let Err(err) = self.axiom(&mut pass, axiom) {
                for id in &pass.lhs_new {
                    self.lhs_defined.remove(id);
                }
                for id in &pass.rhs_new {
                    self.rhs_defined.remove(id);
                }
                return Err(err);
            }
        }

        stats.axioms.add(axioms.len() as u64);
        stats.forms.add(pass.out.forms.len() as u64);
        stats.aux_concepts.add(pass.aux_concepts);
        stats.aux_roles.add(pass.aux_roles);
        stats.datatypes.add(pass.out.datatypes.len() as u64);
        Ok(pass.out)
    }

    fn axiom(&mut self, pass: &mut Pass<'_>, axiom: &Axiom) -> CollectionResult<()> {
        match axiom {
            Axiom::ConceptInclusion { lhs, rhs } => self.inclusion(pass, lhs, rhs),
            Axiom::ConceptEquivalence { left, right } => {
                self.inclusion(pass, left, right)?;
                self.inclusion(pass, right, left)
            }
            Axiom::RoleInclusion { lhs, rhs } => {
                Self::role_inclusion(pass, lhs, rhs);
                Ok(())
            }
        }
    }

    fn define(defined: &mut FxHashSet<u32>, log: &mut Vec<u32>, id: u32) -> bool {
        let first = defined.insert(id);
        if first {
            log.push(id);
        }
        first
    }

    fn inclusion(&mut self, pass: &mut Pass<'_>, lhs: &Concept, rhs: &Concept) -> CollectionResult<()> {
        let l = self.lhs_id(pass, lhs)?;
        let r = self.rhs_id(pass, rhs)?;
        if l != r {
            pass.out.forms.push(NormalForm::Subsumption { lhs: l, rhs: r });
        }
        Ok(())
    }

    fn atom_id(pass: &mut Pass<'_>, concept: &Concept) -> CollectionResult<u32> {
        let (id, fresh) = pass.ids.concept_id(concept)?;
        if fresh {
            if let Concept::Datatype(d) = concept {
                pass.out.datatypes.push((id, d.clone()));
            }
        }
        Ok(id)
    }

    fn lhs_id(&mut self, pass: &mut Pass<'_>, concept: &Concept) -> CollectionResult<u32> {
        match concept {
            Concept::Named(_) | Concept::Datatype(_) => Self::atom_id(pass, concept),
            Concept::Conjunction(c) => {
                let (id, _) = pass.ids.concept_id(concept)?;
                if Self::define(&mut self.lhs_defined, &mut pass.lhs_new, id) {
                    let mut operands = Vec::with_capacity(c.operands().len());
                    for operand in c.operands() {
                        operands.push(self.lhs_id(pass, operand)?);
                    }
                    let mut acc = operands[0];
                    for (i, &next) in operands.iter().enumerate().skip(1) {
                        let target = if i + 1 == operands.len() {
                            id
                        } else {
                            pass.aux_concepts += 1;
                            pass.ids.fresh_concept()
                        };
                        pass.out.forms.push(NormalForm::Conjunction {
                            left: acc,
                            right: next,
                            rhs: target,
                        });
                        acc = target;
                    }
                }
                Ok(id)
            }
            Concept::Existential(e) => {
                let (id, _) = pass.ids.concept_id(concept)?;
                if Self::define(&mut self.lhs_defined, &mut pass.lhs_new, id) {
                    let filler = self.lhs_id(pass, e.filler())?;
                    let role = pass.ids.role_id(e.role());
                    pass.out.forms.push(NormalForm::ExistentialLhs {
                        role,
                        filler,
                        rhs: id,
                    });
                }
                Ok(id)
            }
        }
    }

    fn rhs_id(&mut self, pass: &mut Pass<'_>, concept: &Concept) -> CollectionResult<u32> {
        match concept {
            Concept::Named(_) | Concept::Datatype(_) => Self::atom_id(pass, concept),
            Concept::Conjunction(c) => {
                let (id, _) = pass.ids.concept_id(concept)?;
                if Self::define(&mut self.rhs_defined, &mut pass.rhs_new, id) {
                    for operand in c.operands() {
                        let rhs = self.rhs_id(pass, operand)?;
                        pass.out.forms.push(NormalForm::Subsumption { lhs: id, rhs });
                    }
                }
                Ok(id)
            }
            Concept::Existential(e) => {
                let (id, _) = pass.ids.concept_id(concept)?;
                if Self::define(&mut self.rhs_defined, &mut pass.rhs_new, id) {
                    let filler = self.rhs_id(pass, e.filler())?;
                    let role = pass.ids.role_id(e.role());
                    pass.out.forms.push(NormalForm::ExistentialRhs {
                        lhs: id,
                        role,
                        filler,
                    });
                }
                Ok(id)
            }
        }
    }

    fn role_inclusion(pass: &mut Pass<'_>, chain: &[NamedRole], sup: &NamedRole) {
        let sup = pass.ids.role_id(sup);
        match chain {
            [] => pass.out.forms.push(NormalForm::ReflexiveRole { role: sup }),
            [sub] => {
                let sub = pass.ids.role_id(sub);
                if sub != sup {
                    pass.out.forms.push(NormalForm::RoleInclusion { sub, sup });
                }
            }
            [first, rest @ ..] => {
                let mut acc = pass.ids.role_id(first);
                for (i, role) in rest.iter().enumerate() {
                    let right = pass.ids.role_id(role);
                    let target = if i + 1 == rest.len() {
                        sup
                    } else {
                        pass.aux_roles += 1;
                        pass.ids.fresh_role()
                    };
                    pass.out.forms.push(NormalForm::RoleChain {
                        left: acc,
                        right,
                        sup: target,
                    });
                    acc = target;
                }
            }
        }
    }
}
