//! Concept normal forms indexed by their left concept
//!
//! Saturation asks one question per new subsumer `x`: which NF1, NF2, NF3 and
//! NF4 axioms have `x` on the left? An incremental run indexes its new axioms
//! separately and reads both indexes through an [`IndexView`]; afterwards the
//! delta is merged into the base.

use crate::features::classification::domain::NormalForm;
use rustc_hash::FxHashMap;

#[derive(Debug, Default, Clone)]
pub struct AxiomIndex {
    /// NF1: lhs → rhs
    nf1: FxHashMap<u32, Vec<u32>>,
    /// NF2: each conjunct → (other conjunct, rhs)
    nf2: FxHashMap<u32, Vec<(u32, u32)>>,
    /// NF3: lhs → (role, filler)
    nf3: FxHashMap<u32, Vec<(u32, u32)>>,
    /// NF4: filler → role → rhs
    nf4: FxHashMap<u32, FxHashMap<u32, Vec<u32>>>,
    len: usize,
}

impl AxiomIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_forms<'a>(forms: impl IntoIterator<Item = &'a NormalForm>) -> Self {
        let mut index = Self::new();
        for form in forms {
            index.add(form);
        }
        index
    }

    /// Index a concept normal form. Role forms are ignored.
    pub fn add(&mut self, form: &NormalForm) {
        match *form {
            NormalForm::Subsumption { lhs, rhs } => {
                self.nf1.entry(lhs).or_default().push(rhs);
            }
            NormalForm::Conjunction { left, right, rhs } => {
                self.nf2.entry(left).or_default().push((right, rhs));
                if left != right {
                    self.nf2.entry(right).or_default().push((left, rhs));
                }
            }
            NormalForm::ExistentialRhs { lhs, role, filler } => {
                self.nf3.entry(lhs).or_default().push((role, filler));
            }
            NormalForm::ExistentialLhs { role, filler, rhs } => {
                self.nf4
                    .entry(filler)
                    .or_default()
                    .entry(role)
                    .or_default()
                    .push(rhs);
            }
            NormalForm::RoleInclusion { .. }
            | NormalForm::RoleChain { .. }
            | NormalForm::ReflexiveRole { .. } => return,
        }
        self.len += 1;
    }

    /// Absorb another index
    pub fn merge(&mut self, other: AxiomIndex) {
        for (k, v) in other.nf1 {
            self.nf1.entry(k).or_default().extend(v);
        }
        for (k, v) in other.nf2 {
            self.nf2.entry(k).or_default().extend(v);
        }
        for (k, v) in other.nf3 {
            self.nf3.entry(k).or_default().extend(v);
        }
        for (k, by_role) in other.nf4 {
            let target = self.nf4.entry(k).or_default();
            for (role, v) in by_role {
                target.entry(role).or_default().extend(v);
            }
        }
        self.len += other.len;
    }

    /// Every concept that appears on the left of some indexed form
    pub fn keys(&self) -> Vec<u32> {
        let mut keys: Vec<u32> = self
            .nf1
            .keys()
            .chain(self.nf2.keys())
            .chain(self.nf3.keys())
            .chain(self.nf4.keys())
            .copied()
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    pub fn nf1(&self, lhs: u32) -> &[u32] {
        self.nf1.get(&lhs).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn nf2(&self, conjunct: u32) -> &[(u32, u32)] {
        self.nf2.get(&conjunct).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn nf3(&self, lhs: u32) -> &[(u32, u32)] {
        self.nf3.get(&lhs).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn nf4(&self, filler: u32) -> Option<&FxHashMap<u32, Vec<u32>>> {
        self.nf4.get(&filler)
    }

    pub fn nf4_for_role(&self, filler: u32, role: u32) -> &[u32] {
        self.nf4
            .get(&filler)
            .and_then(|by_role| by_role.get(&role))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of indexed forms
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Read-only union of a base index and an optional delta
#[derive(Clone, Copy)]
pub struct IndexView<'a> {
    base: &'a AxiomIndex,
    delta: Option<&'a AxiomIndex>,
}

impl<'a> IndexView<'a> {
    pub fn new(base: &'a AxiomIndex, delta: Option<&'a AxiomIndex>) -> Self {
        Self { base, delta }
    }

    /// View of a single index
    pub fn only(index: &'a AxiomIndex) -> Self {
        Self {
            base: index,
            delta: None,
        }
    }

    fn layers(self) -> impl Iterator<Item = &'a AxiomIndex> {
        std::iter::once(self.base).chain(self.delta)
    }

    pub fn nf1(self, lhs: u32) -> impl Iterator<Item = u32> + 'a {
        self.layers().flat_map(move |i| i.nf1(lhs).iter().copied())
    }

    pub fn nf2(self, conjunct: u32) -> impl Iterator<Item = (u32, u32)> + 'a {
        self.layers().flat_map(move |i| i.nf2(conjunct).iter().copied())
    }

    pub fn nf3(self, lhs: u32) -> impl Iterator<Item = (u32, u32)> + 'a {
        self.layers().flat_map(move |i| i.nf3(lhs).iter().copied())
    }

    /// `(role, rhs)` pairs of NF4 axioms with `filler` on the left
    pub fn nf4(self, filler: u32) -> impl Iterator<Item = (u32, u32)> + 'a {
        self.layers()
            .filter_map(move |i| i.nf4(filler))
            .flat_map(|by_role| {
                by_role
                    .iter()
                    .flat_map(|(&role, rhs)| rhs.iter().map(move |&b| (role, b)))
            })
    }

    pub fn nf4_for_role(self, filler: u32, role: u32) -> impl Iterator<Item = u32> + 'a {
        self.layers()
            .flat_map(move |i| i.nf4_for_role(filler, role).iter().copied())
    }

    pub fn has_nf4(self, filler: u32) -> bool {
        self.layers().any(|i| i.nf4(filler).is_some())
    }
}
