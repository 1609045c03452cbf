//! Normal forms over internal ids
//!
//! Concept positions hold dense concept ids, role positions dense role ids.

/// One normalised axiom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalForm {
    /// NF1: `lhs ⊑ rhs`
    Subsumption { lhs: u32, rhs: u32 },
    /// NF2: `left ⊓ right ⊑ rhs`
    Conjunction { left: u32, right: u32, rhs: u32 },
    /// NF3: `lhs ⊑ ∃role.filler`
    ExistentialRhs { lhs: u32, role: u32, filler: u32 },
    /// NF4: `∃role.filler ⊑ rhs`
    ExistentialLhs { role: u32, filler: u32, rhs: u32 },
    /// NF5: `sub ⊑ sup`
    RoleInclusion { sub: u32, sup: u32 },
    /// NF6: `left ∘ right ⊑ sup`
    RoleChain { left: u32, right: u32, sup: u32 },
    /// NF7: `role` is reflexive
    ReflexiveRole { role: u32 },
}

impl NormalForm {
    pub fn is_role_form(&self) -> bool {
        matches!(
            self,
            NormalForm::RoleInclusion { .. }
                | NormalForm::RoleChain { .. }
                | NormalForm::ReflexiveRole { .. }
        )
    }
}
