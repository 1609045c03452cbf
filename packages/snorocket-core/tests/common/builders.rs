//! Ontology builders

use snorocket_core::{Axiom, ClassifierConfig, Concept, Factory, NamedRole, Ontology};

/// Small fluent builder over [`Factory`]
pub struct OntologyBuilder {
    factory: Factory,
    axioms: Vec<Axiom>,
}

impl OntologyBuilder {
    pub fn new() -> Self {
        Self {
            factory: Factory::new(),
            axioms: Vec::new(),
        }
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    pub fn concept(&self, id: &str) -> Concept {
        self.factory.create_named_concept(id)
    }

    pub fn role(&self, id: &str) -> NamedRole {
        self.factory.create_named_role(id)
    }

    pub fn some(&self, role: &str, filler: Concept) -> Concept {
        self.factory.create_existential(self.role(role), filler)
    }

    pub fn and(&self, operands: Vec<Concept>) -> Concept {
        self.factory.create_conjunction(operands)
    }

    /// `lhs ⊑ rhs` between named concepts
    pub fn sub(mut self, lhs: &str, rhs: &str) -> Self {
        let axiom = self
            .factory
            .create_concept_inclusion(self.concept(lhs), self.concept(rhs));
        self.axioms.push(axiom);
        self
    }

    /// `lhs ≡ rhs` between named concepts
    pub fn equiv(mut self, lhs: &str, rhs: &str) -> Self {
        let axiom = self
            .factory
            .create_concept_equivalence(self.concept(lhs), self.concept(rhs));
        self.axioms.push(axiom);
        self
    }

    pub fn axiom(mut self, axiom: Axiom) -> Self {
        self.axioms.push(axiom);
        self
    }

    pub fn axioms(&self) -> &[Axiom] {
        &self.axioms
    }

    pub fn build(self, id: &str) -> Ontology {
        Ontology::new(id, "1", self.axioms)
    }
}

/// Single-threaded configuration, every round sequential
pub fn sequential_config() -> ClassifierConfig {
    ClassifierConfig::default()
        .num_threads(Some(1))
        .parallel_threshold(usize::MAX)
}

/// Four workers, every round parallel
pub fn parallel_config() -> ClassifierConfig {
    ClassifierConfig::default()
        .num_threads(Some(4))
        .parallel_threshold(1)
}

/// Chain `C0 ⊑ C1 ⊑ ... ⊑ Cn`, plus `Ci ⊑ ∃r.C(i+1)` edges
pub fn chain(n: usize) -> OntologyBuilder {
    let mut builder = OntologyBuilder::new();
    for i in 0..n {
        builder = builder.sub(&format!("C{}", i), &format!("C{}", i + 1));
        let lhs = builder.concept(&format!("C{}", i));
        let rhs = builder.some("r", builder.concept(&format!("C{}", i + 1)));
        let axiom = builder.factory().create_concept_inclusion(lhs, rhs);
        builder = builder.axiom(axiom);
    }
    builder
}
