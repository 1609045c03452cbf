//! Full classification runs
//!
//! Covers the completion rules end to end through the public API: named
//! hierarchies, existentials, conjunctions, role hierarchies and chains,
//! reflexive roles, unsatisfiability and datatype restrictions.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use snorocket_core::{
    ClassificationMode, Classifier, ClassifierConfig, ClassifierError, LiteralKind, Operator,
};

fn classify(builder: OntologyBuilder) -> snorocket_core::Ontology {
    let ontology = builder.build("test");
    let mut classifier = Classifier::new(sequential_config()).expect("classifier");
    classifier.classify(&ontology).expect("classification");
    ontology
}

// ═══════════════════════════════════════════════════════════════════════════
// Named hierarchies
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_named_hierarchy_and_equivalence() {
    let ontology = classify(OntologyBuilder::new().sub("A", "B").sub("B", "C").equiv("D", "B"));

    let b = ontology.node("B").expect("node B");
    assert_eq!(ontology.node("D"), Some(b.clone()));
    assert_eq!(b.representative(), "B");
    assert_eq!(parent_names(&ontology, "A"), vec!["B"]);
    assert_eq!(parent_names(&ontology, "D"), vec!["C"]);
    assert_eq!(parent_names(&ontology, "C"), vec!["_:TOP"]);
    assert_dag(&ontology);

    let inferred: Vec<String> = ontology.inferred_axioms().iter().map(|a| a.to_string()).collect();
    assert!(inferred.contains(&"B ≡ D".to_string()));
    assert!(inferred.contains(&"A ⊑ B".to_string()));
    assert!(inferred.contains(&"B ⊑ C".to_string()));
}

#[test]
fn test_full_run_reports_every_node_affected() {
    let ontology = OntologyBuilder::new().sub("A", "B").build("test");
    let mut classifier = Classifier::new(sequential_config()).unwrap();
    let outcome = classifier.classify(&ontology).unwrap();

    assert_eq!(outcome.mode, ClassificationMode::Full);
    assert_eq!(outcome.nodes, 4);
    assert_eq!(ontology.affected_nodes().len(), 4);
    assert_eq!(
        ontology.node_map().keys().map(|k| k.to_string()).collect::<Vec<_>>(),
        vec!["A", "B", "_:BOTTOM", "_:TOP"]
    );
}

#[test]
fn test_unclassified_ontology_has_sentinel_nodes() {
    let ontology = OntologyBuilder::new().sub("A", "B").build("test");
    assert_eq!(ontology.nodes().len(), 2);
    assert!(ontology.node("A").is_none());
    let top = ontology.top_node().unwrap();
    assert_eq!(top.children(), vec![ontology.bottom_node().unwrap()]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Complex concepts
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_existential_on_both_sides() {
    // A ⊑ ∃r.B, ∃r.B ⊑ C
    let builder = OntologyBuilder::new();
    let f = builder.factory();
    let lhs = f.create_concept_inclusion(builder.concept("A"), builder.some("r", builder.concept("B")));
    let rhs = f.create_concept_inclusion(builder.some("r", builder.concept("B")), builder.concept("C"));
    let ontology = classify(builder.axiom(lhs).axiom(rhs));

    assert_eq!(parent_names(&ontology, "A"), vec!["C"]);
    assert_dag(&ontology);
}

#[test]
fn test_existential_with_subsumed_filler() {
    // A ⊑ ∃r.B, B ⊑ C, ∃r.C ⊑ D
    let builder = OntologyBuilder::new().sub("B", "C");
    let f = builder.factory();
    let first = f.create_concept_inclusion(builder.concept("A"), builder.some("r", builder.concept("B")));
    let second = f.create_concept_inclusion(builder.some("r", builder.concept("C")), builder.concept("D"));
    let ontology = classify(builder.axiom(first).axiom(second));

    assert_eq!(parent_names(&ontology, "A"), vec!["D"]);
}

#[test]
fn test_conjunction_on_the_left() {
    // A ⊑ B, A ⊑ C, B ⊓ C ⊑ D
    let builder = OntologyBuilder::new().sub("A", "B").sub("A", "C");
    let conj = builder.and(vec![builder.concept("B"), builder.concept("C")]);
    let axiom = builder.factory().create_concept_inclusion(conj, builder.concept("D"));
    let ontology = classify(builder.axiom(axiom));

    assert_eq!(parent_names(&ontology, "A"), vec!["B", "C", "D"]);
}

#[test]
fn test_conjunction_on_the_right() {
    // A ⊑ B ⊓ C ⊓ D
    let builder = OntologyBuilder::new();
    let conj = builder.and(vec![
        builder.concept("B"),
        builder.concept("C"),
        builder.concept("D"),
    ]);
    let axiom = builder.factory().create_concept_inclusion(builder.concept("A"), conj);
    let ontology = classify(builder.axiom(axiom));

    assert_eq!(parent_names(&ontology, "A"), vec!["B", "C", "D"]);
}

#[test]
fn test_equivalence_with_definition() {
    // A ≡ B ⊓ ∃r.C, X ⊑ B, X ⊑ ∃r.C  ⇒  X ⊑ A
    let builder = OntologyBuilder::new().sub("X", "B");
    let f = builder.factory();
    let def = builder.and(vec![builder.concept("B"), builder.some("r", builder.concept("C"))]);
    let equiv = f.create_concept_equivalence(builder.concept("A"), def);
    let x = f.create_concept_inclusion(builder.concept("X"), builder.some("r", builder.concept("C")));
    let ontology = classify(builder.axiom(equiv).axiom(x));

    assert_eq!(parent_names(&ontology, "X"), vec!["A"]);
    assert_eq!(parent_names(&ontology, "A"), vec!["B"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Roles
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_role_hierarchy() {
    // r ⊑ s, A ⊑ ∃r.B, ∃s.B ⊑ C
    let builder = OntologyBuilder::new();
    let f = builder.factory();
    let roles = f.create_role_inclusion(builder.role("r"), builder.role("s"));
    let a = f.create_concept_inclusion(builder.concept("A"), builder.some("r", builder.concept("B")));
    let c = f.create_concept_inclusion(builder.some("s", builder.concept("B")), builder.concept("C"));
    let ontology = classify(builder.axiom(roles).axiom(a).axiom(c));

    assert_eq!(parent_names(&ontology, "A"), vec!["C"]);
}

#[test]
fn test_role_chain() {
    // r ∘ s ⊑ t, A ⊑ ∃r.B, B ⊑ ∃s.C, ∃t.C ⊑ D
    let builder = OntologyBuilder::new();
    let f = builder.factory();
    let chain = f.create_role_chain(vec![builder.role("r"), builder.role("s")], builder.role("t"));
    let a = f.create_concept_inclusion(builder.concept("A"), builder.some("r", builder.concept("B")));
    let b = f.create_concept_inclusion(builder.concept("B"), builder.some("s", builder.concept("C")));
    let d = f.create_concept_inclusion(builder.some("t", builder.concept("C")), builder.concept("D"));
    let ontology = classify(builder.axiom(chain).axiom(a).axiom(b).axiom(d));

    assert_eq!(parent_names(&ontology, "A"), vec!["D"]);
    assert_eq!(parent_names(&ontology, "B"), vec!["_:TOP"]);
}

#[test]
fn test_long_role_chain_and_transitivity() {
    // r ∘ r ∘ r ⊑ r, A ⊑ ∃r.B, B ⊑ ∃r.C, C ⊑ ∃r.D, ∃r.D ⊑ E
    let builder = OntologyBuilder::new();
    let f = builder.factory();
    let chain = f.create_role_chain(
        vec![builder.role("r"), builder.role("r"), builder.role("r")],
        builder.role("r"),
    );
    let mut builder = builder.axiom(chain);
    for (lhs, filler) in [("A", "B"), ("B", "C"), ("C", "D")] {
        let axiom = builder
            .factory()
            .create_concept_inclusion(builder.concept(lhs), builder.some("r", builder.concept(filler)));
        builder = builder.axiom(axiom);
    }
    let e = builder
        .factory()
        .create_concept_inclusion(builder.some("r", builder.concept("D")), builder.concept("E"));
    let ontology = classify(builder.axiom(e));

    assert_eq!(parent_names(&ontology, "A"), vec!["E"]);
    assert_eq!(parent_names(&ontology, "C"), vec!["E"]);
}

#[test]
fn test_reflexive_role() {
    // reflexive(r), ∃r.A ⊑ B  ⇒  A ⊑ B
    let builder = OntologyBuilder::new();
    let f = builder.factory();
    let reflexive = f.create_reflexive_role(builder.role("r"));
    let axiom = f.create_concept_inclusion(builder.some("r", builder.concept("A")), builder.concept("B"));
    let ontology = classify(builder.axiom(reflexive).axiom(axiom));

    assert_eq!(parent_names(&ontology, "A"), vec!["B"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Unsatisfiability
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_unsatisfiable_concepts_join_bottom() {
    // A ⊑ ⊥, B ⊑ ∃r.A
    let builder = OntologyBuilder::new();
    let f = builder.factory();
    let a = f.create_concept_inclusion(builder.concept("A"), f.bottom());
    let b = f.create_concept_inclusion(builder.concept("B"), builder.some("r", builder.concept("A")));
    let ontology = classify(builder.axiom(a).axiom(b).sub("C", "D"));

    let bottom = ontology.bottom_node().unwrap();
    assert!(bottom.contains("A"));
    assert!(bottom.contains("B"));
    assert_eq!(ontology.node("A"), Some(bottom.clone()));
    assert_eq!(parent_names(&ontology, "_:BOTTOM"), vec!["C"]);
    assert_dag(&ontology);

    let inferred: Vec<String> = ontology.inferred_axioms().iter().map(|a| a.to_string()).collect();
    assert!(inferred.contains(&"_:BOTTOM ≡ A".to_string()));
    assert!(inferred.contains(&"_:BOTTOM ≡ B".to_string()));
}

#[test]
fn test_unsatisfiable_top_collapses_taxonomy() {
    let builder = OntologyBuilder::new().sub("A", "B");
    let f = builder.factory();
    let axiom = f.create_concept_inclusion(f.top(), f.bottom());
    let ontology = classify(builder.axiom(axiom));

    assert_eq!(ontology.top_node(), ontology.bottom_node());
    assert_eq!(ontology.nodes().len(), 1);
    assert!(ontology.top_node().unwrap().contains("A"));
}

// ═══════════════════════════════════════════════════════════════════════════
// Datatypes
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_datatype_entailment() {
    // A ⊑ (f = 3), (f > 1) ⊑ B, C ⊑ (f < 0)
    let builder = OntologyBuilder::new();
    let f = builder.factory();
    let feature = f.create_named_feature("f");
    let eq3 = f.create_datatype(feature.clone(), Operator::Equals, f.create_integer_literal(3));
    let gt1 = f.create_datatype(feature.clone(), Operator::GreaterThan, f.create_integer_literal(1));
    let lt0 = f.create_datatype(feature, Operator::LessThan, f.create_integer_literal(0));
    let a = f.create_concept_inclusion(builder.concept("A"), eq3);
    let b = f.create_concept_inclusion(gt1, builder.concept("B"));
    let c = f.create_concept_inclusion(builder.concept("C"), lt0);
    let ontology = classify(builder.axiom(a).axiom(b).axiom(c));

    assert_eq!(parent_names(&ontology, "A"), vec!["B"]);
    assert_eq!(parent_names(&ontology, "C"), vec!["_:TOP"]);
}

#[test]
fn test_literal_kind_mismatch_is_an_error() {
    let builder = OntologyBuilder::new();
    let f = builder.factory();
    let feature = f.create_named_feature("f");
    let int = f.create_datatype(feature.clone(), Operator::Equals, f.create_integer_literal(3));
    let float = f.create_datatype(feature, Operator::Equals, f.create_float_literal(1.5));
    let a = f.create_concept_inclusion(builder.concept("A"), int);
    let b = f.create_concept_inclusion(builder.concept("B"), float);
    let ontology = builder.axiom(a).axiom(b).build("test");

    let mut classifier = Classifier::new(sequential_config()).unwrap();
    let err = classifier.classify(&ontology).unwrap_err();
    match err {
        ClassifierError::LiteralTypeMismatch {
            feature,
            expected,
            found,
        } => {
            assert_eq!(feature, "f");
            assert_eq!(expected, LiteralKind::Integer);
            assert_eq!(found, LiteralKind::Float);
        }
        other => panic!("unexpected error: {}", other),
    }

    // Nothing was published and no state was kept
    assert_eq!(ontology.nodes().len(), 2);
    assert!(classifier.subsumers("A").is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// Determinism
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_same_result_for_any_thread_count() {
    let sequential = chain(40).build("chain");
    let parallel = chain(40).build("chain");

    Classifier::new(sequential_config())
        .unwrap()
        .classify(&sequential)
        .unwrap();
    Classifier::new(parallel_config())
        .unwrap()
        .classify(&parallel)
        .unwrap();

    assert_eq!(shape(&sequential), shape(&parallel));
    assert_dag(&parallel);
    assert_eq!(parent_names(&parallel, "C0"), vec!["C1"]);
}

#[test]
fn test_classifying_twice_is_idempotent() {
    let ontology = chain(10).sub("C3", "C0").build("chain");
    let mut classifier = Classifier::new(ClassifierConfig::default()).unwrap();

    classifier.classify(&ontology).unwrap();
    let first = shape(&ontology);
    classifier.classify(&ontology).unwrap();
    assert_eq!(first, shape(&ontology));

    // C0 ⊑ C1 ⊑ C2 ⊑ C3 ⊑ C0
    let node = ontology.node("C0").unwrap();
    assert_eq!(node.equivalent_concepts().len(), 4);
}

fn inclusions() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0usize..8, 0usize..8), 0..20)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_thread_count_does_not_change_result(edges in inclusions()) {
        let build = || {
            edges.iter().fold(OntologyBuilder::new(), |b, (l, r)| {
                b.sub(&format!("N{}", l), &format!("N{}", r))
            })
        };
        let one = build().build("p");
        let many = build().build("p");
        Classifier::new(sequential_config()).unwrap().classify(&one).unwrap();
        Classifier::new(parallel_config()).unwrap().classify(&many).unwrap();
        prop_assert_eq!(shape(&one), shape(&many));
    }

    #[test]
    fn prop_mutual_subsumers_share_a_node(edges in inclusions()) {
        let ontology = edges
            .iter()
            .fold(OntologyBuilder::new(), |b, (l, r)| b.sub(&format!("N{}", l), &format!("N{}", r)))
            .build("p");
        Classifier::new(sequential_config()).unwrap().classify(&ontology).unwrap();

        // Reflexive-transitive closure of the stated inclusions
        let mut reach = [[false; 8]; 8];
        for (i, row) in reach.iter_mut().enumerate() {
            row[i] = true;
        }
        for &(l, r) in &edges {
            reach[l][r] = true;
        }
        for k in 0..8 {
            for i in 0..8 {
                for j in 0..8 {
                    if reach[i][k] && reach[k][j] {
                        reach[i][j] = true;
                    }
                }
            }
        }

        let mentioned: Vec<usize> = edges.iter().flat_map(|&(l, r)| [l, r]).collect();
        for &i in &mentioned {
            for &j in &mentioned {
                let same = ontology.node(&format!("N{}", i)) == ontology.node(&format!("N{}", j));
                prop_assert_eq!(same, reach[i][j] && reach[j][i]);
            }
        }
        assert_dag(&ontology);
    }
}
