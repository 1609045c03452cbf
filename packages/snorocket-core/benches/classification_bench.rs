//! Classification benchmarks
//!
//! - Full run over a layered terminology, sequential vs parallel rounds
//! - Incremental run adding one concept to a classified terminology

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use snorocket_core::{Axiom, Classifier, ClassifierConfig, Factory, Ontology};

/// `width` concepts per level, each below two concepts of the level above,
/// plus one existential edge per concept
fn terminology(factory: &Factory, levels: usize, width: usize) -> Vec<Axiom> {
    let name = |level: usize, i: usize| factory.create_named_concept(&format!("L{}_{}", level, i));
    let role = factory.create_named_role("partOf");
    let mut axioms = Vec::new();
    for level in 1..levels {
        for i in 0..width {
            let child = name(level, i);
            axioms.push(factory.create_concept_inclusion(child.clone(), name(level - 1, i)));
            axioms.push(factory.create_concept_inclusion(child.clone(), name(level - 1, (i + 1) % width)));
            let part = factory.create_existential(role.clone(), name(level - 1, (i + 2) % width));
            axioms.push(factory.create_concept_inclusion(child, part));
        }
    }
    axioms
}

fn bench_full(c: &mut Criterion) {
    let factory = Factory::new();
    let mut group = c.benchmark_group("full_classification");

    for width in [50usize, 200] {
        let axioms = terminology(&factory, 8, width);
        group.throughput(Throughput::Elements(axioms.len() as u64));

        for (label, config) in [
            ("sequential", ClassifierConfig::default().num_threads(Some(1)).parallel_threshold(usize::MAX)),
            ("parallel", ClassifierConfig::default().parallel_threshold(16)),
        ] {
            group.bench_with_input(BenchmarkId::new(label, width), &axioms, |b, axioms| {
                b.iter(|| {
                    let ontology = Ontology::new("bench", "1", axioms.clone());
                    let mut classifier = Classifier::new(config.clone()).unwrap();
                    black_box(classifier.classify(&ontology).unwrap())
                });
            });
        }
    }

    group.finish();
}

fn bench_incremental(c: &mut Criterion) {
    let factory = Factory::new();
    let axioms = terminology(&factory, 8, 200);
    let base = Ontology::new("bench", "1", axioms);
    let extra = factory.create_concept_inclusion(
        factory.create_named_concept("New"),
        factory.create_named_concept("L3_17"),
    );

    c.bench_function("incremental_one_concept", |b| {
        b.iter_batched(
            || {
                let mut classifier = Classifier::new(ClassifierConfig::default()).unwrap();
                classifier.classify(&base).unwrap();
                (classifier, base.extend("2", vec![extra.clone()]))
            },
            |(mut classifier, next)| black_box(classifier.classify_incremental(&next).unwrap()),
            criterion::BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, bench_full, bench_incremental);
criterion_main!(benches);
