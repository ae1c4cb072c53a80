//! Benchmark for `FieldComparison`: cold evaluation, cached queries and
//! registry construction.
//!
//! Measures the cost of memoization against re-running every equality test.

#![allow(non_snake_case)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fieldler::{EqualityTests, FieldComparator, FieldComparison};
use std::hint::black_box;
use std::sync::Arc;

// =============================================================================
// Test Structures
// =============================================================================

#[derive(Debug, Clone, FieldComparator)]
struct Person {
    age: u32,
    name: String,
    lastName: String,
    alive: bool,
    requiresOxygen: Option<bool>,
}

fn person(last_name: &str) -> Person {
    Person {
        age: 42,
        name: "Grace".to_string(),
        lastName: last_name.to_string(),
        alive: true,
        requiresOxygen: Some(true),
    }
}

#[derive(Debug, Clone)]
struct Row(Vec<u64>);

fn row_tests(width: usize) -> Arc<EqualityTests<Row, usize>> {
    let mut tests = EqualityTests::with_capacity(width);
    for column in 0..width {
        tests.insert(column, move |first: &Row, second: &Row| {
            first.0[column] == second.0[column]
        });
    }
    Arc::new(tests)
}

fn rows(width: usize) -> (Row, Row) {
    let first: Vec<u64> = (0..width as u64).collect();
    let second = first
        .iter()
        .map(|value| if value % 3 == 0 { value + 1 } else { *value })
        .collect();
    (Row(first), Row(second))
}

// =============================================================================
// Evaluation Benchmarks
// =============================================================================

fn benchmark_cold_evaluation(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("cold_evaluation");

    for width in [4, 16, 64, 256] {
        let tests = row_tests(width);
        let (first, second) = rows(width);
        group.bench_with_input(BenchmarkId::new("evaluate_all", width), &width, |bencher, _| {
            bencher.iter(|| {
                let comparison = FieldComparison::new(&first, &second, Arc::clone(&tests));
                comparison.evaluate_all();
                black_box(comparison.number_of_differences())
            });
        });
    }

    group.finish();
}

fn benchmark_cached_queries(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("cached_queries");
    let width = 64;
    let tests = row_tests(width);
    let (first, second) = rows(width);
    let selection: Vec<usize> = (0..width).step_by(4).collect();

    let comparison = FieldComparison::new(&first, &second, Arc::clone(&tests));
    comparison.evaluate_all();

    group.bench_function("is_equal", |bencher| {
        bencher.iter(|| black_box(comparison.is_equal(black_box(17))));
    });

    group.bench_function("are_all_equal", |bencher| {
        bencher.iter(|| black_box(comparison.are_all_equal(black_box(&selection))));
    });

    group.bench_function("equal_fields", |bencher| {
        bencher.iter(|| black_box(comparison.equal_fields().len()));
    });

    // Same query with the cache dropped before every run
    group.bench_function("are_all_equal_after_reset", |bencher| {
        bencher.iter(|| {
            comparison.reset_cache();
            black_box(comparison.are_all_equal(black_box(&selection)))
        });
    });

    group.finish();
}

fn benchmark_short_circuit(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("short_circuit");
    let width = 256;
    let tests = row_tests(width);
    let (first, second) = rows(width);

    group.bench_function("has_differences", |bencher| {
        bencher.iter(|| {
            let comparison = FieldComparison::new(&first, &second, Arc::clone(&tests));
            black_box(comparison.has_differences())
        });
    });

    group.bench_function("different_fields", |bencher| {
        bencher.iter(|| {
            let comparison = FieldComparison::new(&first, &second, Arc::clone(&tests));
            black_box(comparison.different_fields().len())
        });
    });

    group.finish();
}

// =============================================================================
// Registry Benchmarks
// =============================================================================

fn benchmark_derived_registry(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("derived_registry");
    let first = person("Hopper");
    let second = person("Murray");

    group.bench_function("build_per_comparison", |bencher| {
        bencher.iter(|| {
            let comparison = Person::compare(black_box(&first), black_box(&second));
            black_box(comparison.is_different(PersonField::LastName))
        });
    });

    let tests = Arc::new(Person::equality_tests());
    group.bench_function("shared_registry", |bencher| {
        bencher.iter(|| {
            let comparison =
                FieldComparison::new(black_box(&first), black_box(&second), Arc::clone(&tests));
            black_box(comparison.is_different(PersonField::LastName))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_cold_evaluation,
    benchmark_cached_queries,
    benchmark_short_circuit,
    benchmark_derived_registry
);
criterion_main!(benches);
