//! Interval tree benchmarks.
//!
//! Measures building a tree from pseudo-random spans and answering overlap
//! queries against it.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sylva_collections::{IntervalTree, SpanIntrospector};
use sylva_common::TextSpan;

/// Deterministic spans: a cheap LCG keeps runs comparable.
fn spans(count: usize) -> Vec<TextSpan> {
    let mut state = 0x2545_F491u32;
    (0..count)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let start = state % 1_000_000;
            let length = (state >> 20) % 200;
            TextSpan::new(start, length)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    sylva_common::init_tracing();
    let mut group = c.benchmark_group("interval_tree_build");
    for count in [1_000usize, 10_000] {
        let input = spans(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| black_box(IntervalTree::create(&SpanIntrospector, input.iter().copied())));
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let tree = IntervalTree::create(&SpanIntrospector, spans(10_000));
    let algorithms = tree.algorithms(&SpanIntrospector);
    let mut group = c.benchmark_group("interval_tree_query");

    group.bench_function("get_overlapping", |b| {
        b.iter(|| black_box(algorithms.get_intervals_that_overlap_with(black_box(500_000), 500)));
    });
    group.bench_function("has_overlapping", |b| {
        b.iter(|| black_box(algorithms.has_interval_that_overlaps_with(black_box(500_000), 500)));
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);
