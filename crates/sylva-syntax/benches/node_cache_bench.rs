//! Node cache benchmarks.
//!
//! Measures building expression trees through `GreenStore` when the shapes
//! repeat (mostly hits) and when they do not (mostly misses), and the cost of
//! a bare probe.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sylva_syntax::{GreenId, GreenStore, NodeCacheConfig, NodeFlags, RawKind};

const IDENT: RawKind = RawKind(10);
const PLUS: RawKind = RawKind(11);
const BINARY: RawKind = RawKind(20);

/// Left-leaning chain `x0 + x1 + ... + xn` over `distinct` identifier names.
fn build_chain(store: &GreenStore, len: usize, distinct: usize) -> GreenId {
    let plus = store.token(PLUS, "+");
    let mut acc = store.token(IDENT, "x0");
    for i in 1..len {
        let name = format!("x{}", i % distinct);
        let rhs = store.token(IDENT, &name);
        acc = store.node_default(BINARY, &[Some(acc), Some(plus), Some(rhs)]);
    }
    acc
}

fn bench_build(c: &mut Criterion) {
    sylva_common::init_tracing();
    let mut group = c.benchmark_group("node_cache_build");

    for size_bits in [8u32, 16] {
        let config = NodeCacheConfig::with_size_bits(size_bits);
        group.bench_with_input(
            BenchmarkId::new("repeated_chain", size_bits),
            &config,
            |b, config| {
                let store = GreenStore::with_config(config).expect("valid bench config");
                b.iter(|| black_box(build_chain(&store, 256, 8)));
            },
        );
    }

    group.bench_function("fresh_store_chain", |b| {
        b.iter(|| {
            let store = GreenStore::new();
            black_box(build_chain(&store, 256, 256))
        });
    });

    group.finish();
}

fn bench_probe(c: &mut Criterion) {
    let store = GreenStore::new();
    let flags = NodeFlags::default_node_flags();
    let a = store.token(IDENT, "a");
    let plus = store.token(PLUS, "+");
    let b_tok = store.token(IDENT, "b");
    let children = [Some(a), Some(plus), Some(b_tok)];
    store.node(BINARY, flags, &children);

    c.bench_function("node_cache_try_get_hit", |b| {
        b.iter(|| {
            black_box(
                store
                    .cache()
                    .try_get(store.arena(), BINARY, flags, black_box(&children)),
            )
        });
    });
}

criterion_group!(benches, bench_build, bench_probe);
criterion_main!(benches);
