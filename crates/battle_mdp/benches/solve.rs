//! Benchmarks for the full solve pipeline.
//!
//! Run with:
//!   cargo bench --package battle_mdp --bench solve

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use battle_mdp::{
    compact, elimination_order, solve, solve_interval, Battle, LazyGraph, Scenario, SolveOptions,
};

fn bench_reference_solve(c: &mut Criterion) {
    let scenario = Scenario::reference();

    c.bench_function("solve_reference", |b| {
        b.iter(|| solve(black_box(&scenario), black_box(0.192)))
    });
}

fn bench_graph_build(c: &mut Criterion) {
    let scenario = Scenario::reference();

    c.bench_function("graph_build_and_compact", |b| {
        b.iter(|| {
            let mut lazy = LazyGraph::new(black_box(&scenario));
            let root = lazy.root();
            let graph = compact(&mut lazy, root);
            elimination_order(&graph)
        })
    });
}

/// Sweeps only; the graph is built once outside the timed loop.
fn bench_sweeps_by_tolerance(c: &mut Criterion) {
    let scenario = Scenario::reference();
    let (graph, order) = Battle::new(&scenario).build();

    let mut group = c.benchmark_group("interval_sweeps");
    for tolerance in [0.5, 0.192, 0.05] {
        group.bench_with_input(
            BenchmarkId::from_parameter(tolerance),
            &tolerance,
            |b, &tolerance| {
                b.iter(|| solve_interval(&graph, &order, SolveOptions::new(black_box(tolerance))))
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_reference_solve,
    bench_graph_build,
    bench_sweeps_by_tolerance,
);

criterion_main!(benches);
