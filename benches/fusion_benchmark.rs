use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fusegraph::jobs::{run_frontier, Bfs};
use fusegraph::{EdgeOptions, Engine, EngineConfig, FusedRun, GraphPartition, VertexId};

const SIDE: usize = 200;

fn build_grid() -> GraphPartition {
    let mut edges = Vec::new();
    for r in 0..SIDE {
        for c in 0..SIDE {
            let v = (r * SIDE + c) as VertexId;
            if c + 1 < SIDE {
                edges.push((v, v + 1));
            }
            if r + 1 < SIDE {
                edges.push((v, v + SIDE as VertexId));
            }
        }
    }
    GraphPartition::from_edges(SIDE * SIDE, &edges).unwrap().symmetrized()
}

fn roots(count: usize) -> Vec<VertexId> {
    (0..count).map(|i| ((i * 7919) % (SIDE * SIDE)) as VertexId).collect()
}

/// The same batch of BFS jobs run one after another and as one fused run.
fn bench_fused_vs_sequential(c: &mut Criterion) {
    let engine = Engine::new(Arc::new(build_grid()), EngineConfig::default()).unwrap();
    let mut group = c.benchmark_group("bfs_batch");
    group.sample_size(10);

    for jobs in [1, 4, 16] {
        let roots = roots(jobs);
        group.bench_with_input(BenchmarkId::new("sequential", jobs), &roots, |b, roots| {
            let mut batch: Vec<_> = roots.iter().map(|&r| Bfs::new(&engine, r).unwrap()).collect();
            b.iter(|| {
                for bfs in &mut batch {
                    black_box(run_frontier(&engine, bfs, EdgeOptions::default()));
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("fused", jobs), &roots, |b, roots| {
            let mut batch: Vec<_> = roots.iter().map(|&r| Bfs::new(&engine, r).unwrap()).collect();
            b.iter(|| {
                let mut run = FusedRun::new(&engine, EdgeOptions::default());
                for bfs in &mut batch {
                    run.add(bfs);
                }
                black_box(run.run())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fused_vs_sequential);
criterion_main!(benches);
