use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use futures::executor::block_on;
use narwhal::algo::layered_bfs;
use narwhal::{
    CompoundGroup, EdgeLabel, LayeredBfs, LayoutOptions, MeshGraph, NodeLabel, StyleSizeHints,
};
use std::hint::black_box;
use std::time::Duration;

/// A mesh-like graph: a few ingress roots fanning out into `services` services, each backed by
/// `versions` workloads that call a handful of downstream services.
fn build_mesh(services: usize, versions: usize, grouped: bool) -> MeshGraph {
    let mut g = MeshGraph::new();
    for i in 0..3 {
        g.set_node(format!("ingress-{i}"), NodeLabel::with_size(30.0, 30.0));
    }
    for s in 0..services {
        let svc = format!("svc-{s:04}");
        g.set_node(svc.clone(), NodeLabel::with_size(30.0, 30.0));
        if s < services / 8 + 1 {
            g.set_edge(
                format!("in-{s}"),
                format!("ingress-{}", s % 3),
                svc.clone(),
                EdgeLabel::default(),
            );
        }
        for v in 0..versions {
            let wl = format!("{svc}-v{v}");
            g.set_node(wl.clone(), NodeLabel::with_size(20.0, 20.0));
            if grouped {
                g.set_parent(wl.clone(), svc.clone());
            } else {
                g.set_edge(format!("{wl}-up"), svc.clone(), wl.clone(), EdgeLabel::default());
            }
            for k in 1..=2 {
                let down = (s * 7 + v * 3 + k * 11) % services;
                if down > s {
                    g.set_edge(
                        format!("{wl}-{k}"),
                        wl.clone(),
                        format!("svc-{down:04}-v0"),
                        EdgeLabel::default(),
                    );
                }
            }
        }
    }
    g
}

fn bench_layered_bfs(c: &mut Criterion) {
    let mut group = c.benchmark_group("layered_bfs");
    group.measurement_time(Duration::from_secs(5));
    let sizes = StyleSizeHints::default();
    let opts = LayoutOptions::default().with_labels(true);

    for services in [50usize, 400] {
        let g = build_mesh(services, 3, false);
        group.bench_with_input(BenchmarkId::new("flat", services), &g, |b, g| {
            b.iter_batched(
                || g.clone(),
                |g| black_box(layered_bfs::layout(&g, &sizes, &opts)),
                BatchSize::SmallInput,
            )
        });

        let g = build_mesh(services, 3, true);
        let alg = CompoundGroup::new(LayeredBfs);
        group.bench_with_input(BenchmarkId::new("grouped", services), &g, |b, g| {
            b.iter(|| black_box(block_on(alg.compute(g, &sizes, &opts))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layered_bfs);
criterion_main!(benches);
