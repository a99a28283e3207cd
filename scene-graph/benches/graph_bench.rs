//! Benchmarks for scene-graph
//!
//! Measures the per-frame passes and the cost of invalidation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use scene_graph::{
    render_graph, CommandList, GraphConfig, NodeId, Quad, SceneGraph, Transform2D,
    TransformSpace,
};

/// Root with `branches` chains of `depth` nodes, one quad per node
fn build_graph(branches: usize, depth: usize) -> (SceneGraph, Vec<NodeId>) {
    let mut graph = SceneGraph::new(GraphConfig {
        node_capacity: branches * depth + 1,
        ..GraphConfig::default()
    });
    let mut heads = Vec::with_capacity(branches);

    for b in 0..branches {
        let mut parent = graph.root();
        for d in 0..depth {
            let transform = Transform2D::new(
                Vec2::new(b as f32, d as f32),
                0.01 * d as f32,
                Vec2::splat(1.01),
            );
            let node = graph.create_child(parent, transform).unwrap();
            graph
                .attach_drawable(node, Quad::new(Vec2::splat(4.0)).shared())
                .unwrap();
            if d == 0 {
                heads.push(node);
            }
            parent = node;
        }
    }

    graph.update();
    (graph, heads)
}

fn bench_update_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_pass");

    for node_count in [100, 1_000, 10_000].iter() {
        let (mut graph, heads) = build_graph(node_count / 10, 10);

        group.bench_with_input(
            BenchmarkId::from_parameter(node_count),
            node_count,
            |b, _| {
                b.iter(|| {
                    for &head in &heads {
                        graph
                            .translate(head, Vec2::new(0.1, 0.0), TransformSpace::Parent)
                            .unwrap();
                    }
                    black_box(graph.update());
                });
            },
        );
    }

    group.finish();
}

fn bench_root_invalidation(c: &mut Criterion) {
    let mut group = c.benchmark_group("root_invalidation");

    // Rotating the root dirties every node, yet only enqueues the root
    group.bench_function("rotate_root_1000", |b| {
        let (mut graph, _) = build_graph(100, 10);
        let root = graph.root();

        b.iter(|| {
            graph.rotate(root, 0.01, TransformSpace::Local).unwrap();
            black_box(graph.update());
        });
    });

    // Clean graph: update has nothing to do
    group.bench_function("clean_1000", |b| {
        let (mut graph, _) = build_graph(100, 10);

        b.iter(|| {
            black_box(graph.update());
        });
    });

    group.finish();
}

fn bench_draw_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_pass");

    for node_count in [100, 1_000].iter() {
        let (graph, _) = build_graph(node_count / 10, 10);
        let mut list = CommandList::with_capacity(*node_count);

        group.bench_with_input(
            BenchmarkId::from_parameter(node_count),
            node_count,
            |b, _| {
                b.iter(|| {
                    list.clear();
                    black_box(graph.draw(&mut list));
                });
            },
        );
    }

    group.bench_function("render_graph_1000", |b| {
        let (graph, _) = build_graph(100, 10);
        b.iter(|| black_box(render_graph(&graph)));
    });

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");

    group.bench_function("dirty_derived_position_depth_10", |b| {
        let (mut graph, heads) = build_graph(1, 10);
        let leaf = graph.descendants(heads[0]).unwrap().last().unwrap();
        graph
            .translate(heads[0], Vec2::ONE, TransformSpace::Parent)
            .unwrap();

        b.iter(|| black_box(graph.derived_position(leaf).unwrap()));
    });

    group.bench_function("subtree_aabb_1000", |b| {
        let (graph, _) = build_graph(100, 10);
        b.iter(|| black_box(graph.aabb(graph.root()).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_update_pass,
    bench_root_invalidation,
    bench_draw_pass,
    bench_queries
);
criterion_main!(benches);
