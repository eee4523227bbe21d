use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use schema_layout::config::LayoutConfig;
use schema_layout::ir::{Direction, Graph, Node};
use schema_layout::layout::compute_layout;
use std::hint::black_box;

/// Anchors with a fan of field nodes each, plus cross links between
/// neighbouring anchors' fields.
fn schema_graph(anchors: usize, fields_per_anchor: usize, direction: Direction) -> Graph {
    let mut graph = Graph::new(direction);
    graph.anchor_rows = 4;
    for a in 0..anchors {
        let anchor_id = format!("entity_{a}");
        graph.add_node(Node::anchor(&anchor_id, fields_per_anchor, 4.min(fields_per_anchor)));
        for f in 0..fields_per_anchor {
            let field_id = format!("entity_{a}_field_{f}");
            graph.add_node(Node::regular(&field_id));
            graph.add_edge(&anchor_id, &field_id);
        }
    }
    for a in 1..anchors {
        let from = format!("entity_{}_field_0", a - 1);
        let to = format!("entity_{a}");
        graph.add_edge(&from, &to);
    }
    graph
}

fn workflow_chain(steps: usize, feedback_every: usize) -> Graph {
    let mut graph = Graph::new(Direction::LeftToRight);
    for i in 0..steps {
        graph.add_node(Node::regular(&format!("step_{i}")));
    }
    for i in 1..steps {
        graph.add_edge(&format!("step_{}", i - 1), &format!("step_{i}"));
        if feedback_every > 0 && i % feedback_every == 0 && i >= 2 {
            graph.add_edge(&format!("step_{i}"), &format!("step_{}", i - 2));
        }
    }
    graph
}

fn bench_schema_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_layout");
    let config = LayoutConfig::default();
    for (anchors, fields) in [(2usize, 6usize), (6, 10), (12, 16)] {
        for direction in [Direction::TopToBottom, Direction::LeftToRight] {
            let graph = schema_graph(anchors, fields, direction);
            let name = format!("{anchors}x{fields}_{direction:?}");
            group.bench_with_input(BenchmarkId::from_parameter(name), &graph, |b, graph| {
                b.iter(|| {
                    let layout = compute_layout(black_box(graph), &config);
                    black_box(layout.nodes.len());
                });
            });
        }
    }
    group.finish();
}

fn bench_workflow_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("workflow_layout");
    let config = LayoutConfig::default();
    for (steps, feedback) in [(20usize, 0usize), (60, 5), (120, 3)] {
        let graph = workflow_chain(steps, feedback);
        let name = format!("chain_{steps}_feedback_{feedback}");
        group.bench_with_input(BenchmarkId::from_parameter(name), &graph, |b, graph| {
            b.iter(|| {
                let layout = compute_layout(black_box(graph), &config);
                black_box(layout.edges.len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_schema_layout, bench_workflow_layout);
criterion_main!(benches);
