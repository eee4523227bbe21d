mod engine;
mod normalize;
mod position;
mod ranking;
mod sizing;
pub(crate) mod types;
pub use engine::{LayoutEngine, SugiyamaEngine};
pub use normalize::{bounds, edge_layouts, normalize};
pub use sizing::resolve_size;
pub use types::*;

use std::collections::BTreeMap;

use crate::config::LayoutConfig;
use crate::ir::Graph;

/// Lays out `graph` with the default layered engine.
pub fn compute_layout(graph: &Graph, config: &LayoutConfig) -> Layout {
    compute_layout_with(graph, config, &SugiyamaEngine::from_config(config))
}

/// Lays out `graph` with any engine: sizes every node, places them, then
/// normalizes the placement into top-left positions keyed by node id.
pub fn compute_layout_with(graph: &Graph, config: &LayoutConfig, engine: &dyn LayoutEngine) -> Layout {
    let sized = size_nodes(graph, config);
    if sized.is_empty() {
        return Layout::empty(graph.direction);
    }

    let placement = engine.place(&sized, &graph.edges, graph.direction);
    let node_layouts = normalize(&placement, graph.direction);
    let (width, height) = bounds(&node_layouts);
    let edges = edge_layouts(&graph.edges, &placement, graph.direction);

    let nodes: BTreeMap<String, NodeLayout> = node_layouts
        .into_iter()
        .map(|node| (node.id.clone(), node))
        .collect();
    if has_node_overlap(&nodes) {
        tracing::warn!("layout produced overlapping nodes");
    }

    Layout {
        direction: graph.direction,
        nodes,
        edges,
        dropped_edges: placement.dropped_edges,
        width,
        height,
    }
}

/// Resolves every declared node's size for this call, in declaration order.
/// Repeated ids are passed through; the engine keeps the first.
pub fn size_nodes(graph: &Graph, config: &LayoutConfig) -> Vec<SizedNode> {
    graph
        .nodes
        .iter()
        .map(|node| SizedNode {
            id: node.id.clone(),
            size: resolve_size(node, graph.anchor_rows, &config.sizing),
        })
        .collect()
}

pub fn has_node_overlap(nodes: &BTreeMap<String, NodeLayout>) -> bool {
    let mut boxes: Vec<&NodeLayout> = nodes.values().collect();
    if boxes.len() < 2 {
        return false;
    }
    boxes.sort_by(|a, b| a.x.total_cmp(&b.x));
    for i in 0..boxes.len() {
        let a = boxes[i];
        for b in boxes.iter().skip(i + 1) {
            if b.x >= a.x + a.width {
                break;
            }
            if a.overlaps(b) {
                return true;
            }
        }
    }
    false
}
