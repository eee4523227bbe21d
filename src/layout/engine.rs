use std::collections::{HashMap, HashSet};

use crate::config::LayoutConfig;
use crate::ir::{Direction, Edge};

use super::position::{Spacing, assign_centers};
use super::ranking::{compute_ranks, order_rank_nodes};
use super::{DropReason, DroppedEdge, EnginePlacement, Size, SizedNode};

/// Places sized nodes into ranks and assigns center coordinates in
/// rank-axis / cross-axis space.
///
/// Implementations must be deterministic, must never fail, and must not keep
/// state between calls. `nodes` is the graph's declaration list as sized, so
/// an id may repeat; only its first entry is placed.
pub trait LayoutEngine {
    fn place(&self, nodes: &[SizedNode], edges: &[Edge], direction: Direction) -> EnginePlacement;
}

/// Layered placement: longest-path ranking, median crossing reduction and
/// packed coordinate assignment.
#[derive(Debug, Clone)]
pub struct SugiyamaEngine {
    pub node_spacing: f32,
    pub rank_spacing: f32,
    pub order_passes: usize,
    pub center_ranks: bool,
}

impl SugiyamaEngine {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            node_spacing: config.node_spacing,
            rank_spacing: config.rank_spacing,
            order_passes: config.order_passes,
            center_ranks: config.center_ranks,
        }
    }
}

impl Default for SugiyamaEngine {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl LayoutEngine for SugiyamaEngine {
    fn place(&self, nodes: &[SizedNode], edges: &[Edge], direction: Direction) -> EnginePlacement {
        let mut node_ids: Vec<String> = Vec::with_capacity(nodes.len());
        let mut sizes: HashMap<String, Size> = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if sizes.contains_key(&node.id) {
                tracing::warn!(node = %node.id, "duplicate node id ignored");
                continue;
            }
            sizes.insert(node.id.clone(), node.size);
            node_ids.push(node.id.clone());
        }
        if node_ids.is_empty() {
            return EnginePlacement::default();
        }
        let node_order: HashMap<String, usize> = node_ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx))
            .collect();

        let (kept, dropped_edges) = sanitize_edges(edges, &node_order);
        let (kept_indices, rank_edges): (Vec<usize>, Vec<Edge>) = kept.into_iter().unzip();

        let ranking = compute_ranks(&node_ids, &rank_edges, &node_order);
        let back_edges: HashSet<usize> = ranking
            .back_edges
            .iter()
            .map(|idx| kept_indices[*idx])
            .collect();
        for idx in &back_edges {
            let edge = &edges[*idx];
            tracing::debug!(from = %edge.from, to = %edge.to, "edge ignored for ranking (cycle)");
        }

        let mut rank_nodes = ranking.buckets(&node_ids);
        order_rank_nodes(&mut rank_nodes, &rank_edges, &ranking, self.order_passes);

        let spacing = Spacing {
            node: self.node_spacing,
            rank: self.rank_spacing,
            center_ranks: self.center_ranks,
        };
        let placed = assign_centers(&rank_nodes, &sizes, direction, &spacing);
        tracing::debug!(
            nodes = placed.len(),
            ranks = rank_nodes.len(),
            dropped = dropped_edges.len(),
            "placement complete"
        );

        EnginePlacement {
            nodes: placed,
            back_edges,
            dropped_edges,
        }
    }
}

/// Splits edges into those usable for ranking (with their original index)
/// and those dropped for referencing unknown nodes or looping on themselves.
pub(super) fn sanitize_edges(
    edges: &[Edge],
    known: &HashMap<String, usize>,
) -> (Vec<(usize, Edge)>, Vec<DroppedEdge>) {
    let mut kept = Vec::with_capacity(edges.len());
    let mut dropped = Vec::new();
    for (index, edge) in edges.iter().enumerate() {
        let reason = if !known.contains_key(&edge.from) {
            Some(DropReason::UnknownSource)
        } else if !known.contains_key(&edge.to) {
            Some(DropReason::UnknownTarget)
        } else if edge.from == edge.to {
            Some(DropReason::SelfLoop)
        } else {
            None
        };
        match reason {
            Some(reason) => {
                tracing::debug!(from = %edge.from, to = %edge.to, ?reason, "dropping edge");
                dropped.push(DroppedEdge {
                    index,
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    reason,
                });
            }
            None => kept.push((index, edge.clone())),
        }
    }
    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(id: &str, width: f32, height: f32) -> SizedNode {
        SizedNode {
            id: id.to_string(),
            size: Size::new(width, height),
        }
    }

    #[test]
    fn empty_input_places_nothing() {
        let placement = SugiyamaEngine::default().place(&[], &[], Direction::TopToBottom);
        assert!(placement.nodes.is_empty());
        assert_eq!(placement.rank_count(), 0);
    }

    #[test]
    fn dangling_and_self_loop_edges_are_recorded() {
        let nodes = vec![sized("a", 10.0, 10.0), sized("b", 10.0, 10.0)];
        let edges = vec![
            Edge::new("a", "ghost"),
            Edge::new("nobody", "b"),
            Edge::new("a", "a"),
            Edge::new("a", "b"),
        ];
        let placement = SugiyamaEngine::default().place(&nodes, &edges, Direction::TopToBottom);
        let reasons: Vec<(usize, DropReason)> = placement
            .dropped_edges
            .iter()
            .map(|dropped| (dropped.index, dropped.reason))
            .collect();
        assert_eq!(
            reasons,
            vec![
                (0, DropReason::UnknownTarget),
                (1, DropReason::UnknownSource),
                (2, DropReason::SelfLoop),
            ]
        );
        assert_eq!(placement.nodes.len(), 2);
        assert_eq!(placement.rank_count(), 2);
    }

    #[test]
    fn back_edge_indices_refer_to_caller_edges() {
        let nodes = vec![sized("a", 10.0, 10.0), sized("b", 10.0, 10.0)];
        let edges = vec![
            Edge::new("a", "missing"),
            Edge::new("a", "b"),
            Edge::new("b", "a"),
        ];
        let placement = SugiyamaEngine::default().place(&nodes, &edges, Direction::TopToBottom);
        assert_eq!(placement.back_edges, HashSet::from([2]));
    }

    #[test]
    fn duplicate_ids_keep_first_size() {
        let nodes = vec![sized("a", 10.0, 10.0), sized("a", 99.0, 99.0)];
        let placement = SugiyamaEngine::default().place(&nodes, &[], Direction::TopToBottom);
        assert_eq!(placement.nodes.len(), 1);
        assert_eq!(placement.nodes[0].size, Size::new(10.0, 10.0));
    }
}
