use std::collections::HashMap;

use crate::ir::Direction;

use super::{PlacedNode, Size};

pub(super) struct Spacing {
    pub node: f32,
    pub rank: f32,
    pub center_ranks: bool,
}

/// Turns ordered rank buckets into center coordinates. Each rank occupies a
/// band as deep as its deepest node; nodes sit centered in the band and are
/// packed across it with `spacing.node` between neighbours.
pub(super) fn assign_centers(
    rank_nodes: &[Vec<String>],
    sizes: &HashMap<String, Size>,
    direction: Direction,
    spacing: &Spacing,
) -> Vec<PlacedNode> {
    let node_gap = spacing.node.max(0.0);
    let rank_gap = spacing.rank.max(0.0);
    let size_of = |id: &str| sizes.get(id).copied().unwrap_or_default();

    let cross_totals: Vec<f32> = rank_nodes
        .iter()
        .map(|bucket| {
            let extents: f32 = bucket.iter().map(|id| size_of(id).cross(direction)).sum();
            extents + node_gap * bucket.len().saturating_sub(1) as f32
        })
        .collect();
    let widest = cross_totals.iter().copied().fold(0.0f32, f32::max);

    let mut placed = Vec::with_capacity(sizes.len());
    let mut main_cursor = 0.0f32;
    for (rank, bucket) in rank_nodes.iter().enumerate() {
        if bucket.is_empty() {
            continue;
        }
        let band = bucket
            .iter()
            .map(|id| size_of(id).main(direction))
            .fold(0.0f32, f32::max);
        let mut cross_cursor = if spacing.center_ranks {
            (widest - cross_totals[rank]) / 2.0
        } else {
            0.0
        };
        for (order, node_id) in bucket.iter().enumerate() {
            let size = size_of(node_id);
            let cross = size.cross(direction);
            placed.push(PlacedNode {
                id: node_id.clone(),
                size,
                rank,
                order,
                main_center: main_cursor + band / 2.0,
                cross_center: cross_cursor + cross / 2.0,
            });
            cross_cursor += cross + node_gap;
        }
        main_cursor += band + rank_gap;
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spacing(center_ranks: bool) -> Spacing {
        Spacing {
            node: 10.0,
            rank: 20.0,
            center_ranks,
        }
    }

    fn sizes(entries: &[(&str, f32, f32)]) -> HashMap<String, Size> {
        entries
            .iter()
            .map(|(id, w, h)| (id.to_string(), Size::new(*w, *h)))
            .collect()
    }

    #[test]
    fn packs_same_rank_nodes_across_by_width() {
        let buckets = vec![vec!["a".to_string(), "b".to_string()]];
        let placed = assign_centers(
            &buckets,
            &sizes(&[("a", 100.0, 40.0), ("b", 60.0, 20.0)]),
            Direction::TopToBottom,
            &spacing(false),
        );
        assert_eq!(placed[0].cross_center, 50.0);
        assert_eq!(placed[1].cross_center, 100.0 + 10.0 + 30.0);
        assert_eq!(placed[0].main_center, 20.0);
        assert_eq!(placed[1].main_center, 20.0);
    }

    #[test]
    fn rank_bands_use_deepest_node() {
        let buckets = vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]];
        let placed = assign_centers(
            &buckets,
            &sizes(&[("a", 100.0, 40.0), ("b", 60.0, 90.0), ("c", 50.0, 30.0)]),
            Direction::TopToBottom,
            &spacing(false),
        );
        let c = placed.iter().find(|node| node.id == "c").unwrap();
        assert_eq!(c.rank, 1);
        assert_eq!(c.main_center, 90.0 + 20.0 + 15.0);
    }

    #[test]
    fn horizontal_flow_swaps_axes() {
        let buckets = vec![vec!["a".to_string()], vec!["b".to_string()]];
        let placed = assign_centers(
            &buckets,
            &sizes(&[("a", 100.0, 40.0), ("b", 60.0, 20.0)]),
            Direction::LeftToRight,
            &spacing(false),
        );
        assert_eq!(placed[0].main_center, 50.0);
        assert_eq!(placed[1].main_center, 100.0 + 20.0 + 30.0);
        assert_eq!(placed[1].cross_center, 10.0);
    }

    #[test]
    fn centering_aligns_narrow_rank_to_widest() {
        let buckets = vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]];
        let placed = assign_centers(
            &buckets,
            &sizes(&[("a", 100.0, 40.0), ("b", 100.0, 40.0), ("c", 50.0, 40.0)]),
            Direction::TopToBottom,
            &spacing(true),
        );
        let c = placed.iter().find(|node| node.id == "c").unwrap();
        assert_eq!(c.cross_center, 105.0);
    }
}
