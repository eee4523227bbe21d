use crate::ir::{Direction, Edge};

use super::{ConnectionSides, EdgeLayout, EnginePlacement, NodeLayout};

/// Maps engine centers onto the caller's top-left x/y convention and tags
/// every node with the sides its edges attach to.
pub fn normalize(placement: &EnginePlacement, direction: Direction) -> Vec<NodeLayout> {
    let connection = ConnectionSides::for_direction(direction);
    placement
        .nodes
        .iter()
        .map(|node| {
            let (center_x, center_y) = if direction.is_horizontal() {
                (node.main_center, node.cross_center)
            } else {
                (node.cross_center, node.main_center)
            };
            NodeLayout {
                id: node.id.clone(),
                x: center_x - node.size.width / 2.0,
                y: center_y - node.size.height / 2.0,
                width: node.size.width,
                height: node.size.height,
                rank: node.rank,
                order: node.order,
                connection,
            }
        })
        .collect()
}

/// Routing anchor sides for every edge that survived sanitizing.
pub fn edge_layouts(edges: &[Edge], placement: &EnginePlacement, direction: Direction) -> Vec<EdgeLayout> {
    let connection = ConnectionSides::for_direction(direction);
    edges
        .iter()
        .enumerate()
        .filter(|(idx, _)| {
            !placement
                .dropped_edges
                .iter()
                .any(|dropped| dropped.index == *idx)
        })
        .map(|(idx, edge)| EdgeLayout {
            from: edge.from.clone(),
            to: edge.to.clone(),
            source_side: connection.outgoing,
            target_side: connection.incoming,
            reversed: placement.back_edges.contains(&idx),
        })
        .collect()
}

/// Far corner of the node bounding box.
pub fn bounds(nodes: &[NodeLayout]) -> (f32, f32) {
    let mut max_x: f32 = 0.0;
    let mut max_y: f32 = 0.0;
    for node in nodes {
        max_x = max_x.max(node.x + node.width);
        max_y = max_y.max(node.y + node.height);
    }
    (max_x, max_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{PlacedNode, Side, Size};

    fn placement() -> EnginePlacement {
        EnginePlacement {
            nodes: vec![
                PlacedNode {
                    id: "a".to_string(),
                    size: Size::new(100.0, 40.0),
                    rank: 0,
                    order: 0,
                    main_center: 20.0,
                    cross_center: 50.0,
                },
                PlacedNode {
                    id: "b".to_string(),
                    size: Size::new(60.0, 30.0),
                    rank: 1,
                    order: 0,
                    main_center: 75.0,
                    cross_center: 50.0,
                },
            ],
            ..EnginePlacement::default()
        }
    }

    #[test]
    fn vertical_flow_maps_centers_to_top_left() {
        let nodes = normalize(&placement(), Direction::TopToBottom);
        assert_eq!((nodes[0].x, nodes[0].y), (0.0, 0.0));
        assert_eq!((nodes[1].x, nodes[1].y), (20.0, 60.0));
        assert!(nodes.iter().all(|node| node.connection.incoming == Side::Top
            && node.connection.outgoing == Side::Bottom));
    }

    #[test]
    fn horizontal_flow_swaps_axes_and_sides() {
        let nodes = normalize(&placement(), Direction::LeftToRight);
        assert_eq!((nodes[1].x, nodes[1].y), (45.0, 35.0));
        assert!(nodes.iter().all(|node| node.connection.incoming == Side::Left
            && node.connection.outgoing == Side::Right));
    }

    #[test]
    fn normalizing_twice_is_stable() {
        let placement = placement();
        assert_eq!(
            normalize(&placement, Direction::TopToBottom),
            normalize(&placement, Direction::TopToBottom)
        );
    }

    #[test]
    fn bounds_cover_all_nodes() {
        let nodes = normalize(&placement(), Direction::TopToBottom);
        assert_eq!(bounds(&nodes), (100.0, 90.0));
    }
}
