use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::ir::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Extent along the rank axis for the given flow direction.
    pub fn main(&self, direction: Direction) -> f32 {
        if direction.is_horizontal() {
            self.width
        } else {
            self.height
        }
    }

    /// Extent across the rank axis for the given flow direction.
    pub fn cross(&self, direction: Direction) -> f32 {
        if direction.is_horizontal() {
            self.height
        } else {
            self.width
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectionSides {
    pub incoming: Side,
    pub outgoing: Side,
}

impl ConnectionSides {
    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::TopToBottom => Self {
                incoming: Side::Top,
                outgoing: Side::Bottom,
            },
            Direction::LeftToRight => Self {
                incoming: Side::Left,
                outgoing: Side::Right,
            },
        }
    }
}

/// Engine input: a node id with its resolved extent.
#[derive(Debug, Clone, PartialEq)]
pub struct SizedNode {
    pub id: String,
    pub size: Size,
}

/// Engine output for one node. Coordinates are centers in rank-axis /
/// cross-axis space, independent of the caller's x/y convention.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub id: String,
    pub size: Size,
    pub rank: usize,
    pub order: usize,
    pub main_center: f32,
    pub cross_center: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DropReason {
    UnknownSource,
    UnknownTarget,
    SelfLoop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedEdge {
    pub index: usize,
    pub from: String,
    pub to: String,
    pub reason: DropReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnginePlacement {
    /// Sorted by rank, then in-rank order.
    pub nodes: Vec<PlacedNode>,
    /// Indices into the caller's edge list that were ignored for ranking.
    pub back_edges: HashSet<usize>,
    pub dropped_edges: Vec<DroppedEdge>,
}

impl EnginePlacement {
    pub fn rank_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| node.rank + 1)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rank: usize,
    pub order: usize,
    pub connection: ConnectionSides,
}

impl NodeLayout {
    pub fn overlaps(&self, other: &NodeLayout) -> bool {
        let overlap_x = (self.x + self.width).min(other.x + other.width) - self.x.max(other.x);
        let overlap_y = (self.y + self.height).min(other.y + other.height) - self.y.max(other.y);
        overlap_x > 0.0 && overlap_y > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeLayout {
    pub from: String,
    pub to: String,
    pub source_side: Side,
    pub target_side: Side,
    /// The edge points against the flow and was ignored when ranking.
    pub reversed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub direction: Direction,
    pub nodes: BTreeMap<String, NodeLayout>,
    pub edges: Vec<EdgeLayout>,
    pub dropped_edges: Vec<DroppedEdge>,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn empty(direction: Direction) -> Self {
        Self {
            direction,
            nodes: BTreeMap::new(),
            edges: Vec::new(),
            dropped_edges: Vec::new(),
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn rank_of(&self, id: &str) -> Option<usize> {
        self.nodes.get(id).map(|node| node.rank)
    }
}
