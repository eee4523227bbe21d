use crate::ir::{Graph, NodeRole};
use crate::layout::{DroppedEdge, Layout, Side};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub direction: String,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub dropped_edges: Vec<DroppedEdge>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub role: NodeRole,
    pub position: Position,
    pub width: f32,
    pub height: f32,
    pub rank: usize,
    pub order: usize,
    pub target_position: Side,
    pub source_position: Side,
}

/// Top-left corner of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub source: String,
    pub target: String,
    pub source_handle: Side,
    pub target_handle: Side,
    pub reversed: bool,
}

impl LayoutDump {
    /// Node records follow the graph's declaration order so callers can zip
    /// them against their own node list.
    pub fn from_layout(layout: &Layout, graph: &Graph) -> Self {
        let mut seen = HashSet::new();
        let nodes = graph
            .nodes
            .iter()
            .filter(|node| seen.insert(node.id.as_str()))
            .filter_map(|node| Some((node, layout.nodes.get(&node.id)?)))
            .map(|(node, placed)| NodeDump {
                id: placed.id.clone(),
                role: node.role,
                position: Position {
                    x: placed.x,
                    y: placed.y,
                },
                width: placed.width,
                height: placed.height,
                rank: placed.rank,
                order: placed.order,
                target_position: placed.connection.incoming,
                source_position: placed.connection.outgoing,
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                source: edge.from.clone(),
                target: edge.to.clone(),
                source_handle: edge.source_side,
                target_handle: edge.target_side,
                reversed: edge.reversed,
            })
            .collect();

        let direction = serde_json::to_value(layout.direction)
            .ok()
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_else(|| format!("{:?}", layout.direction));

        LayoutDump {
            direction,
            width: layout.width,
            height: layout.height,
            nodes,
            edges,
            dropped_edges: layout.dropped_edges.clone(),
        }
    }
}

pub fn write_layout_json<W: Write>(writer: W, layout: &Layout, graph: &Graph) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout, graph);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

pub fn write_layout_dump(path: &Path, layout: &Layout, graph: &Graph) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    write_layout_json(writer, layout, graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{Direction, Node};
    use crate::layout::compute_layout;

    #[test]
    fn dump_uses_caller_vocabulary() {
        let mut graph = Graph::new(Direction::LeftToRight);
        graph
            .add_node(Node::regular("b"))
            .add_node(Node::regular("a"))
            .add_node(Node::regular("b"))
            .add_edge("b", "a")
            .add_edge("a", "gone");
        let layout = compute_layout(&graph, &LayoutConfig::default());
        let dump = LayoutDump::from_layout(&layout, &graph);
        let ids: Vec<&str> = dump.nodes.iter().map(|node| node.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(dump.direction, "left-to-right");

        let json = serde_json::to_value(&dump).expect("dump serializes");
        assert_eq!(json["nodes"][0]["sourcePosition"], "right");
        assert_eq!(json["nodes"][0]["position"]["x"], 0.0);
        assert!(json["nodes"][1]["position"]["x"].as_f64().is_some_and(|x| x > 0.0));
        assert!(json["nodes"][0]["position"]["y"].is_number());
        assert_eq!(json["nodes"][0]["targetPosition"], "left");
        assert_eq!(json["edges"][0]["sourceHandle"], "right");
        assert_eq!(json["droppedEdges"][0]["reason"], "unknown-target");
    }
}
