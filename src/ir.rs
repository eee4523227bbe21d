use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    TopToBottom,
    LeftToRight,
}

impl Direction {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "TD" | "TB" | "top-to-bottom" => Some(Self::TopToBottom),
            "LR" | "left-to-right" => Some(Self::LeftToRight),
            _ => None,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftToRight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Anchor,
    #[default]
    Regular,
}

/// Property counts for anchor nodes. Regular nodes carry the default and
/// ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentState {
    pub declared_properties: usize,
    pub displayed_properties: usize,
}

impl ContentState {
    pub fn new(declared_properties: usize, displayed_properties: usize) -> Self {
        Self {
            declared_properties,
            displayed_properties,
        }
    }

    /// Every declared property is already on screen, so no add-control row
    /// is reserved.
    pub fn fully_displayed(&self) -> bool {
        self.displayed_properties == self.declared_properties
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub role: NodeRole,
    #[serde(default)]
    pub content: ContentState,
}

impl Node {
    pub fn regular(id: &str) -> Self {
        Self {
            id: id.to_string(),
            role: NodeRole::Regular,
            content: ContentState::default(),
        }
    }

    pub fn anchor(id: &str, declared_properties: usize, displayed_properties: usize) -> Self {
        Self {
            id: id.to_string(),
            role: NodeRole::Anchor,
            content: ContentState::new(declared_properties, displayed_properties),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(alias = "source")]
    pub from: String,
    #[serde(alias = "target")]
    pub to: String,
}

impl Edge {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Everything one layout call needs. `anchor_rows` is the number of property
/// rows every anchor node reserves room for in this pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub anchor_rows: usize,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read graph input: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid graph JSON: {0}")]
    Json(#[from] json5::Error),
    #[error("unknown layout direction `{0}` (expected TB or LR)")]
    UnknownDirection(String),
}

impl Graph {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    /// Parses a graph description. JSON5 is accepted so hand-written fixtures
    /// may carry comments and trailing commas.
    pub fn from_json(input: &str) -> Result<Self, InputError> {
        Ok(json5::from_str(input)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn add_node(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    pub fn add_edge(&mut self, from: &str, to: &str) -> &mut Self {
        self.edges.push(Edge::new(from, to));
        self
    }
}

pub fn parse_direction(token: &str) -> Result<Direction, InputError> {
    Direction::from_token(token.trim()).ok_or_else(|| InputError::UnknownDirection(token.to_string()))
}
