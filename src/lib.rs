//! Layered layout for schema and workflow diagrams.
//!
//! Node sizes come from each node's role and content state, positions from a
//! ranked, crossing-reduced placement, and every node is annotated with the
//! sides its edges attach to.

pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::{LayoutConfig, SizingConfig, load_config};
pub use ir::{ContentState, Direction, Edge, Graph, InputError, Node, NodeRole};
pub use layout::{Layout, compute_layout};

#[cfg(feature = "cli")]
pub use cli::run;

/// Parses a JSON/JSON5 graph description and lays it out.
pub fn layout_json(input: &str, config: &LayoutConfig) -> Result<(Graph, Layout), InputError> {
    let graph = Graph::from_json(input)?;
    let layout = compute_layout(&graph, config);
    Ok((graph, layout))
}
