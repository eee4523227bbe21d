use crate::config::SizingConfig;
use crate::ir::{Node, NodeRole};

use super::Size;

/// Resolves a node's extent in layout units.
///
/// `anchor_rows` is shared by every anchor node in one layout call so anchors
/// line up regardless of how many properties each one currently shows. Inputs
/// are not validated; odd counts produce odd sizes.
pub fn resolve_size(node: &Node, anchor_rows: usize, sizing: &SizingConfig) -> Size {
    match node.role {
        NodeRole::Regular => Size::new(sizing.regular_width, sizing.regular_height),
        NodeRole::Anchor => {
            let mut width = sizing.anchor_width;
            let mut height = sizing.anchor_base_height + anchor_rows as f32 * sizing.anchor_row_height;
            if node.content.fully_displayed() {
                width -= sizing.add_control_width;
                height -= sizing.add_control_height;
            }
            Size::new(width, height)
        }
    }
}
