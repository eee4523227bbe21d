use serde::{Deserialize, Serialize};
use std::path::Path;

/// Size constants in layout units. One layout unit maps to one renderer unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizingConfig {
    pub regular_width: f32,
    pub regular_height: f32,
    pub anchor_width: f32,
    pub anchor_base_height: f32,
    pub anchor_row_height: f32,
    /// Removed from an anchor's height when no add-control row is shown.
    pub add_control_height: f32,
    /// Removed from an anchor's width when no add-control row is shown.
    pub add_control_width: f32,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            regular_width: 195.0,
            regular_height: 41.0,
            anchor_width: 224.0,
            anchor_base_height: 98.0,
            anchor_row_height: 38.0,
            add_control_height: 24.0,
            add_control_width: 39.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_spacing: f32,
    pub rank_spacing: f32,
    pub order_passes: usize,
    pub center_ranks: bool,
    pub sizing: SizingConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing: 50.0,
            rank_spacing: 50.0,
            order_passes: 4,
            center_ranks: true,
            sizing: SizingConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SizingConfigFile {
    regular_width: Option<f32>,
    regular_height: Option<f32>,
    anchor_width: Option<f32>,
    anchor_base_height: Option<f32>,
    anchor_row_height: Option<f32>,
    add_control_height: Option<f32>,
    add_control_width: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    node_spacing: Option<f32>,
    rank_spacing: Option<f32>,
    order_passes: Option<usize>,
    center_ranks: Option<bool>,
    sizing: Option<SizingConfigFile>,
}

fn apply_config_file(config: &mut LayoutConfig, parsed: ConfigFile) {
    if let Some(v) = parsed.node_spacing {
        config.node_spacing = v;
    }
    if let Some(v) = parsed.rank_spacing {
        config.rank_spacing = v;
    }
    if let Some(v) = parsed.order_passes {
        config.order_passes = v;
    }
    if let Some(v) = parsed.center_ranks {
        config.center_ranks = v;
    }
    if let Some(sizing) = parsed.sizing {
        let target = &mut config.sizing;
        if let Some(v) = sizing.regular_width {
            target.regular_width = v;
        }
        if let Some(v) = sizing.regular_height {
            target.regular_height = v;
        }
        if let Some(v) = sizing.anchor_width {
            target.anchor_width = v;
        }
        if let Some(v) = sizing.anchor_base_height {
            target.anchor_base_height = v;
        }
        if let Some(v) = sizing.anchor_row_height {
            target.anchor_row_height = v;
        }
        if let Some(v) = sizing.add_control_height {
            target.add_control_height = v;
        }
        if let Some(v) = sizing.add_control_width {
            target.add_control_width = v;
        }
    }
}

pub fn parse_config(contents: &str) -> anyhow::Result<LayoutConfig> {
    let mut config = LayoutConfig::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    apply_config_file(&mut config, parsed);
    Ok(config)
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).expect("defaults");
        assert_eq!(config.node_spacing, 50.0);
        assert_eq!(config.sizing.regular_width, 195.0);
        assert!(config.center_ranks);
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let config = parse_config(
            r#"{ "rankSpacing": 80, "orderPasses": 8, "sizing": { "anchorRowHeight": 40 } }"#,
        )
        .expect("config parses");
        assert_eq!(config.rank_spacing, 80.0);
        assert_eq!(config.node_spacing, 50.0);
        assert_eq!(config.order_passes, 8);
        assert_eq!(config.sizing.anchor_row_height, 40.0);
        assert_eq!(config.sizing.anchor_width, 224.0);
    }

    #[test]
    fn rejects_non_json() {
        assert!(parse_config("rankSpacing = 3").is_err());
    }
}
