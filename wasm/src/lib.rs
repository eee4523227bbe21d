use schema_layout::layout_dump::LayoutDump;
use schema_layout::{Direction, Graph, LayoutConfig, compute_layout};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaLayoutOptions {
    direction: Option<Direction>,
    anchor_rows: Option<usize>,
    node_spacing: Option<f32>,
    rank_spacing: Option<f32>,
    order_passes: Option<usize>,
}

fn build_layout_config(options: &SchemaLayoutOptions) -> LayoutConfig {
    let mut config = LayoutConfig::default();
    if let Some(spacing) = options.node_spacing {
        config.node_spacing = spacing;
    }
    if let Some(spacing) = options.rank_spacing {
        config.rank_spacing = spacing;
    }
    if let Some(passes) = options.order_passes {
        config.order_passes = passes;
    }
    config
}

fn layout_to_json(graph_json: &str, options: SchemaLayoutOptions) -> Result<String, String> {
    let config = build_layout_config(&options);
    let mut graph = Graph::from_json(graph_json).map_err(|error| error.to_string())?;
    if let Some(direction) = options.direction {
        graph.direction = direction;
    }
    if let Some(rows) = options.anchor_rows {
        graph.anchor_rows = rows;
    }
    let layout = compute_layout(&graph, &config);
    serde_json::to_string(&LayoutDump::from_layout(&layout, &graph)).map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn layout_schema_graph(graph_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<SchemaLayoutOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        SchemaLayoutOptions::default()
    };
    layout_to_json(graph_json, options).map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use crate::{SchemaLayoutOptions, layout_to_json};

    #[test]
    fn options_override_graph_direction_and_rows() {
        let graph = r#"{
            "direction": "top-to-bottom",
            "nodes": [
                { "id": "orders", "role": "anchor", "content": { "declaredProperties": 2, "displayedProperties": 2 } },
                { "id": "order_id" }
            ],
            "edges": [{ "source": "orders", "target": "order_id" }]
        }"#;
        let options: SchemaLayoutOptions =
            serde_json::from_str(r#"{ "direction": "left-to-right", "anchorRows": 2 }"#)
                .expect("options parse");
        let json = layout_to_json(graph, options).expect("layout succeeds");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");

        assert_eq!(value["direction"], "left-to-right");
        assert_eq!(value["nodes"][0]["sourcePosition"], "right");
        assert_eq!(value["nodes"][0]["height"], 98.0 + 2.0 * 38.0 - 24.0);
    }

    #[test]
    fn malformed_graph_reports_error() {
        assert!(layout_to_json("{ nodes: ", SchemaLayoutOptions::default()).is_err());
    }
}
