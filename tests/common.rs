//! Common test utilities for building rule graphs and source data.
use chrono::{DateTime, Utc};
use henka::prelude::*;
use serde_json::json;

/// Detection settings with the given mode, active, no time window.
#[allow(dead_code)]
pub fn settings(mode: DetectionMode) -> DetectionSettings {
    DetectionSettings {
        mode,
        active: true,
        time_window_enabled: false,
        time_window_millis: 0,
    }
}

/// Builds the canonical change rule: one provider per path, all feeding a
/// single config node, which feeds the final node.
#[allow(dead_code)]
pub fn change_rule(mode: DetectionMode, paths: &[&str]) -> GraphDefinition {
    change_rule_with(settings(mode), paths)
}

#[allow(dead_code)]
pub fn change_rule_with(settings: DetectionSettings, paths: &[&str]) -> GraphDefinition {
    let mut nodes = Vec::new();
    let mut provider_ids = Vec::new();
    for (index, path) in paths.iter().enumerate() {
        let id = (index + 1) as NodeId;
        nodes.push(Node::provider(id, *path));
        provider_ids.push(id);
    }
    let config_id = (paths.len() + 1) as NodeId;
    nodes.push(Node::config(config_id, settings, provider_ids));
    nodes.push(Node::final_node(config_id + 1, config_id));
    GraphDefinition::new(nodes)
}

/// Source data with one "plc" source carrying sensor readings.
#[allow(dead_code)]
pub fn plc_sources(temperature: f64, humidity: f64) -> AHashMap<String, serde_json::Value> {
    let mut sources = AHashMap::new();
    sources.insert(
        "plc".to_string(),
        json!({ "sensors": { "temperature": temperature, "humidity": humidity } }),
    );
    sources
}

#[allow(dead_code)]
pub const TEMPERATURE: &str = "source.plc.sensors.temperature";
#[allow(dead_code)]
pub const HUMIDITY: &str = "source.plc.sensors.humidity";

/// A fixed clock for deterministic time-window behavior.
#[allow(dead_code)]
pub fn at_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).expect("valid test timestamp")
}

/// Base instant used by the change-detection scenarios:
/// 2023-11-14T22:13:20Z.
#[allow(dead_code)]
pub const T0: i64 = 1_700_000_000_000;

/// Installs a subscriber so `RUST_LOG` surfaces engine traces in tests.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
