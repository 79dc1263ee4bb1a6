//! Host settings object -> [`FoldConfig`].
//!
//! Parsed field-by-field: an absent or ill-typed field keeps its default,
//! so a partially valid settings object still configures what it can.

use ref_fold::FoldConfig;
use serde_json::Value;
use std::time::Duration;

/// Build a [`FoldConfig`] from a host settings object.
///
/// Recognized fields: `enabled` (bool), `markerGlyph` (string),
/// `markerColor` (string), `debounceMs` (integer), `nudgeDelayMs`
/// (integer).
pub fn fold_config_from_value(value: &Value) -> FoldConfig {
    let mut config = FoldConfig::default();

    if let Some(enabled) = value.get("enabled").and_then(Value::as_bool) {
        config.enabled = enabled;
    }
    if let Some(glyph) = value.get("markerGlyph").and_then(Value::as_str) {
        config.marker_glyph = glyph.to_string();
    }
    if let Some(color) = value.get("markerColor").and_then(Value::as_str) {
        config.marker_color = color.to_string();
    }
    if let Some(ms) = value.get("debounceMs").and_then(Value::as_u64) {
        config.debounce = Duration::from_millis(ms);
    }
    if let Some(ms) = value.get("nudgeDelayMs").and_then(Value::as_u64) {
        config.nudge_delay = Duration::from_millis(ms);
    }

    config
}
