//! Converts host hover payloads into the engine's text blocks.
//!
//! Accepted shapes, per the common hover protocol:
//!
//! - `null`
//! - a bare string
//! - a `MarkedString`-like object (`{ "value": "..." }`, language ignored)
//! - an array of either of the above
//! - a `Hover`-like object (`{ "contents": <any of the above> }`)
//!
//! Anything unrecognized contributes no block; the engine treats an empty
//! answer as "no hover".

use serde_json::Value;

fn block_from_value(value: &Value) -> Option<String> {
    if let Some(s) = value.as_str() {
        return Some(s.to_string());
    }

    // MarkedString / MarkupContent: { value: "..." }
    value
        .get("value")
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}

/// Extract the textual blocks of a hover payload.
///
/// Returns an empty list for `null` or unrecognized payloads.
pub fn hover_blocks_from_value(value: &Value) -> Vec<String> {
    let contents = value.get("contents").unwrap_or(value);

    if let Some(arr) = contents.as_array() {
        return arr.iter().filter_map(block_from_value).collect();
    }

    block_from_value(contents).into_iter().collect()
}
