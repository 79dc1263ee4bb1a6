//! Decoration and selection payload conversion.
//!
//! Positions on the wire use the host's `{ "line": n, "character": n }`
//! shape. Decoration replacement lists are emitted once per class per pass,
//! matching the engine's whole-set-replace contract.

use ref_fold::{DecorationClassId, DecorationItem, Position, RenderHost, Selection, Span};
use serde_json::{Value, json};
use thiserror::Error;

/// Errors for top-level payload shapes.
///
/// Malformed *elements* inside a list are skipped; only a wrong top-level
/// shape is an error.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The selections payload was not an array.
    #[error("expected an array of selections, got {0}")]
    NotASelectionList(&'static str),
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn position_to_value(position: Position) -> Value {
    json!({ "line": position.line, "character": position.column })
}

fn position_from_value(value: &Value) -> Option<Position> {
    Some(Position::new(
        value.get("line")?.as_u64()? as usize,
        value.get("character")?.as_u64()? as usize,
    ))
}

fn span_to_value(span: Span) -> Value {
    json!({
        "start": position_to_value(span.start),
        "end": position_to_value(span.end),
    })
}

fn selection_from_value(value: &Value) -> Option<Selection> {
    // Hosts report either anchor/active or start/end; accept both.
    let start = value.get("anchor").or_else(|| value.get("start"))?;
    let end = value.get("active").or_else(|| value.get("end"))?;
    Some(Selection::new(
        position_from_value(start)?,
        position_from_value(end)?,
    ))
}

/// Parse a host selection list. Malformed entries are skipped.
pub fn selections_from_value(value: &Value) -> Result<Vec<Selection>, PayloadError> {
    let Some(arr) = value.as_array() else {
        return Err(PayloadError::NotASelectionList(type_name(value)));
    };
    Ok(arr.iter().filter_map(selection_from_value).collect())
}

/// Host-side key for a decoration class.
pub fn class_key(class: DecorationClassId) -> &'static str {
    match class {
        DecorationClassId::HIDE => "refFold.hide",
        DecorationClassId::MARKER => "refFold.marker",
        DecorationClassId::LABEL => "refFold.label",
        _ => "refFold.custom",
    }
}

fn decoration_to_value(item: &DecorationItem) -> Value {
    let mut entry = json!({ "range": span_to_value(item.span) });

    if item.text.is_some() || item.color.is_some() {
        entry["renderOptions"] = json!({
            "before": {
                "contentText": item.text.clone().unwrap_or_default(),
                "color": item.color.clone().unwrap_or_default(),
            }
        });
    }
    if let Some(message) = &item.message {
        entry["hoverMessage"] = json!(message);
    }

    entry
}

/// Build the complete replacement payload for one decoration class.
pub fn decorations_payload(class: DecorationClassId, items: &[DecorationItem]) -> Value {
    json!({
        "class": class_key(class),
        "decorations": items.iter().map(decoration_to_value).collect::<Vec<_>>(),
    })
}

/// Build a `setSelections` payload.
pub fn selections_payload(selections: &[Selection]) -> Value {
    Value::Array(
        selections
            .iter()
            .map(|sel| {
                json!({
                    "anchor": position_to_value(sel.start),
                    "active": position_to_value(sel.end),
                })
            })
            .collect(),
    )
}

/// One outbound host command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCommand {
    /// Host method name (`setDecorations`, `setSelections`,
    /// `revealPosition`).
    pub method: &'static str,
    /// JSON parameters.
    pub params: Value,
}

/// A [`RenderHost`] that queues JSON commands for the host to drain.
///
/// The engine calls it synchronously during a pass; the host empties the
/// queue afterwards and performs the real editor calls.
#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: Vec<HostCommand>,
}

impl CommandQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all queued commands, oldest first.
    pub fn drain(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Queued command count.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no commands are queued.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl RenderHost for CommandQueue {
    fn set_decorations(&mut self, class: DecorationClassId, items: &[DecorationItem]) {
        self.commands.push(HostCommand {
            method: "setDecorations",
            params: decorations_payload(class, items),
        });
    }

    fn set_selections(&mut self, selections: &[Selection]) {
        self.commands.push(HostCommand {
            method: "setSelections",
            params: selections_payload(selections),
        });
    }

    fn reveal_position(&mut self, position: Position, only_if_outside_viewport: bool) {
        self.commands.push(HostCommand {
            method: "revealPosition",
            params: json!({
                "position": position_to_value(position),
                "onlyIfOutsideViewport": only_if_outside_viewport,
            }),
        });
    }
}
