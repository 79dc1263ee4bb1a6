#![warn(missing_docs)]
//! `ref-fold-host` - host JSON bridge for `ref-fold`.
//!
//! The engine itself is headless and speaks plain Rust types. This crate
//! adapts it to a JSON-speaking host editor: hover payloads and selection
//! lists come in as `serde_json::Value`s, decoration replacement lists and
//! caret moves go out as JSON command payloads.
//!
//! It intentionally avoids a protocol-types dependency and parses only the
//! small payload subset it needs, skipping malformed elements instead of
//! failing a whole list.

pub mod hover;
pub mod payload;
pub mod settings;

pub use hover::hover_blocks_from_value;
pub use payload::{
    CommandQueue, HostCommand, PayloadError, decorations_payload, selections_from_value,
    selections_payload,
};
pub use settings::fold_config_from_value;
