#![warn(missing_docs)]
//! ref-fold - Headless Reactive-Accessor Fold Engine
//!
//! # Overview
//!
//! `ref-fold` computes editor decorations that cosmetically rewrite
//! reactive-programming idioms without changing the underlying text:
//!
//! - literal `.value` accessors on wrapper-typed expressions are hidden
//!   behind a marker glyph
//! - the "property assigned from a bound accessor method" idiom is collapsed
//!   into a single synthetic `computed` line
//!
//! The real source text is never modified; editing, saving and compilation
//! always see the original characters. The crate is headless: the host
//! editor supplies document text, selections and a hover-style type query,
//! and receives complete decoration replacement lists.
//!
//! # Pipeline
//!
//! ```text
//! document + selections
//!     -> Scanner      (candidate spans, no semantic knowledge)
//!     -> Oracle       (hover query per accessor, wrapper-type match)
//!     -> Resolver     (accepted spans + assignment/method fold pairs)
//!     -> Caret gate   (reveal spans the user is touching)
//!     -> RenderHost   (whole-set decoration replacement)
//! ```
//!
//! The [`FoldSession`] drives this pipeline with a debounced, re-entrancy
//! guarded scheduler and nudges collapsed carets across freshly hidden
//! spans.
//!
//! # Quick Start
//!
//! ```rust
//! use ref_fold::{EventKind, FoldConfig, FoldSession};
//! use std::time::{Duration, Instant};
//!
//! # struct NoOracle;
//! # impl ref_fold::HoverOracle for NoOracle {
//! #     fn hover_info_at(&mut self, _: ref_fold::Position) -> Option<Vec<String>> { None }
//! # }
//! # struct NoHost;
//! # impl ref_fold::RenderHost for NoHost {
//! #     fn set_decorations(&mut self, _: ref_fold::DecorationClassId, _: &[ref_fold::DecorationItem]) {}
//! #     fn set_selections(&mut self, _: &[ref_fold::Selection]) {}
//! #     fn reveal_position(&mut self, _: ref_fold::Position, _: bool) {}
//! # }
//! let mut session = FoldSession::new(
//!     "typescript",
//!     "total.value\n",
//!     FoldConfig::default(),
//! ).unwrap();
//!
//! let now = Instant::now();
//! session.on_event(EventKind::DocumentChanged, now);
//!
//! let mut oracle = NoOracle;
//! let mut host = NoHost;
//! session.poll(now + Duration::from_millis(60), &mut oracle, &mut host);
//! ```
//!
//! # Module Description
//!
//! - [`position`] - line/column coordinates, spans, selections
//! - [`document`] - rope-backed line access
//! - [`scanner`] - textual candidate search and balanced block capture
//! - [`oracle`] - hover-answer classification against wrapper-type names
//! - [`resolver`] - fold-pair resolution and label composition
//! - [`gate`] - caret/selection reveal rules
//! - [`render`] - decoration model and the host boundary
//! - [`session`] - debounced scheduler, pass protocol, caret nudge
//!
//! # Safety Model
//!
//! Every fallible step degrades to "reveal the real text": scan anomalies
//! drop the candidate, hover failures classify as not eligible, scheduler
//! races drop the later operation for that cycle. Nothing here hides text
//! on uncertainty.

pub mod config;
pub mod document;
pub mod gate;
pub mod oracle;
pub mod position;
pub mod render;
pub mod resolver;
pub mod scanner;
pub mod session;

pub use config::{FoldConfig, FoldError, SUPPORTED_LANGUAGES, language_supported};
pub use document::DocumentIndex;
pub use gate::{filter_pairs, filter_spans, span_revealed};
pub use oracle::{Eligibility, HoverOracle, WrapperClassifier, WrapperFamily};
pub use position::{Position, Selection, Span};
pub use render::{DecorationClassId, DecorationItem, DecorationSet, RenderHost};
pub use resolver::{FoldPair, ResolveOutput, resolve};
pub use scanner::{
    AssignmentCandidate, MethodCandidate, Modifiers, ScanResult, Scanner, Visibility,
};
pub use session::{
    EventKind, FoldSession, PassOutcome, PassPlan, PassRecord, SelectionSource,
};
