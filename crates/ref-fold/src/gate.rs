//! Caret/selection gate: reveals spans the user is editing.
//!
//! A span drops out of the "fold it" set when the user is touching it:
//!
//! - a non-empty selection overlapping the span reveals it
//! - a collapsed caret sitting exactly at the span's end boundary reveals
//!   it, so typing or deleting at the boundary behaves naturally
//!
//! A collapsed caret strictly inside the span does *not* reveal it; the
//! scheduler's caret nudge moves such a caret across the hidden text
//! instead. For fold pairs, touching either half reveals the whole pair.
//!
//! These are pure functions, called once per recomputation pass per span
//! collection.

use crate::position::{Selection, Span};
use crate::resolver::FoldPair;

/// Returns `true` if any selection reveals `span`.
pub fn span_revealed(span: &Span, selections: &[Selection]) -> bool {
    selections.iter().any(|sel| {
        if sel.is_caret() {
            sel.end == span.end
        } else {
            let (min, max) = sel.min_max();
            span.intersects(&Span::new(min, max))
        }
    })
}

/// Keep only the spans no selection is touching.
pub fn filter_spans(spans: &[Span], selections: &[Selection]) -> Vec<Span> {
    spans
        .iter()
        .filter(|span| !span_revealed(span, selections))
        .copied()
        .collect()
}

/// Keep only the pairs neither half of which is touched.
///
/// The assignment block and the method anchor line are checked; revealing
/// one half reveals both, since a half-folded pair would read as garbage.
pub fn filter_pairs(pairs: &[FoldPair], selections: &[Selection]) -> Vec<FoldPair> {
    pairs
        .iter()
        .filter(|pair| {
            let method_extent = match pair.modifier_span {
                Some(modifiers) => Span::new(modifiers.start, pair.method_anchor.end),
                None => pair.method_anchor,
            };
            !span_revealed(&pair.assignment, selections)
                && !span_revealed(&method_extent, selections)
        })
        .cloned()
        .collect()
}
