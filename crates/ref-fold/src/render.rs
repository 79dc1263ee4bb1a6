//! Decoration model and the host render boundary.
//!
//! The engine's output is a [`DecorationSet`]: three disjoint span lists,
//! one per visual treatment. Every pass rebuilds the whole set and replaces
//! each class wholesale through [`RenderHost::set_decorations`]; no
//! incremental patching is attempted, the host's set-replacement semantics
//! do the diffing.
//!
//! The applicator side owns no algorithmic logic beyond set building.

use crate::config::FoldConfig;
use crate::position::{Position, Selection, Span};
use crate::resolver::FoldPair;

/// Identifier of one decoration class registered with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecorationClassId(pub u32);

impl DecorationClassId {
    /// Spans rendered invisible (accessors, assignment blocks, modifier
    /// runs, `$` markers).
    pub const HIDE: Self = Self(1);
    /// Marker glyph drawn at a hidden accessor's start.
    pub const MARKER: Self = Self(2);
    /// Synthetic `computed` label drawn at a pair's method anchor.
    pub const LABEL: Self = Self(3);

    /// All classes the engine replaces every pass.
    pub const ALL: [Self; 3] = [Self::HIDE, Self::MARKER, Self::LABEL];
}

/// One decoration instance pushed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationItem {
    /// Anchor span (zero-width for marker/label anchors).
    pub span: Span,
    /// Virtual text to render at the anchor, if any.
    pub text: Option<String>,
    /// Per-instance color override, if any.
    pub color: Option<String>,
    /// Optional hover message (the concealed real text).
    pub message: Option<String>,
}

impl DecorationItem {
    fn hide(span: Span) -> Self {
        Self {
            span,
            text: None,
            color: None,
            message: None,
        }
    }
}

/// The complete per-pass decoration output, grouped by class.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecorationSet {
    /// Spans for [`DecorationClassId::HIDE`].
    pub hide: Vec<DecorationItem>,
    /// Anchors for [`DecorationClassId::MARKER`].
    pub marker: Vec<DecorationItem>,
    /// Anchors for [`DecorationClassId::LABEL`].
    pub label: Vec<DecorationItem>,
}

impl DecorationSet {
    /// Build the set from gated accessor spans and fold pairs.
    ///
    /// Output ordering is deterministic (sorted by span start within each
    /// class) so an unchanged input yields a byte-identical set.
    pub fn build(accessors: &[Span], pairs: &[FoldPair], config: &FoldConfig) -> Self {
        let mut set = Self::default();

        for span in accessors {
            set.hide.push(DecorationItem::hide(*span));
            set.marker.push(DecorationItem {
                span: Span::anchor(span.start),
                text: Some(config.marker_glyph.clone()),
                color: Some(config.marker_color.clone()),
                message: Some(".value".to_string()),
            });
        }

        for pair in pairs {
            set.hide.push(DecorationItem::hide(pair.assignment));
            set.hide.push(DecorationItem::hide(pair.method_anchor));
            if let Some(modifiers) = pair.modifier_span {
                set.hide.push(DecorationItem::hide(modifiers));
            }
            set.label.push(DecorationItem {
                span: Span::anchor(pair.method_anchor.start),
                text: Some(format!("{} ", pair.label)),
                color: Some(config.marker_color.clone()),
                message: None,
            });
        }

        set.hide.sort_by_key(|item| item.span.start);
        set.marker.sort_by_key(|item| item.span.start);
        set.label.sort_by_key(|item| item.span.start);
        set
    }

    /// Items for one class.
    pub fn class(&self, class: DecorationClassId) -> &[DecorationItem] {
        match class {
            DecorationClassId::HIDE => &self.hide,
            DecorationClassId::MARKER => &self.marker,
            DecorationClassId::LABEL => &self.label,
            _ => &[],
        }
    }
}

/// The host rendering/selection boundary.
///
/// Implementations are side-effecting adapters to the real editor; the
/// engine calls them once per class per pass with complete replacement
/// lists, and only the caret-nudge step uses the selection methods.
pub trait RenderHost {
    /// Replace the full decoration list for `class`.
    fn set_decorations(&mut self, class: DecorationClassId, items: &[DecorationItem]);

    /// Replace the editor's selections (caret nudge only).
    fn set_selections(&mut self, selections: &[Selection]);

    /// Reveal `position`, optionally only when it is outside the viewport.
    fn reveal_position(&mut self, position: Position, only_if_outside_viewport: bool);
}
