//! Pair resolver: turns scanner candidates plus oracle answers into the
//! final fold units.
//!
//! Two decoration families come out of here:
//!
//! - accepted `.value` spans (oracle-matched accessors)
//! - [`FoldPair`]s for the "assignment block + paired backing method" idiom
//!
//! Pairing is all-or-nothing: the assigned property name, the `this.$name`
//! reference inside the call, and the next `$name(...)` signature within the
//! same class body must all carry the same name. Anything less and the
//! assignment stays visible as plain text - a mismatch is never guessed
//! into a fold.

use crate::oracle::Eligibility;
use crate::position::Span;
use crate::scanner::{AssignmentCandidate, MethodCandidate, ScanResult};

/// The resolved unit for the "assignment -> computed" idiom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldPair {
    /// The whole assignment call expression to hide.
    pub assignment: Span,
    /// Zero-width render anchor at the assignment's first non-space column.
    pub anchor: Span,
    /// One-character span covering the method's `$` prefix marker.
    pub method_anchor: Span,
    /// Span of the method's modifier run to hide, if present.
    pub modifier_span: Option<Span>,
    /// Synthetic label, e.g. `"public override computed"`.
    pub label: String,
}

/// Output of one resolve step.
#[derive(Debug, Clone, Default)]
pub struct ResolveOutput {
    /// Accessor spans whose receiver classified as wrapper-typed.
    pub hidden_accessors: Vec<Span>,
    /// Matched fold pairs.
    pub pairs: Vec<FoldPair>,
}

/// Resolve one pass's candidates.
///
/// `eligibility` runs parallel to `scan.accessors`; accessors with no entry
/// (a discarded query) are treated as unmatched.
pub fn resolve(scan: &ScanResult, eligibility: &[Eligibility]) -> ResolveOutput {
    let mut output = ResolveOutput::default();

    for (i, span) in scan.accessors.iter().enumerate() {
        if eligibility.get(i).is_some_and(|e| e.matched) {
            output.hidden_accessors.push(*span);
        }
    }

    for assignment in &scan.assignments {
        if let Some(pair) = pair_assignment(assignment, &scan.methods) {
            output.pairs.push(pair);
        }
    }

    output.pairs.sort_by_key(|p| p.assignment.start);
    output
}

fn pair_assignment(
    assignment: &AssignmentCandidate,
    methods: &[MethodCandidate],
) -> Option<FoldPair> {
    let bound = assignment.bound_name.as_deref()?;
    if assignment.property != bound {
        return None;
    }

    // The next signature after the assignment within the same class body
    // must literally repeat the bound name; a nearer method with another
    // name breaks the pair.
    let next = methods
        .iter()
        .filter(|m| m.scope == assignment.scope && m.line > assignment.block.start.line)
        .min_by_key(|m| m.line)?;
    if next.name != bound {
        return None;
    }

    Some(FoldPair {
        assignment: assignment.block,
        anchor: Span::anchor(assignment.anchor),
        method_anchor: next.anchor,
        modifier_span: next.modifier_span,
        label: compose_label(assignment, next),
    })
}

/// Compose `[visibility] [override] computed` from the modifiers present on
/// the assignment and/or the method line.
///
/// Either line carrying `override` marks the pair override; a visibility is
/// only shown when one of the lines spells it out. The assignment line wins
/// when both declare a visibility.
fn compose_label(assignment: &AssignmentCandidate, method: &MethodCandidate) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(3);

    let visibility = assignment
        .modifiers
        .visibility
        .or(method.modifiers.visibility);
    if let Some(v) = visibility {
        parts.push(v.as_str());
    }
    if assignment.modifiers.is_override || method.modifiers.is_override {
        parts.push("override");
    }
    parts.push("computed");

    parts.join(" ")
}
