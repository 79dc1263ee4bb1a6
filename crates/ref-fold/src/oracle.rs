//! Eligibility oracle: classifies hover answers against wrapper-type names.
//!
//! The engine never sees the host's type checker directly. For each `.value`
//! candidate it asks an external, hover-style provider for the type of the
//! receiver (one column left of the dot) and inspects only the first text
//! block of the answer: the substring after the first `:` on a line is
//! matched against a fixed set of wrapper-type family names.
//!
//! Failure policy: a provider that errors, times out, or has nothing to say
//! yields `None`, and `None` always classifies as not eligible. The safe
//! default is to reveal, never to hide.

use crate::position::Position;
use regex::Regex;

/// The wrapper-type families the engine recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperFamily {
    /// `Ref<...>`
    Ref,
    /// `ComputedRef<...>`
    ComputedRef,
    /// `WritableComputedRef<...>`
    WritableComputedRef,
    /// `ShallowRef<...>`
    ShallowRef,
}

impl WrapperFamily {
    /// The declared type name for this family.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ref => "Ref",
            Self::ComputedRef => "ComputedRef",
            Self::WritableComputedRef => "WritableComputedRef",
            Self::ShallowRef => "ShallowRef",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "Ref" => Some(Self::Ref),
            "ComputedRef" => Some(Self::ComputedRef),
            "WritableComputedRef" => Some(Self::WritableComputedRef),
            "ShallowRef" => Some(Self::ShallowRef),
            _ => None,
        }
    }
}

/// Classification of one candidate's hover answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    /// Whether the receiver's declared type is a known wrapper type.
    pub matched: bool,
    /// The family that matched, if any.
    pub family: Option<WrapperFamily>,
}

impl Eligibility {
    /// The "no answer / no match" classification.
    pub fn unmatched() -> Self {
        Self {
            matched: false,
            family: None,
        }
    }
}

/// Hover-style type-information provider, supplied by the host adapter.
///
/// One query is issued per `.value` candidate per pass; results are never
/// cached across passes. Timeouts are the implementation's concern - the
/// engine treats "no answer" the same as "no hover".
pub trait HoverOracle {
    /// Return the textual blocks of the hover at `position`, or `None` when
    /// the query failed or produced nothing.
    fn hover_info_at(&mut self, position: Position) -> Option<Vec<String>>;
}

/// Compiled wrapper-type matcher.
pub struct WrapperClassifier {
    family_re: Regex,
}

impl WrapperClassifier {
    /// Compile the family pattern.
    pub fn new() -> Result<Self, regex::Error> {
        // Anchored at the start of the declared type, longest name first,
        // followed by a word boundary or an opening generic argument.
        let family_re =
            Regex::new(r"^(WritableComputedRef|ComputedRef|ShallowRef|Ref)(?:\b|<)")?;
        Ok(Self { family_re })
    }

    /// Classify a hover answer.
    ///
    /// Only the first block is inspected. The declared type is the trimmed
    /// substring after the first `:` on a line; lines without `:` are
    /// skipped.
    pub fn classify(&self, blocks: Option<&[String]>) -> Eligibility {
        let Some(first) = blocks.and_then(|b| b.first()) else {
            return Eligibility::unmatched();
        };

        for line in first.lines() {
            let Some((_, annotation)) = line.split_once(':') else {
                continue;
            };
            if let Some(caps) = self.family_re.captures(annotation.trim_start()) {
                return Eligibility {
                    matched: true,
                    family: WrapperFamily::from_name(&caps[1]),
                };
            }
            // First annotation line decides; a non-wrapper type is final.
            return Eligibility::unmatched();
        }

        Eligibility::unmatched()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(block: &str) -> Eligibility {
        let classifier = WrapperClassifier::new().expect("pattern compiles");
        classifier.classify(Some(&[block.to_string()]))
    }

    #[test]
    fn test_ref_matches() {
        let e = classify("(property) total: Ref<number>");
        assert!(e.matched);
        assert_eq!(e.family, Some(WrapperFamily::Ref));
    }

    #[test]
    fn test_computed_ref_matches() {
        let e = classify("const x: ComputedRef<string>");
        assert_eq!(e.family, Some(WrapperFamily::ComputedRef));
    }

    #[test]
    fn test_plain_type_does_not_match() {
        assert!(!classify("(property) total: number").matched);
    }

    #[test]
    fn test_prefix_only_does_not_match() {
        // "Reference" starts with "Ref" but is not a wrapper family.
        assert!(!classify("x: Reference<number>").matched);
    }

    #[test]
    fn test_bare_family_name_matches() {
        assert!(classify("x: Ref").matched);
    }

    #[test]
    fn test_no_answer_is_unmatched() {
        let classifier = WrapperClassifier::new().expect("pattern compiles");
        assert!(!classifier.classify(None).matched);
        assert!(!classifier.classify(Some(&[])).matched);
    }

    #[test]
    fn test_only_first_block_inspected() {
        let classifier = WrapperClassifier::new().expect("pattern compiles");
        let blocks = vec!["no annotation here".to_string(), "x: Ref<u8>".to_string()];
        assert!(!classifier.classify(Some(&blocks)).matched);
    }

    #[test]
    fn test_multiline_block_skips_lines_without_colon() {
        let e = classify("```ts\ncount: ShallowRef<number>\n```");
        assert_eq!(e.family, Some(WrapperFamily::ShallowRef));
    }
}
