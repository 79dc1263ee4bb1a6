//! Session configuration and the language allow-list.

use std::time::Duration;

/// Language identifiers the engine will attach to.
pub const SUPPORTED_LANGUAGES: &[&str] = &["typescript", "typescriptreact", "vue"];

/// Returns `true` if `language_id` is in the allow-list.
pub fn language_supported(language_id: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&language_id)
}

/// User-configurable options.
///
/// Every field is independently overridable; [`FoldConfig::default`] gives
/// the documented defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldConfig {
    /// Master toggle. When `false`, the next pass clears every decoration
    /// class and nothing is hidden.
    pub enabled: bool,
    /// Glyph drawn where a `.value` accessor is hidden.
    pub marker_glyph: String,
    /// Color of the marker glyph and the synthetic label.
    pub marker_color: String,
    /// Quiet interval collapsing event bursts into one pass.
    pub debounce: Duration,
    /// Extra delay before a keyboard-driven caret nudge, so repeated key
    /// presses can still traverse character-by-character.
    pub nudge_delay: Duration,
}

impl Default for FoldConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            marker_glyph: "▸".to_string(),
            marker_color: "#569cd6".to_string(),
            debounce: Duration::from_millis(50),
            nudge_delay: Duration::from_millis(80),
        }
    }
}

/// Errors surfaced when attaching a session.
#[derive(Debug)]
pub enum FoldError {
    /// The document's language id is not in [`SUPPORTED_LANGUAGES`].
    UnsupportedLanguage(String),
    /// A candidate pattern failed to compile.
    InvalidPattern(regex::Error),
}

impl std::fmt::Display for FoldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLanguage(id) => write!(f, "unsupported language: {}", id),
            Self::InvalidPattern(err) => write!(f, "invalid pattern: {}", err),
        }
    }
}

impl std::error::Error for FoldError {}

impl From<regex::Error> for FoldError {
    fn from(err: regex::Error) -> Self {
        Self::InvalidPattern(err)
    }
}
