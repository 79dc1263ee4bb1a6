//! Text scanner: locates candidate spans with no semantic knowledge.
//!
//! Three textual searches run over the full document:
//!
//! - `.value` accessor occurrences (word-boundary matches only)
//! - "property = wrapperFactory(" assignment blocks, captured across lines
//!   with a string-aware parenthesis balance
//! - `$name(` backing-method signatures, recording the `$` anchor and the
//!   modifier run
//!
//! Failure to match is always silent: a candidate that cannot be captured
//! cleanly (unterminated call, opening paren inside a string) is dropped,
//! never partially emitted.

use crate::document::DocumentIndex;
use crate::position::{Position, Span};
use regex::Regex;

/// Visibility modifier found on a candidate line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// `public`
    Public,
    /// `private`
    Private,
    /// `protected`
    Protected,
}

impl Visibility {
    /// The source keyword for this visibility.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
        }
    }
}

/// Modifiers found on an assignment or method line.
///
/// Only modifiers literally present in the text are recorded; nothing is
/// ever inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Explicit visibility keyword, if present.
    pub visibility: Option<Visibility>,
    /// Whether the `override` keyword is present.
    pub is_override: bool,
}

impl Modifiers {
    fn from_run(run: &str) -> Self {
        let mut m = Self::default();
        for word in run.split_whitespace() {
            match word {
                "public" => m.visibility = Some(Visibility::Public),
                "private" => m.visibility = Some(Visibility::Private),
                "protected" => m.visibility = Some(Visibility::Protected),
                "override" => m.is_override = true,
                _ => {}
            }
        }
        m
    }
}

/// A captured "property = wrapperFactory(...)" block.
#[derive(Debug, Clone)]
pub struct AssignmentCandidate {
    /// The whole call expression, from the first non-space column of the
    /// start line to just past the closing paren (and a trailing `;`).
    pub block: Span,
    /// Render anchor at the first non-space column of the start line.
    pub anchor: Position,
    /// The assigned property name.
    pub property: String,
    /// The backing-method name referenced via the `this.$name` marker inside
    /// the call, without the `$` prefix. `None` if no marker was found.
    pub bound_name: Option<String>,
    /// Modifiers present on the assignment line.
    pub modifiers: Modifiers,
    /// Position of the innermost enclosing `{` at the start line, used to
    /// scope pairing to one class body.
    pub scope: Option<Position>,
}

/// A `$name(...)` backing-method signature.
#[derive(Debug, Clone)]
pub struct MethodCandidate {
    /// Method name without the `$` prefix.
    pub name: String,
    /// One-character span covering the `$` prefix marker.
    pub anchor: Span,
    /// Exact span of the modifier run preceding the name, if any.
    pub modifier_span: Option<Span>,
    /// Modifiers present on the signature line.
    pub modifiers: Modifiers,
    /// Line of the signature.
    pub line: usize,
    /// Position of the innermost enclosing `{` at this line.
    pub scope: Option<Position>,
}

/// Everything one scan pass produced.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Spans covering literal `.value` accessor occurrences.
    pub accessors: Vec<Span>,
    /// Captured assignment blocks.
    pub assignments: Vec<AssignmentCandidate>,
    /// Backing-method signatures.
    pub methods: Vec<MethodCandidate>,
}

/// Compiled candidate patterns.
///
/// Created once per session; [`Scanner::scan`] runs all searches over one
/// document snapshot.
pub struct Scanner {
    accessor_re: Regex,
    assignment_re: Regex,
    method_re: Regex,
    bound_re: Regex,
}

const MODIFIER_RUN: &str = r"(?:(?:public|private|protected|readonly|static|abstract|override|async)\s+)*";

impl Scanner {
    /// Compile the candidate patterns.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            accessor_re: Regex::new(r"\.value\b")?,
            assignment_re: Regex::new(&format!(
                r"^\s*({MODIFIER_RUN})([A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*(?:computed|shallowRef|ref)\s*\("
            ))?,
            method_re: Regex::new(&format!(
                r"^\s*({MODIFIER_RUN})\$([A-Za-z_][A-Za-z0-9_$]*)\s*\("
            ))?,
            bound_re: Regex::new(r"this\.\$([A-Za-z_][A-Za-z0-9_$]*)")?,
        })
    }

    /// Scan the full document and return all candidates of each kind.
    ///
    /// The whole document is scanned (not just visible ranges) so the set of
    /// folds never changes while scrolling.
    pub fn scan(&self, doc: &DocumentIndex) -> ScanResult {
        let mut result = ScanResult::default();
        let mut pending: Vec<PendingAssignment> = Vec::new();
        let mut raw_methods: Vec<(usize, MethodCandidate)> = Vec::new();

        for line_number in 0..doc.line_count() {
            let Some(line) = doc.line_text(line_number) else {
                continue;
            };

            for m in self.accessor_re.find_iter(&line) {
                let start = byte_to_col(&line, m.start());
                let end = byte_to_col(&line, m.end());
                result
                    .accessors
                    .push(Span::from_coords(line_number, start, line_number, end));
            }

            if let Some(caps) = self.assignment_re.captures(&line) {
                let whole = caps.get(0).expect("regex match");
                // Opening paren is the last char of the whole match.
                let open_col = byte_to_col(&line, whole.end() - 1);
                let indent_col = byte_to_col(&line, line.len() - line.trim_start().len());
                pending.push(PendingAssignment {
                    open: Position::new(line_number, open_col),
                    anchor: Position::new(line_number, indent_col),
                    property: caps[2].to_string(),
                    modifiers: Modifiers::from_run(&caps[1]),
                    capture: None,
                });
            }

            if let Some(caps) = self.method_re.captures(&line) {
                let run = caps.get(1).expect("modifier group");
                let name = caps.get(2).expect("name group");
                let dollar_col = byte_to_col(&line, name.start() - 1);
                let modifier_span = if run.is_empty() {
                    None
                } else {
                    Some(Span::from_coords(
                        line_number,
                        byte_to_col(&line, run.start()),
                        line_number,
                        byte_to_col(&line, run.end()),
                    ))
                };
                raw_methods.push((
                    line_number,
                    MethodCandidate {
                        name: name.as_str().to_string(),
                        anchor: Span::from_coords(
                            line_number,
                            dollar_col,
                            line_number,
                            dollar_col + 1,
                        ),
                        modifier_span,
                        modifiers: Modifiers::from_run(run.as_str()),
                        line: line_number,
                        scope: None,
                    },
                ));
            }
        }

        let walk = walk_document(doc, &mut pending);

        for p in pending {
            let Some(capture) = p.capture else {
                // Unterminated or shadowed by an enclosing capture.
                continue;
            };
            result.assignments.push(AssignmentCandidate {
                block: Span::new(p.anchor, capture.end),
                anchor: p.anchor,
                property: p.property,
                bound_name: self
                    .bound_re
                    .captures(&capture.text)
                    .map(|c| c[1].to_string()),
                modifiers: p.modifiers,
                scope: walk.line_scopes.get(p.open.line).copied().flatten(),
            });
        }

        for (line_number, mut method) in raw_methods {
            method.scope = walk.line_scopes.get(line_number).copied().flatten();
            result.methods.push(method);
        }

        result
    }
}

struct PendingAssignment {
    open: Position,
    anchor: Position,
    property: String,
    modifiers: Modifiers,
    capture: Option<CapturedBlock>,
}

struct CapturedBlock {
    end: Position,
    text: String,
}

struct WalkResult {
    /// Innermost open-brace position at the start of each line.
    line_scopes: Vec<Option<Position>>,
}

/// One forward pass over the document: tracks string/template interiors,
/// records per-line enclosing-brace scope, and captures the balanced
/// parenthesis run of each pending assignment.
fn walk_document(doc: &DocumentIndex, pending: &mut [PendingAssignment]) -> WalkResult {
    let text = doc.text();
    let mut lex = LexState::new();
    let mut brace_stack: Vec<Position> = Vec::new();
    let mut line_scopes: Vec<Option<Position>> = Vec::with_capacity(doc.line_count());
    line_scopes.push(brace_stack.last().copied());

    // Pending assignments sorted by opening-paren position; only one capture
    // can be active at a time, an assignment starting inside an active
    // capture is dropped.
    pending.sort_by_key(|p| p.open);
    let mut next_pending = 0usize;
    let mut active: Option<(usize, usize, String)> = None; // (index, depth, text)
    let mut await_semi: Option<usize> = None;

    let mut line = 0usize;
    let mut column = 0usize;

    for ch in text.chars() {
        let pos = Position::new(line, column);
        let is_code = lex.feed(ch);

        if let Some(idx) = await_semi.take() {
            let end = if is_code && ch == ';' {
                Position::new(line, column + 1)
            } else {
                pos
            };
            if let Some((_, _, text)) = active.take() {
                pending[idx].capture = Some(CapturedBlock { end, text });
            }
        }

        if let Some((idx, depth, buf)) = active.as_mut() {
            buf.push(ch);
            if is_code {
                match ch {
                    '(' => *depth += 1,
                    ')' => {
                        *depth -= 1;
                        if *depth == 0 {
                            // Block may be terminated by a `;` right after
                            // the closing paren; decide on the next char.
                            await_semi = Some(*idx);
                        }
                    }
                    _ => {}
                }
            }
        } else if next_pending < pending.len() && pending[next_pending].open == pos {
            let idx = next_pending;
            next_pending += 1;
            if is_code && ch == '(' {
                active = Some((idx, 1, String::from(ch)));
            }
            // Opening paren inside a string: candidate silently dropped.
        } else {
            while next_pending < pending.len() && pending[next_pending].open < pos {
                // Skipped while another capture was active.
                next_pending += 1;
            }
        }

        if is_code {
            match ch {
                '{' => brace_stack.push(pos),
                '}' => {
                    brace_stack.pop();
                }
                _ => {}
            }
        }

        if ch == '\n' {
            line += 1;
            column = 0;
            line_scopes.push(brace_stack.last().copied());
        } else {
            column += 1;
        }
    }

    // A capture still active at end-of-document is unterminated: discard.
    if let Some(idx) = await_semi {
        let end = Position::new(line, column);
        if let Some((_, _, text)) = active.take() {
            pending[idx].capture = Some(CapturedBlock { end, text });
        }
    }

    WalkResult { line_scopes }
}

#[derive(Clone, Copy, PartialEq)]
enum StrKind {
    Single,
    Double,
}

enum Frame {
    /// Inside a template literal's text.
    Template,
    /// Inside a `${ ... }` interpolation; counts nested code braces so the
    /// interpolation's own `}` can be told apart.
    Interp(usize),
}

/// Minimal lexical state: enough to know whether a character is active code
/// or string/comment interior. Not a tokenizer.
struct LexState {
    frames: Vec<Frame>,
    string: Option<StrKind>,
    escaped: bool,
    prev_dollar: bool,
    prev_slash: bool,
    line_comment: bool,
}

impl LexState {
    fn new() -> Self {
        Self {
            frames: Vec::new(),
            string: None,
            escaped: false,
            prev_dollar: false,
            prev_slash: false,
            line_comment: false,
        }
    }

    /// Feed one character; returns `true` if it is active code (not inside a
    /// string, template text, or line comment).
    fn feed(&mut self, ch: char) -> bool {
        if self.line_comment {
            if ch == '\n' {
                self.line_comment = false;
            }
            return false;
        }

        if self.escaped {
            self.escaped = false;
            return false;
        }

        if let Some(kind) = self.string {
            match ch {
                '\\' => self.escaped = true,
                '\'' if kind == StrKind::Single => self.string = None,
                '"' if kind == StrKind::Double => self.string = None,
                // Plain strings do not continue across lines.
                '\n' => self.string = None,
                _ => {}
            }
            return false;
        }

        if matches!(self.frames.last(), Some(Frame::Template)) {
            match ch {
                '\\' => self.escaped = true,
                '`' => {
                    self.frames.pop();
                }
                '{' if self.prev_dollar => {
                    self.frames.push(Frame::Interp(0));
                }
                _ => {}
            }
            self.prev_dollar = ch == '$';
            return false;
        }

        // Active code (top level or inside an interpolation).
        self.prev_dollar = false;
        match ch {
            '\'' => {
                self.string = Some(StrKind::Single);
                self.prev_slash = false;
                return false;
            }
            '"' => {
                self.string = Some(StrKind::Double);
                self.prev_slash = false;
                return false;
            }
            '`' => {
                self.frames.push(Frame::Template);
                self.prev_slash = false;
                return false;
            }
            '/' if self.prev_slash => {
                self.prev_slash = false;
                self.line_comment = true;
                return false;
            }
            '{' => {
                if let Some(Frame::Interp(depth)) = self.frames.last_mut() {
                    *depth += 1;
                }
            }
            '}' => {
                if let Some(Frame::Interp(depth)) = self.frames.last_mut() {
                    if *depth == 0 {
                        self.frames.pop();
                        self.prev_slash = false;
                        return false;
                    }
                    *depth -= 1;
                }
            }
            _ => {}
        }
        self.prev_slash = ch == '/';
        true
    }
}

fn byte_to_col(line: &str, byte: usize) -> usize {
    line[..byte].chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> ScanResult {
        let scanner = Scanner::new().expect("patterns compile");
        scanner.scan(&DocumentIndex::from_text(text))
    }

    #[test]
    fn test_accessor_word_boundary() {
        let result = scan("myvalueX.value + x.valueable + a.value2\n");
        assert_eq!(result.accessors.len(), 1);
        assert_eq!(result.accessors[0], Span::from_coords(0, 8, 0, 14));
    }

    #[test]
    fn test_accessor_multiple_per_line() {
        let result = scan("a.value + b.value\n");
        assert_eq!(result.accessors.len(), 2);
        assert_eq!(result.accessors[0], Span::from_coords(0, 1, 0, 7));
        assert_eq!(result.accessors[1], Span::from_coords(0, 11, 0, 17));
    }

    #[test]
    fn test_assignment_single_line() {
        let result = scan("class C {\n  x = computed(this.$x.bind(this));\n}\n");
        assert_eq!(result.assignments.len(), 1);
        let a = &result.assignments[0];
        assert_eq!(a.property, "x");
        assert_eq!(a.bound_name.as_deref(), Some("x"));
        assert_eq!(a.anchor, Position::new(1, 2));
        assert_eq!(a.block, Span::from_coords(1, 2, 1, 35));
        assert_eq!(a.scope, Some(Position::new(0, 8)));
    }

    #[test]
    fn test_assignment_multiline_with_template_interpolation() {
        // The `)` inside the `${...}` interpolation and the stray `(` in the
        // template text must not perturb the balance.
        let text = concat!(
            "class C {\n",
            "  msg = computed(() => {\n",
            "    return `open ( ${this.f(1)} close`;\n",
            "  });\n",
            "}\n"
        );
        let result = scan(text);
        assert_eq!(result.assignments.len(), 1);
        let a = &result.assignments[0];
        assert_eq!(a.block.start, Position::new(1, 2));
        assert_eq!(a.block.end, Position::new(3, 5));
    }

    #[test]
    fn test_assignment_paren_inside_string() {
        let result = scan("class C {\n  s = ref(\"(((\");\n}\n");
        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.assignments[0].block.end, Position::new(1, 17));
    }

    #[test]
    fn test_assignment_unterminated_discarded() {
        let result = scan("class C {\n  x = computed(this.$x\n");
        assert!(result.assignments.is_empty());
    }

    #[test]
    fn test_assignment_modifiers() {
        let result = scan("class C {\n  public override total = computed(this.$total);\n}\n");
        let a = &result.assignments[0];
        assert_eq!(a.property, "total");
        assert_eq!(a.modifiers.visibility, Some(Visibility::Public));
        assert!(a.modifiers.is_override);
    }

    #[test]
    fn test_method_signature() {
        let result = scan("class C {\n  protected async $calc() { return 1; }\n}\n");
        assert_eq!(result.methods.len(), 1);
        let m = &result.methods[0];
        assert_eq!(m.name, "calc");
        assert_eq!(m.anchor, Span::from_coords(1, 18, 1, 19));
        assert_eq!(m.modifier_span, Some(Span::from_coords(1, 2, 1, 18)));
        assert_eq!(m.modifiers.visibility, Some(Visibility::Protected));
    }

    #[test]
    fn test_method_without_modifiers() {
        let result = scan("class C {\n  $calc() { return 1; }\n}\n");
        let m = &result.methods[0];
        assert_eq!(m.anchor, Span::from_coords(1, 2, 1, 3));
        assert_eq!(m.modifier_span, None);
    }

    #[test]
    fn test_scope_distinguishes_class_bodies() {
        let text = concat!(
            "class A {\n",
            "  x = computed(this.$x);\n",
            "}\n",
            "class B {\n",
            "  $x() {}\n",
            "}\n"
        );
        let result = scan(text);
        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.methods.len(), 1);
        assert_ne!(result.assignments[0].scope, result.methods[0].scope);
    }

    #[test]
    fn test_line_comment_does_not_perturb_balance() {
        let text = concat!(
            "class C {\n",
            "  x = computed(() => {\n",
            "    // stray ) and ( in a comment\n",
            "    return 1;\n",
            "  });\n",
            "}\n"
        );
        let result = scan(text);
        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.assignments[0].block.end, Position::new(4, 5));
    }

    #[test]
    fn test_block_without_trailing_semicolon() {
        let result = scan("class C {\n  x = ref(0)\n}\n");
        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.assignments[0].block.end, Position::new(1, 12));
    }
}
