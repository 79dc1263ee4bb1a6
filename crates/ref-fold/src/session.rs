//! Recomputation scheduler and session lifecycle.
//!
//! One [`FoldSession`] exists per document/editor pairing, created on attach
//! and torn down with [`FoldSession::detach`]. It owns every piece of state
//! the pipeline needs between passes: the debounce deadline, the re-entrancy
//! flag, the hidden-span cache and the pass counters. Nothing here is
//! process-global.
//!
//! # Driving the session
//!
//! The host funnels every change source through [`FoldSession::on_event`]
//! and calls [`FoldSession::poll`] from its event loop. A pass runs when the
//! quiet interval has elapsed:
//!
//! ```text
//! scan -> classify (one hover query per candidate) -> resolve -> gate -> apply
//! ```
//!
//! [`FoldSession::poll`] performs the whole pass synchronously against a
//! [`HoverOracle`]. Hosts with an asynchronous hover service use the
//! two-step protocol instead: [`FoldSession::begin_pass`] returns the query
//! positions, the host answers them at its leisure, and
//! [`FoldSession::complete_pass`] applies the result - unless the session
//! state moved on in the meantime, in which case the stale pass is discarded
//! whole (last-pass-wins; partial application is never observable).

use std::time::Instant;

use crate::config::{FoldConfig, FoldError, language_supported};
use crate::document::DocumentIndex;
use crate::gate::{filter_pairs, filter_spans};
use crate::oracle::{Eligibility, HoverOracle, WrapperClassifier};
use crate::position::{Position, Selection, Span};
use crate::render::{DecorationClassId, DecorationSet, RenderHost};
use crate::resolver::resolve;
use crate::scanner::{ScanResult, Scanner};

/// What drove a selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    /// Arrow keys / typing. Caret nudges are deferred by
    /// [`FoldConfig::nudge_delay`] so repeated presses can still traverse
    /// character-by-character.
    Keyboard,
    /// Mouse or command. Caret nudges apply immediately.
    Pointer,
}

/// An external change notification, funneled through one entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The document text changed.
    DocumentChanged,
    /// The selections changed.
    SelectionChanged(SelectionSource),
    /// The editor became visible / hidden.
    VisibilityChanged,
    /// The configuration changed.
    ConfigChanged,
}

/// How a pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// Decorations were replaced.
    Applied,
    /// The session state moved on while the pass was in flight; nothing was
    /// applied.
    Superseded,
}

/// Per-pass observability record, delivered to the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassRecord {
    /// Pass sequence number.
    pub seq: u64,
    /// Total candidates the scanner produced.
    pub candidates: usize,
    /// Accessor spans hidden after gating.
    pub hidden: usize,
    /// Fold pairs applied after gating.
    pub pairs: usize,
    /// Otherwise-eligible spans revealed by the caret gate.
    pub revealed: usize,
    /// How the pass ended.
    pub outcome: PassOutcome,
}

/// An in-flight pass: the scanned candidates plus the hover queries the
/// host must answer before [`FoldSession::complete_pass`].
#[derive(Debug)]
pub struct PassPlan {
    seq: u64,
    generation: u64,
    scan: ScanResult,
    queries: Vec<Position>,
}

impl PassPlan {
    /// Receiver positions to hover, parallel to the answers expected by
    /// [`FoldSession::complete_pass`].
    pub fn queries(&self) -> &[Position] {
        &self.queries
    }

    /// This pass's sequence number.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

type Subscriber = Box<dyn FnMut(&PassRecord)>;

/// Fold/decoration session for one document-editor pairing.
pub struct FoldSession {
    config: FoldConfig,
    scanner: Scanner,
    classifier: WrapperClassifier,
    document: DocumentIndex,
    selections: Vec<Selection>,
    /// Bumped on every state update; stale pass plans compare against it.
    generation: u64,
    pass_seq: u64,
    deadline: Option<Instant>,
    nudge_at: Option<Instant>,
    /// Re-entrancy guard: set while a pass's results (or a nudge) are being
    /// applied to the host.
    in_flight: bool,
    /// Set while a nudge-induced selection change has not yet echoed back.
    nudging: bool,
    last_selection_source: SelectionSource,
    hidden_cache: Vec<Span>,
    subscriber: Option<Subscriber>,
}

impl std::fmt::Debug for FoldSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoldSession").finish_non_exhaustive()
    }
}

impl FoldSession {
    /// Attach to a document.
    ///
    /// Fails if `language_id` is not in the allow-list.
    pub fn new(language_id: &str, text: &str, config: FoldConfig) -> Result<Self, FoldError> {
        if !language_supported(language_id) {
            return Err(FoldError::UnsupportedLanguage(language_id.to_string()));
        }

        Ok(Self {
            config,
            scanner: Scanner::new()?,
            classifier: WrapperClassifier::new()?,
            document: DocumentIndex::from_text(text),
            selections: Vec::new(),
            generation: 0,
            pass_seq: 0,
            deadline: None,
            nudge_at: None,
            in_flight: false,
            nudging: false,
            last_selection_source: SelectionSource::Pointer,
            hidden_cache: Vec::new(),
            subscriber: None,
        })
    }

    /// Observe completed passes.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&PassRecord) + 'static,
    {
        self.subscriber = Some(Box::new(callback));
    }

    /// Replace the document snapshot. Does not schedule a pass by itself;
    /// the host follows up with [`EventKind::DocumentChanged`].
    pub fn update_document(&mut self, text: &str) {
        self.document = DocumentIndex::from_text(text);
        self.generation += 1;
        // Cached spans are positioned in the old text.
        self.hidden_cache.clear();
        self.nudge_at = None;
    }

    /// Replace the current selections.
    pub fn update_selections(&mut self, selections: Vec<Selection>) {
        self.selections = selections;
        self.generation += 1;
    }

    /// Replace the configuration.
    pub fn update_config(&mut self, config: FoldConfig) {
        self.config = config;
        self.generation += 1;
    }

    /// Current configuration.
    pub fn config(&self) -> &FoldConfig {
        &self.config
    }

    /// Funnel for every external change notification.
    ///
    /// Restarts the debounce timer (trailing-edge execution only). Events
    /// arriving while a pass or nudge is being applied are dropped for this
    /// cycle; the next trigger retries. The one selection event echoed back
    /// by a caret nudge is swallowed so a nudge cannot feed back into
    /// another pass.
    pub fn on_event(&mut self, kind: EventKind, now: Instant) {
        if self.in_flight {
            return;
        }

        if let EventKind::SelectionChanged(source) = kind {
            if self.nudging {
                self.nudging = false;
                return;
            }
            self.last_selection_source = source;
        }

        self.deadline = Some(now + self.config.debounce);
    }

    /// Drive the scheduler.
    ///
    /// Runs a full pass against `oracle` when the quiet interval has
    /// elapsed, or applies a deferred caret nudge when its delay has
    /// elapsed. Returns the pass record when a pass ran.
    pub fn poll(
        &mut self,
        now: Instant,
        oracle: &mut dyn HoverOracle,
        host: &mut dyn RenderHost,
    ) -> Option<PassRecord> {
        if self.in_flight {
            return None;
        }

        if self.deadline.is_some_and(|d| d <= now) {
            self.deadline = None;
            let plan = self.begin_pass();
            let answers = plan
                .queries
                .iter()
                .map(|pos| oracle.hover_info_at(*pos))
                .collect();
            return Some(self.complete_pass(plan, answers, host, now));
        }

        if self.nudge_at.is_some_and(|d| d <= now) {
            self.nudge_at = None;
            self.apply_nudge(host);
        }

        None
    }

    /// Start a pass: scan the current document and return the hover queries
    /// the host must answer.
    ///
    /// Accessor candidates whose dot sits at column 0 have no receiver
    /// position to query and are discarded here rather than guessed.
    pub fn begin_pass(&mut self) -> PassPlan {
        self.pass_seq += 1;

        let mut scan = if self.config.enabled {
            self.scanner.scan(&self.document)
        } else {
            ScanResult::default()
        };

        scan.accessors.retain(|span| span.start.column > 0);
        let queries = scan
            .accessors
            .iter()
            .map(|span| Position::new(span.start.line, span.start.column - 1))
            .collect();

        PassPlan {
            seq: self.pass_seq,
            generation: self.generation,
            scan,
            queries,
        }
    }

    /// Finish a pass: classify the hover answers, resolve, gate, and replace
    /// every decoration class on the host.
    ///
    /// `answers` runs parallel to [`PassPlan::queries`]. If the session's
    /// document, selections or configuration changed since
    /// [`FoldSession::begin_pass`] - or a newer pass started - the plan is
    /// stale and is discarded without touching the host.
    pub fn complete_pass(
        &mut self,
        plan: PassPlan,
        answers: Vec<Option<Vec<String>>>,
        host: &mut dyn RenderHost,
        now: Instant,
    ) -> PassRecord {
        let candidates =
            plan.scan.accessors.len() + plan.scan.assignments.len() + plan.scan.methods.len();

        if plan.generation != self.generation || plan.seq != self.pass_seq {
            let record = PassRecord {
                seq: plan.seq,
                candidates,
                hidden: 0,
                pairs: 0,
                revealed: 0,
                outcome: PassOutcome::Superseded,
            };
            self.notify(&record);
            return record;
        }

        let eligibility: Vec<Eligibility> = plan
            .scan
            .accessors
            .iter()
            .enumerate()
            .map(|(i, _)| {
                self.classifier
                    .classify(answers.get(i).and_then(|a| a.as_deref()))
            })
            .collect();

        let resolved = resolve(&plan.scan, &eligibility);
        let hidden = filter_spans(&resolved.hidden_accessors, &self.selections);
        let pairs = filter_pairs(&resolved.pairs, &self.selections);
        let revealed = (resolved.hidden_accessors.len() - hidden.len())
            + (resolved.pairs.len() - pairs.len());

        let set = DecorationSet::build(&hidden, &pairs, &self.config);

        self.in_flight = true;
        for class in DecorationClassId::ALL {
            host.set_decorations(class, set.class(class));
        }
        self.in_flight = false;

        let record = PassRecord {
            seq: plan.seq,
            candidates,
            hidden: hidden.len(),
            pairs: pairs.len(),
            revealed,
            outcome: PassOutcome::Applied,
        };

        self.hidden_cache = hidden;
        self.schedule_nudge(host, now);
        self.notify(&record);
        record
    }

    /// Detach: clear every decoration class and all scheduler state.
    pub fn detach(&mut self, host: &mut dyn RenderHost) {
        for class in DecorationClassId::ALL {
            host.set_decorations(class, &[]);
        }
        self.deadline = None;
        self.nudge_at = None;
        self.hidden_cache.clear();
    }

    /// After a pass, a collapsed caret sitting exactly one character past
    /// the start of a just-hidden span gets moved to the span's end, so the
    /// cursor appears to jump over the hidden text instead of wading through
    /// invisible characters.
    fn schedule_nudge(&mut self, host: &mut dyn RenderHost, now: Instant) {
        if self.nudge_targets().is_empty() {
            return;
        }
        match self.last_selection_source {
            SelectionSource::Keyboard => {
                self.nudge_at = Some(now + self.config.nudge_delay);
            }
            SelectionSource::Pointer => self.apply_nudge(host),
        }
    }

    fn nudge_targets(&self) -> Vec<(usize, Position)> {
        let mut targets = Vec::new();
        for (i, sel) in self.selections.iter().enumerate() {
            if !sel.is_caret() {
                continue;
            }
            let hit = self.hidden_cache.iter().find(|span| {
                sel.end.line == span.start.line && sel.end.column == span.start.column + 1
            });
            if let Some(span) = hit {
                targets.push((i, span.end));
            }
        }
        targets
    }

    fn apply_nudge(&mut self, host: &mut dyn RenderHost) {
        let targets = self.nudge_targets();
        if targets.is_empty() {
            return;
        }

        let mut selections = self.selections.clone();
        for (i, end) in &targets {
            selections[*i] = Selection::caret(*end);
        }

        self.in_flight = true;
        host.set_selections(&selections);
        host.reveal_position(targets[0].1, true);
        self.in_flight = false;

        self.selections = selections;
        self.nudging = true;
    }

    fn notify(&mut self, record: &PassRecord) {
        if let Some(subscriber) = self.subscriber.as_mut() {
            subscriber(record);
        }
    }
}
