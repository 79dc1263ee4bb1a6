//! End-to-end pipeline tests: scan -> classify -> resolve -> gate -> apply.

use ref_fold::{
    DecorationClassId, DecorationItem, EventKind, FoldConfig, FoldSession, HoverOracle,
    PassOutcome, Position, RenderHost, Selection, SelectionSource, Span,
};
use std::time::{Duration, Instant};

/// Oracle answering from a fixed (position -> hover block) table.
struct TableOracle {
    entries: Vec<(Position, String)>,
}

impl TableOracle {
    fn new(entries: &[(usize, usize, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(line, col, text)| (Position::new(*line, *col), text.to_string()))
                .collect(),
        }
    }
}

impl HoverOracle for TableOracle {
    fn hover_info_at(&mut self, position: Position) -> Option<Vec<String>> {
        self.entries
            .iter()
            .find(|(p, _)| *p == position)
            .map(|(_, text)| vec![text.clone()])
    }
}

/// Host remembering the latest replacement list per class.
#[derive(Default)]
struct SnapshotHost {
    hide: Vec<DecorationItem>,
    marker: Vec<DecorationItem>,
    label: Vec<DecorationItem>,
}

impl SnapshotHost {
    fn snapshot(&self) -> (Vec<DecorationItem>, Vec<DecorationItem>, Vec<DecorationItem>) {
        (self.hide.clone(), self.marker.clone(), self.label.clone())
    }
}

impl RenderHost for SnapshotHost {
    fn set_decorations(&mut self, class: DecorationClassId, items: &[DecorationItem]) {
        let slot = match class {
            DecorationClassId::HIDE => &mut self.hide,
            DecorationClassId::MARKER => &mut self.marker,
            DecorationClassId::LABEL => &mut self.label,
            _ => return,
        };
        *slot = items.to_vec();
    }

    fn set_selections(&mut self, _selections: &[Selection]) {}

    fn reveal_position(&mut self, _position: Position, _only_if_outside_viewport: bool) {}
}

fn run_pass(
    session: &mut FoldSession,
    oracle: &mut TableOracle,
    host: &mut SnapshotHost,
    t: Instant,
) -> PassOutcome {
    session.on_event(EventKind::DocumentChanged, t);
    session
        .poll(t + Duration::from_millis(60), oracle, host)
        .expect("pass runs")
        .outcome
}

#[test]
fn accessor_hidden_when_hover_reports_wrapper_type() {
    let mut session =
        FoldSession::new("typescript", "total.value\n", FoldConfig::default()).unwrap();
    let mut oracle = TableOracle::new(&[(0, 4, "total: Ref<number>")]);
    let mut host = SnapshotHost::default();

    run_pass(&mut session, &mut oracle, &mut host, Instant::now());

    assert_eq!(host.hide.len(), 1);
    assert_eq!(host.hide[0].span, Span::from_coords(0, 5, 0, 11));
    assert_eq!(host.marker.len(), 1);
    assert_eq!(host.marker[0].span, Span::from_coords(0, 5, 0, 5));
}

#[test]
fn accessor_stays_visible_when_hover_reports_plain_type() {
    let mut session =
        FoldSession::new("typescript", "total.value\n", FoldConfig::default()).unwrap();
    let mut oracle = TableOracle::new(&[(0, 4, "total: number")]);
    let mut host = SnapshotHost::default();

    run_pass(&mut session, &mut oracle, &mut host, Instant::now());

    assert!(host.hide.is_empty());
    assert!(host.marker.is_empty());
}

#[test]
fn pipeline_is_idempotent_on_unchanged_input() {
    let text = concat!(
        "class App {\n",
        "  total = ref(0);\n",
        "  calc = computed(this.$calc.bind(this));\n",
        "  $calc() { return this.total.value + 1; }\n",
        "}\n"
    );
    let mut session = FoldSession::new("typescript", text, FoldConfig::default()).unwrap();
    let mut oracle = TableOracle::new(&[(3, 28, "total: Ref<number>")]);
    let mut host = SnapshotHost::default();

    let t0 = Instant::now();
    run_pass(&mut session, &mut oracle, &mut host, t0);
    let first = host.snapshot();

    run_pass(
        &mut session,
        &mut oracle,
        &mut host,
        t0 + Duration::from_secs(1),
    );
    assert_eq!(host.snapshot(), first);
}

#[test]
fn assignment_and_method_fold_as_one_pair() {
    let text = concat!(
        "class App {\n",
        "  calc = computed(this.$calc.bind(this));\n",
        "  $calc() { return 1; }\n",
        "}\n"
    );
    let mut session = FoldSession::new("typescript", text, FoldConfig::default()).unwrap();
    let mut oracle = TableOracle::new(&[]);
    let mut host = SnapshotHost::default();

    run_pass(&mut session, &mut oracle, &mut host, Instant::now());

    // Assignment block and `$` marker hidden, label at the method anchor.
    assert_eq!(host.hide.len(), 2);
    assert_eq!(host.hide[0].span, Span::from_coords(1, 2, 1, 41));
    assert_eq!(host.hide[1].span, Span::from_coords(2, 2, 2, 3));
    assert_eq!(host.label.len(), 1);
    assert_eq!(host.label[0].span, Span::from_coords(2, 2, 2, 2));
    assert_eq!(host.label[0].text.as_deref(), Some("computed "));
}

#[test]
fn mismatched_pair_renders_as_plain_text() {
    let text = concat!(
        "class App {\n",
        "  foo = computed(this.$foo.bind(this));\n",
        "  $bar() { return 1; }\n",
        "}\n"
    );
    let mut session = FoldSession::new("typescript", text, FoldConfig::default()).unwrap();
    let mut oracle = TableOracle::new(&[]);
    let mut host = SnapshotHost::default();

    run_pass(&mut session, &mut oracle, &mut host, Instant::now());

    assert!(host.hide.is_empty());
    assert!(host.label.is_empty());
}

#[test]
fn method_in_other_class_body_never_pairs() {
    let text = concat!(
        "class A {\n",
        "  foo = computed(this.$foo.bind(this));\n",
        "}\n",
        "class B {\n",
        "  $foo() { return 1; }\n",
        "}\n"
    );
    let mut session = FoldSession::new("typescript", text, FoldConfig::default()).unwrap();
    let mut oracle = TableOracle::new(&[]);
    let mut host = SnapshotHost::default();

    run_pass(&mut session, &mut oracle, &mut host, Instant::now());
    assert!(host.hide.is_empty());
}

#[test]
fn multiline_block_with_interpolated_paren_captured_to_true_close() {
    use ref_fold::{DocumentIndex, Scanner};

    let text = concat!(
        "class App {\n",
        "  msg = computed(() => {\n",
        "    return `) ${this.part(1)} (`;\n",
        "  });\n",
        "}\n"
    );
    let scan = Scanner::new()
        .unwrap()
        .scan(&DocumentIndex::from_text(text));

    // The `)` in the template text and the balanced parens inside `${...}`
    // must not end the capture early; the true close is on line 3.
    assert_eq!(scan.assignments.len(), 1);
    assert_eq!(scan.assignments[0].block.start, Position::new(1, 2));
    assert_eq!(scan.assignments[0].block.end, Position::new(3, 5));
}

#[test]
fn selection_over_accessor_reveals_it() {
    let mut session =
        FoldSession::new("typescript", "total.value\n", FoldConfig::default()).unwrap();
    let mut oracle = TableOracle::new(&[(0, 4, "total: Ref<number>")]);
    let mut host = SnapshotHost::default();

    session.update_selections(vec![Selection::new(
        Position::new(0, 0),
        Position::new(0, 8),
    )]);
    let t0 = Instant::now();
    session.on_event(EventKind::SelectionChanged(SelectionSource::Pointer), t0);
    let record = session
        .poll(t0 + Duration::from_millis(60), &mut oracle, &mut host)
        .expect("pass");

    assert_eq!(record.hidden, 0);
    assert_eq!(record.revealed, 1);
    assert!(host.hide.is_empty());
}

#[test]
fn touching_one_half_of_a_pair_reveals_both() {
    let text = concat!(
        "class App {\n",
        "  calc = computed(this.$calc.bind(this));\n",
        "  $calc() { return 1; }\n",
        "}\n"
    );
    let mut session = FoldSession::new("typescript", text, FoldConfig::default()).unwrap();
    let mut oracle = TableOracle::new(&[]);
    let mut host = SnapshotHost::default();

    // Caret at the end of the method's `$` marker span.
    session.update_selections(vec![Selection::caret(Position::new(2, 3))]);
    let t0 = Instant::now();
    session.on_event(EventKind::SelectionChanged(SelectionSource::Pointer), t0);
    session
        .poll(t0 + Duration::from_millis(60), &mut oracle, &mut host)
        .expect("pass");

    assert!(host.hide.is_empty());
    assert!(host.label.is_empty());
}

#[test]
fn accessor_at_line_start_is_discarded_not_guessed() {
    let mut session =
        FoldSession::new("typescript", ".value\n", FoldConfig::default()).unwrap();
    let plan = session.begin_pass();
    assert!(plan.queries().is_empty());
}

#[test]
fn oracle_silence_means_nothing_is_hidden() {
    let mut session =
        FoldSession::new("typescript", "a.value + b.value\n", FoldConfig::default()).unwrap();
    let mut oracle = TableOracle::new(&[]);
    let mut host = SnapshotHost::default();

    let outcome = run_pass(&mut session, &mut oracle, &mut host, Instant::now());
    assert_eq!(outcome, PassOutcome::Applied);
    assert!(host.hide.is_empty());
}

#[test]
fn label_carries_modifiers_from_both_lines() {
    let text = concat!(
        "class App {\n",
        "  private calc = computed(this.$calc.bind(this));\n",
        "  override $calc() { return 1; }\n",
        "}\n"
    );
    let mut session = FoldSession::new("typescript", text, FoldConfig::default()).unwrap();
    let mut oracle = TableOracle::new(&[]);
    let mut host = SnapshotHost::default();

    run_pass(&mut session, &mut oracle, &mut host, Instant::now());
    assert_eq!(
        host.label[0].text.as_deref(),
        Some("private override computed ")
    );
    // The method line's modifier run is hidden as well.
    assert!(
        host.hide
            .iter()
            .any(|item| item.span == Span::from_coords(2, 2, 2, 11))
    );
}
