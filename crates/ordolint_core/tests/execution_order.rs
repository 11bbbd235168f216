//! Integration tests for rule scheduling and traversal order.
//!
//! Rules here append to a shared event log so the order in which the
//! engine calls them can be observed from the outside.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ordolint_core::{
    Emitter, LintParams, Linter, LinterConfig, Rule, RuleError, RuleSet, VisitContext,
    VisitorModifier, VisitorModifiers,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use rstest::rstest;

type Bus = Arc<Mutex<Vec<String>>>;

/// Logs `file:<id>` at the root and `<id>` at the first non-root node.
struct BusRule {
    bus: Bus,
    id: &'static str,
    modifiers: VisitorModifiers,
    done: AtomicBool,
}

impl BusRule {
    fn new(bus: &Bus, id: &'static str, modifiers: &[VisitorModifier]) -> Self {
        Self {
            bus: Arc::clone(bus),
            id,
            modifiers: modifiers.iter().copied().collect(),
            done: AtomicBool::new(false),
        }
    }
}

impl Rule for BusRule {
    fn id(&self) -> &str {
        self.id
    }

    fn modifiers(&self) -> VisitorModifiers {
        self.modifiers
    }

    fn visit(&self, ctx: &mut VisitContext<'_>, _: &mut Emitter<'_>) -> Result<(), RuleError> {
        if ctx.is_root() {
            self.bus.lock().push(format!("file:{}", self.id));
        } else if !self.done.swap(true, Ordering::SeqCst) {
            self.bus.lock().push(self.id.to_string());
        }
        Ok(())
    }
}

/// Counts visits per node kind class: root and non-root.
#[derive(Default)]
struct Visits {
    root: usize,
    other: usize,
}

struct CountingRule {
    id: &'static str,
    modifiers: VisitorModifiers,
    visits: Arc<Mutex<HashMap<&'static str, Visits>>>,
}

impl Rule for CountingRule {
    fn id(&self) -> &str {
        self.id
    }

    fn modifiers(&self) -> VisitorModifiers {
        self.modifiers
    }

    fn visit(&self, ctx: &mut VisitContext<'_>, _: &mut Emitter<'_>) -> Result<(), RuleError> {
        let mut visits = self.visits.lock();
        let entry = visits.entry(self.id).or_default();
        if ctx.is_root() {
            entry.root += 1;
        } else {
            entry.other += 1;
        }
        Ok(())
    }
}

const LATE: VisitorModifier = VisitorModifier::RunAsLateAsPossible;
const ROOT_ONLY: VisitorModifier = VisitorModifier::RunOnRootNodeOnly;

fn bus_rule_set(bus: &Bus) -> RuleSet {
    RuleSet::new("standard")
        .with_rule(BusRule::new(bus, "e", &[LATE]))
        .with_rule(BusRule::new(bus, "d", &[ROOT_ONLY, LATE]))
        .with_rule(BusRule::new(bus, "b", &[]))
        .with_rule(BusRule::new(bus, "a", &[ROOT_ONLY]))
        .with_rule(BusRule::new(bus, "c", &[]))
}

#[test]
fn test_rule_execution_order() {
    let bus: Bus = Arc::default();
    let rule_sets = [bus_rule_set(&bus)];
    let linter = Linter::new(LinterConfig::new());

    let result = linter
        .lint(LintParams::new("fun main() {}", &rule_sets), |_| {})
        .unwrap();

    assert_eq!(
        *bus.lock(),
        vec!["file:a", "file:b", "file:c", "file:d", "file:e", "b", "c", "e"]
    );
    assert_eq!(result.execution_order, vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn test_execution_order_is_stable_across_runs() {
    let linter = Linter::new(LinterConfig::new());
    let mut orders = Vec::new();
    for _ in 0..3 {
        let bus: Bus = Arc::default();
        let rule_sets = [bus_rule_set(&bus)];
        let result = linter
            .format(LintParams::new("fun main() {}", &rule_sets), |_| {})
            .unwrap();
        orders.push(result.execution_order);
    }
    assert!(orders.windows(2).all(|pair| pair[0] == pair[1]));
}

#[rstest]
#[case::one_line("fun main() {}")]
#[case::nested("fun f(a: Int) {\n    if (a > 0) { g(a) }\n}\n")]
#[case::bom("\u{feff}val x = 1 // note\n")]
#[case::empty("")]
fn test_invocation_counts(#[case] text: &str) {
    let visits = Arc::new(Mutex::new(HashMap::new()));
    let rule = |id, modifiers: &[VisitorModifier]| CountingRule {
        id,
        modifiers: modifiers.iter().copied().collect(),
        visits: Arc::clone(&visits),
    };
    let rule_sets = [RuleSet::new("standard")
        .with_rule(rule("plain", &[]))
        .with_rule(rule("late", &[LATE]))
        .with_rule(rule("root", &[ROOT_ONLY]))
        .with_rule(rule("late-root", &[LATE, ROOT_ONLY]))];

    Linter::new(LinterConfig::new())
        .lint(LintParams::new(text, &rule_sets), |_| {})
        .unwrap();

    let non_root_nodes = ordolint_parser::Parser::parse(&ordolint_parser::TokenParser::new(), text)
        .unwrap()
        .node_count()
        - 1;
    let visits = visits.lock();

    // Every rule sees the root exactly once.
    for id in ["plain", "late", "root", "late-root"] {
        assert_eq!(visits[id].root, 1, "{} root visits", id);
    }
    // Root-only rules never see anything else.
    assert_eq!(visits["root"].other, 0);
    assert_eq!(visits["late-root"].other, 0);
    // Everything else sees each node once.
    assert_eq!(visits["plain"].other, non_root_nodes);
    assert_eq!(visits["late"].other, non_root_nodes);
}

#[test]
fn test_rule_sets_keep_caller_order() {
    let bus: Bus = Arc::default();
    let rule_sets = [
        RuleSet::new("experimental").with_rule(BusRule::new(&bus, "x", &[])),
        RuleSet::new("standard").with_rule(BusRule::new(&bus, "y", &[])),
    ];

    let result = Linter::new(LinterConfig::new())
        .lint(LintParams::new("a", &rule_sets), |_| {})
        .unwrap();

    assert_eq!(result.execution_order, vec!["experimental:x", "y"]);
    assert_eq!(*bus.lock(), vec!["file:x", "file:y", "x", "y"]);
}
