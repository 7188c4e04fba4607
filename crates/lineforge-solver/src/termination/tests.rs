//! Tests for termination conditions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::*;

fn started_scope() -> SolveScope {
    let mut scope = SolveScope::new();
    scope.start_solving();
    scope
}

#[test]
fn test_time_termination_not_started() {
    let scope = SolveScope::new();
    let term = TimeTermination::millis(0);
    assert!(!term.is_terminated(&scope));
}

#[test]
fn test_time_termination_zero_limit() {
    let scope = started_scope();
    assert!(TimeTermination::new(Duration::ZERO).is_terminated(&scope));
    assert!(!TimeTermination::seconds(3_600).is_terminated(&scope));
}

#[test]
fn test_node_count_termination() {
    let mut scope = started_scope();
    let term = NodeCountTermination::new(3);

    scope.increment_nodes();
    scope.increment_nodes();
    assert!(!term.is_terminated(&scope));
    scope.increment_nodes();
    assert!(term.is_terminated(&scope));
}

#[test]
fn test_external_termination() {
    let flag = Arc::new(AtomicBool::new(false));
    let scope = SolveScope::new().with_terminate_flag(flag.clone());

    assert!(!ExternalTermination.is_terminated(&scope));
    flag.store(true, Ordering::SeqCst);
    assert!(ExternalTermination.is_terminated(&scope));
}

#[test]
fn test_or_termination_any_fires() {
    let mut scope = started_scope();
    let term = OrTermination::new((TimeTermination::seconds(3_600), NodeCountTermination::new(1)));

    assert!(!term.is_terminated(&scope));
    scope.increment_nodes();
    assert!(term.is_terminated(&scope));
}

#[test]
fn test_optional_termination() {
    let mut scope = started_scope();
    scope.increment_nodes();

    let absent: Option<NodeCountTermination> = None;
    assert!(!absent.is_terminated(&scope));
    assert!(Some(NodeCountTermination::new(1)).is_terminated(&scope));
}
