//! Unit tests for error rendering and collapsing.

use rstest::rstest;

use super::{OverlayError, OverrideFailures};

fn coercion(key: &str, value: &str) -> OverlayError {
    let source = std::io::Error::other("not a number");
    OverlayError::coercion(key, "max-retries", value, source)
}

#[test]
fn coercion_message_names_key_and_value() {
    let message = coercion("MYAPP_MAX_RETRIES", "abc").to_string();
    assert_eq!(
        message,
        "invalid value \"abc\" for MYAPP_MAX_RETRIES: not a number"
    );
}

#[test]
fn collapse_is_none_without_failures() {
    assert!(OverrideFailures::collapse(Vec::new()).is_none());
}

#[test]
fn single_failure_is_reported_alone() {
    let outcome = OverrideFailures::collapse(vec![coercion("A", "x")]);
    assert!(
        matches!(outcome, Some(OverlayError::Coercion { ref key, .. }) if key == "A"),
        "expected Coercion, got {outcome:?}"
    );
}

#[rstest]
#[case(2)]
#[case(3)]
fn several_failures_are_numbered(#[case] count: usize) {
    let failures = (0..count)
        .map(|i| coercion(&format!("K{i}"), "x"))
        .collect();
    let Some(OverlayError::Aggregate(collected)) = OverrideFailures::collapse(failures) else {
        panic!("expected Aggregate");
    };
    assert_eq!(collected.as_slice().len(), count);
    let display = collected.to_string();
    assert!(display.starts_with("1: invalid value \"x\" for K0"), "got {display}");
    assert!(display.contains(&format!("\n{count}: ")), "got {display}");
    assert!(!display.ends_with('\n'));
}

#[test]
fn aggregate_message_lists_every_key() {
    let err = OverrideFailures::collapse(vec![coercion("A", "x"), coercion("B", "y")]);
    let message = err.map(|e| e.to_string()).unwrap_or_default();
    assert!(message.starts_with("multiple environment override errors:\n1: "));
    assert!(message.contains("for A") && message.contains("for B"), "got {message}");
}
