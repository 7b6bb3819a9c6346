// Tests for the lifecycle event wire format

use junit_spec::events::{LifecycleEvent, SuiteEvent, TestEvent, parse_event_line};
use junit_spec::state::{ErrorDetail, TestState};
use serde_json::json;

#[test]
fn test_parse_full_failure_event() {
    // Arrange
    let line = json!({
        "event": "test_fail",
        "test": {
            "title": "adds",
            "full_title": "Math adds",
            "parent": "s1",
            "duration": 5
        },
        "error": {
            "message": "expected 2 got 3",
            "type": "AssertionError",
            "actual": 3,
            "expected": 2,
            "stack": "AssertionError: expected 2 got 3"
        }
    })
    .to_string();

    // Act
    let event = parse_event_line(&line, 1).expect("parse").expect("event");

    // Assert
    match event {
        LifecycleEvent::TestFail { test, error } => {
            assert_eq!(test.full_title.as_deref(), Some("Math adds"));
            assert_eq!(test.parent.as_deref(), Some("s1"));
            assert_eq!(test.duration, Some(5.0));
            assert_eq!(error.kind.as_deref(), Some("AssertionError"));
            assert_eq!(error.actual, Some(json!(3)));
            assert_eq!(error.expected, Some(json!(2)));
        }
        other => panic!("unexpected event {}", other.name()),
    }
}

#[test]
fn test_run_events_accept_timestamps() {
    // Arrange & Act
    let begin = parse_event_line(r#"{"event":"run_begin","at":"2026-10-19T12:00:00Z"}"#, 1)
        .expect("parse")
        .expect("event");
    let end = parse_event_line(r#"{"event":"run_end"}"#, 2)
        .expect("parse")
        .expect("event");

    // Assert
    match begin {
        LifecycleEvent::RunBegin { at } => assert!(at.is_some()),
        other => panic!("unexpected event {}", other.name()),
    }
    assert_eq!(end, LifecycleEvent::RunEnd { at: None });
}

#[test]
fn test_serialized_events_parse_back() {
    // Arrange
    let events = vec![
        LifecycleEvent::SuiteBegin(SuiteEvent {
            id: "s1".to_string(),
            title: "Math".to_string(),
            parent: None,
        }),
        LifecycleEvent::TestFail {
            test: TestEvent::new("adds").in_suite("s1").with_duration(5.0),
            error: ErrorDetail::new("boom").with_kind("Error"),
        },
    ];

    // Act
    let lines: Vec<String> = events
        .iter()
        .map(|e| serde_json::to_string(e).expect("serialize"))
        .collect();

    // Assert
    assert!(lines[0].contains(r#""event":"suite_begin""#));
    assert!(!lines[0].contains("parent"));
    for (i, line) in lines.iter().enumerate() {
        let parsed = parse_event_line(line, i + 1).expect("parse").expect("event");
        assert_eq!(parsed, events[i]);
    }
}

#[test]
fn test_unknown_event_is_rejected() {
    let err = parse_event_line(r#"{"event":"hook_begin"}"#, 12).expect_err("unknown event");
    assert!(err.to_string().contains("line 12"));
}

#[test]
fn test_state_names() {
    assert_eq!(TestState::Pending.as_str(), "pending");
    assert_eq!(TestState::Passed.as_str(), "passed");
    assert_eq!(TestState::Failed.as_str(), "failed");
    assert_eq!(
        serde_json::to_string(&TestState::Failed).expect("serialize"),
        "\"failed\""
    );
}
