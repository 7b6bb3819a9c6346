// Lifecycle events emitted by a test engine
//
// Wire format: newline-delimited JSON, one object per line, tagged by
// `event`.

use crate::error::{ReportError, Result};
use crate::state::ErrorDetail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Suite announced by a `suite_begin` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteEvent {
    pub id: String,
    pub title: String,
    /// Id of the enclosing suite; absent for top-level suites
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Test carried by `test_pending`, `test_pass` and `test_fail`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestEvent {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl TestEvent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            full_title: None,
            parent: None,
            duration: None,
        }
    }

    pub fn in_suite(mut self, suite_id: impl Into<String>) -> Self {
        self.parent = Some(suite_id.into());
        self
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration = Some(duration_ms);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    RunBegin {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<DateTime<Utc>>,
    },
    SuiteBegin(SuiteEvent),
    SuiteEnd {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    TestPending {
        test: TestEvent,
    },
    TestPass {
        test: TestEvent,
    },
    TestFail {
        test: TestEvent,
        #[serde(default)]
        error: ErrorDetail,
    },
    RunEnd {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<DateTime<Utc>>,
    },
}

impl LifecycleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::RunBegin { .. } => "run_begin",
            LifecycleEvent::SuiteBegin(_) => "suite_begin",
            LifecycleEvent::SuiteEnd { .. } => "suite_end",
            LifecycleEvent::TestPending { .. } => "test_pending",
            LifecycleEvent::TestPass { .. } => "test_pass",
            LifecycleEvent::TestFail { .. } => "test_fail",
            LifecycleEvent::RunEnd { .. } => "run_end",
        }
    }
}

/// Parse one NDJSON line. Blank lines yield `None`.
pub fn parse_event_line(line: &str, line_no: usize) -> Result<Option<LifecycleEvent>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|source| ReportError::Event {
            line: line_no,
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suite_begin() {
        let event = parse_event_line(
            r#"{"event":"suite_begin","id":"s2","title":"Inner","parent":"s1"}"#,
            1,
        )
        .unwrap();

        assert_eq!(
            event,
            Some(LifecycleEvent::SuiteBegin(SuiteEvent {
                id: "s2".to_string(),
                title: "Inner".to_string(),
                parent: Some("s1".to_string()),
            }))
        );
    }

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(parse_event_line("   ", 4).unwrap(), None);
    }

    #[test]
    fn test_parse_error_carries_line_number() {
        let err = parse_event_line(r#"{"event":"test_explode"}"#, 7).unwrap_err();
        assert!(matches!(err, ReportError::Event { line: 7, .. }));
        assert!(err.to_string().contains("line 7"));
    }

    #[test]
    fn test_fail_without_error_defaults() {
        let event = parse_event_line(r#"{"event":"test_fail","test":{"title":"adds"}}"#, 1)
            .unwrap()
            .unwrap();

        match event {
            LifecycleEvent::TestFail { test, error } => {
                assert_eq!(test.title, "adds");
                assert!(test.duration.is_none());
                assert_eq!(error, ErrorDetail::default());
            }
            other => panic!("unexpected event {}", other.name()),
        }
    }
}
