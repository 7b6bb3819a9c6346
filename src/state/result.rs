// Test records

use crate::state::{SuiteId, TestState};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Position of a test in the flat, arrival-ordered test list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TestId(pub(crate) usize);

impl TestId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Failure detail attached to a failed test
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: String,

    /// Error class name, emitted as the `type` attribute
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,

    /// Per-error opt out of diff rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_diff: Option<bool>,
}

impl ErrorDetail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_values(mut self, actual: Value, expected: Value) -> Self {
        self.actual = Some(actual);
        self.expected = Some(expected);
        self
    }
}

/// One observed test execution.
///
/// `parent` is a lookup handle into the suite arena. It never owns the suite
/// and may be `None` for tests declared directly on the run.
#[derive(Debug, Clone, PartialEq)]
pub struct TestRecord {
    pub title: String,
    pub full_title: String,
    pub state: TestState,
    /// Milliseconds; NaN when the engine did not report a duration
    pub duration_ms: f64,
    pub error: Option<ErrorDetail>,
    pub parent: Option<SuiteId>,
}

impl TestRecord {
    pub fn is_failed(&self) -> bool {
        self.state == TestState::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_detail_accepts_type_alias() {
        let err: ErrorDetail = serde_json::from_value(json!({
            "message": "boom",
            "type": "AssertionError"
        }))
        .unwrap();
        assert_eq!(err.message, "boom");
        assert_eq!(err.kind.as_deref(), Some("AssertionError"));
        assert!(err.stack.is_none());
    }

    #[test]
    fn test_error_detail_builders() {
        let err = ErrorDetail::new("expected 2 got 3")
            .with_kind("AssertionError")
            .with_stack("at adds (math.js:1:1)")
            .with_values(json!(3), json!(2));
        assert_eq!(err.actual, Some(json!(3)));
        assert_eq!(err.expected, Some(json!(2)));
        assert_eq!(err.stack.as_deref(), Some("at adds (math.js:1:1)"));
    }

    #[test]
    fn test_record_is_failed() {
        let record = TestRecord {
            title: "adds".to_string(),
            full_title: "Math adds".to_string(),
            state: TestState::Failed,
            duration_ms: 5.0,
            error: None,
            parent: None,
        };
        assert!(record.is_failed());
    }
}
