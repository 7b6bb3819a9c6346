use crate::state::ErrorDetail;
use dissimilar::{Chunk, diff};
use serde_json::Value;
use std::fmt::Write;

/// Whether a failure carries values worth diffing.
///
/// Both values must be present and of the same JSON kind, and the error
/// must not opt out.
pub fn should_show_diff(err: &ErrorDetail) -> bool {
    if err.show_diff == Some(false) {
        return false;
    }

    match (&err.actual, &err.expected) {
        (Some(actual), Some(expected)) => same_kind(actual, expected),
        _ => false,
    }
}

fn same_kind(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Generates a plain-text diff between an actual and an expected value.
///
/// Text only in `actual` is wrapped as `[-text-]`, text only in `expected`
/// as `{+text+}`.
pub fn generate_diff(actual: &Value, expected: &Value) -> String {
    let actual_str = render(actual);
    let expected_str = render(expected);

    let mut output = String::new();
    let _ = writeln!(output, "- actual + expected");
    let _ = writeln!(output);

    for chunk in diff(&actual_str, &expected_str) {
        let _ = match chunk {
            Chunk::Equal(text) => write!(output, "{}", text),
            Chunk::Delete(text) => write!(output, "[-{}-]", text),
            Chunk::Insert(text) => write!(output, "{{+{}+}}", text),
        };
    }

    output
}

/// Diff for a failure, or `None` when it has nothing comparable
pub fn failure_diff(err: &ErrorDetail) -> Option<String> {
    if !should_show_diff(err) {
        return None;
    }
    match (&err.actual, &err.expected) {
        (Some(actual), Some(expected)) => Some(generate_diff(actual, expected)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generate_diff_marks_changes() {
        let diff = generate_diff(&json!("expected 3"), &json!("expected 2"));

        assert!(diff.starts_with("- actual + expected\n\n"));
        assert!(diff.contains("[-3-]"));
        assert!(diff.contains("{+2+}"));
        assert!(diff.contains("expected "));
    }

    #[test]
    fn test_generate_diff_objects() {
        let actual = json!({ "name": "Bob", "age": 30 });
        let expected = json!({ "name": "Alice", "age": 30 });

        let diff = generate_diff(&actual, &expected);
        assert!(diff.contains("Bob") || diff.contains("[-"));
        assert!(diff.contains("\"age\": 30"));
    }

    #[test]
    fn test_should_show_diff_requires_same_kind() {
        let same = ErrorDetail::new("x").with_values(json!(1), json!(2));
        let mixed = ErrorDetail::new("x").with_values(json!(1), json!("2"));
        let missing = ErrorDetail::new("x");

        assert!(should_show_diff(&same));
        assert!(!should_show_diff(&mixed));
        assert!(!should_show_diff(&missing));
    }

    #[test]
    fn test_should_show_diff_respects_opt_out() {
        let mut err = ErrorDetail::new("x").with_values(json!([1]), json!([2]));
        err.show_diff = Some(false);

        assert!(!should_show_diff(&err));
        assert!(failure_diff(&err).is_none());
    }
}
