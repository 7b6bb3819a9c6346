// Console reporter - spec-style listing and run epilogue

use crate::report::diff;
use crate::state::{RunStats, TestRecord};
use console::Style;
use std::io::{self, Write};
use std::path::Path;

pub const DEFAULT_SLOW_MS: f64 = 75.0;

const OK_SYMBOL: &str = "✓";

/// How a passing test compares to the slow threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    Fast,
    Medium,
    Slow,
}

impl Speed {
    pub fn classify(duration_ms: f64, slow_ms: f64) -> Self {
        if duration_ms > slow_ms {
            Speed::Slow
        } else if duration_ms > slow_ms / 2.0 {
            Speed::Medium
        } else {
            Speed::Fast
        }
    }

    fn style(self) -> Style {
        match self {
            Speed::Fast => Style::new().dim(),
            Speed::Medium => Style::new().yellow(),
            Speed::Slow => Style::new().red(),
        }
    }
}

/// Stream the spec listing is printed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingTarget {
    Stdout,
    Stderr,
}

impl ListingTarget {
    /// Stdout is left to the XML document when the report has no file
    pub fn for_report(output: Option<&Path>) -> Self {
        match output {
            Some(_) => ListingTarget::Stdout,
            None => ListingTarget::Stderr,
        }
    }
}

/// Spec listing printed while events arrive
pub struct ConsoleReporter {
    out: Box<dyn Write + Send>,
    colors: bool,
    slow_ms: f64,
    failure_no: usize,
}

impl ConsoleReporter {
    pub fn new(target: ListingTarget, colors: bool, slow_ms: f64) -> Self {
        let out: Box<dyn Write + Send> = match target {
            ListingTarget::Stdout => Box::new(io::stdout()),
            ListingTarget::Stderr => Box::new(io::stderr()),
        };
        Self::with_writer(out, colors, slow_ms)
    }

    pub fn with_writer(out: Box<dyn Write + Send>, colors: bool, slow_ms: f64) -> Self {
        Self {
            out,
            colors,
            slow_ms,
            failure_no: 0,
        }
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.colors {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
    }

    fn indent(depth: usize) -> String {
        "  ".repeat(depth)
    }

    pub fn run_begin(&mut self) {
        self.line("");
    }

    pub fn suite_begin(&mut self, depth: usize, title: &str) {
        let text = format!("{}{}", Self::indent(depth), title);
        let painted = self.paint(Style::new().bold(), &text);
        self.line(&painted);
    }

    /// A blank line separates top-level suites
    pub fn suite_end(&mut self, remaining_depth: usize) {
        if remaining_depth == 0 {
            self.line("");
        }
    }

    pub fn test_pending(&mut self, depth: usize, title: &str) {
        let text = format!("  - {}", title);
        let painted = self.paint(Style::new().cyan(), &text);
        self.line(&format!("{}{}", Self::indent(depth), painted));
    }

    pub fn test_pass(&mut self, depth: usize, title: &str, duration_ms: f64) {
        let check = self.paint(Style::new().green(), &format!("  {}", OK_SYMBOL));
        let title = self.paint(Style::new().dim(), &format!(" {}", title));
        let mut text = format!("{}{}{}", Self::indent(depth), check, title);

        let speed = Speed::classify(duration_ms, self.slow_ms);
        if speed != Speed::Fast {
            text.push_str(&self.paint(speed.style(), &format!(" ({}ms)", duration_ms)));
        }
        self.line(&text);
    }

    pub fn test_fail(&mut self, depth: usize, title: &str) {
        self.failure_no += 1;
        let text = format!("  {}) {}", self.failure_no, title);
        let painted = self.paint(Style::new().red(), &text);
        self.line(&format!("{}{}", Self::indent(depth), painted));
    }

    /// Print totals followed by the detail of every failure
    pub fn epilogue<'a>(
        &mut self,
        stats: &RunStats,
        failures: impl Iterator<Item = &'a TestRecord>,
        show_diff: bool,
    ) {
        let duration = stats.duration_ms();
        let duration = if duration.is_nan() { 0.0 } else { duration };

        self.line("");
        let passing = self.paint(Style::new().green(), &format!("{} passing", stats.passes));
        let took = self.paint(Style::new().dim(), &format!(" ({}ms)", duration));
        self.line(&format!("  {}{}", passing, took));

        if stats.pending > 0 {
            let pending = self.paint(Style::new().cyan(), &format!("{} pending", stats.pending));
            self.line(&format!("  {}", pending));
        }

        if stats.failures > 0 {
            let failing = self.paint(Style::new().red(), &format!("{} failing", stats.failures));
            self.line(&format!("  {}", failing));
            self.line("");

            for (i, test) in failures.enumerate() {
                self.failure_detail(i + 1, test, show_diff);
            }
        }

        self.line("");
        let _ = self.out.flush();
    }

    fn failure_detail(&mut self, number: usize, test: &TestRecord, show_diff: bool) {
        self.line(&format!("  {}) {}:", number, test.full_title));

        let Some(err) = &test.error else {
            self.line("");
            return;
        };

        let kind = err.kind.as_deref().unwrap_or("Error");
        let message = self.paint(Style::new().red(), &format!("{}: {}", kind, err.message));
        self.line(&format!("     {}", message));

        if show_diff && let Some(diff) = diff::failure_diff(err) {
            self.line("");
            for line in diff.lines() {
                self.line(&format!("      {}", line));
            }
        }

        if let Some(stack) = &err.stack {
            let stack = self.paint(Style::new().dim(), stack);
            self.line(&format!("  {}", stack));
        }
        self.line("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ErrorDetail, TestState};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn reporter() -> (ConsoleReporter, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let reporter = ConsoleReporter::with_writer(Box::new(buffer.clone()), false, DEFAULT_SLOW_MS);
        (reporter, buffer)
    }

    #[test]
    fn test_speed_classification() {
        assert_eq!(Speed::classify(10.0, 75.0), Speed::Fast);
        assert_eq!(Speed::classify(37.5, 75.0), Speed::Fast);
        assert_eq!(Speed::classify(50.0, 75.0), Speed::Medium);
        assert_eq!(Speed::classify(76.0, 75.0), Speed::Slow);
        assert_eq!(Speed::classify(f64::NAN, 75.0), Speed::Fast);
    }

    #[test]
    fn test_listing_leaves_stdout_to_report() {
        assert_eq!(ListingTarget::for_report(None), ListingTarget::Stderr);
        assert_eq!(
            ListingTarget::for_report(Some(Path::new("reports/junit.xml"))),
            ListingTarget::Stdout
        );
    }

    #[test]
    fn test_spec_listing() {
        let (mut console, buffer) = reporter();
        console.run_begin();
        console.suite_begin(1, "Math");
        console.test_pass(1, "adds", 2.0);
        console.test_pass(1, "multiplies", 120.0);
        console.test_pending(1, "divides");
        console.test_fail(1, "subtracts");
        console.suite_end(0);

        let text = buffer.text();
        assert!(text.contains("\n  Math\n"));
        assert!(text.contains("    ✓ adds\n"));
        assert!(text.contains("    ✓ multiplies (120ms)\n"));
        assert!(text.contains("    - divides\n"));
        assert!(text.contains("    1) subtracts\n"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_epilogue_lists_failures() {
        let (mut console, buffer) = reporter();
        let stats = RunStats {
            passes: 2,
            failures: 1,
            pending: 1,
            ..RunStats::default()
        };
        let failed = TestRecord {
            title: "adds".to_string(),
            full_title: "Math adds".to_string(),
            state: TestState::Failed,
            duration_ms: 5.0,
            error: Some(
                ErrorDetail::new("expected 2 got 3")
                    .with_kind("AssertionError")
                    .with_stack("at adds (math.rs:3)"),
            ),
            parent: None,
        };

        console.epilogue(&stats, std::iter::once(&failed), true);

        let text = buffer.text();
        assert!(text.contains("  2 passing (0ms)"));
        assert!(text.contains("  1 pending"));
        assert!(text.contains("  1 failing"));
        assert!(text.contains("  1) Math adds:"));
        assert!(text.contains("     AssertionError: expected 2 got 3"));
        assert!(text.contains("at adds (math.rs:3)"));
    }
}
