// JUnit writer - serializes the reconstructed suite tree as XML

use crate::report::diff;
use crate::report::sink::OutputSink;
use crate::report::xml::{cdata, escape, seconds, tag};
use crate::state::{SuiteArena, SuiteId, TestId, TestRecord};
use std::io;

/// Root-level figures of a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub suite_name: String,
    pub tests: usize,
    pub passes: usize,
    pub failures: usize,
    pub skipped: usize,
    pub duration_ms: f64,
    pub timestamp: String,
}

/// Writes one report into a sink.
///
/// The traversal is depth-first and pre-order. A suite that owns child
/// suites only emits those; its own tests are written only when it has no
/// child suites.
pub struct JunitWriter<'a> {
    sink: &'a mut dyn OutputSink,
    arena: &'a SuiteArena,
    tests: &'a [TestRecord],
    show_diff: bool,
    timestamp: String,
}

impl<'a> JunitWriter<'a> {
    pub fn new(
        sink: &'a mut dyn OutputSink,
        arena: &'a SuiteArena,
        tests: &'a [TestRecord],
        show_diff: bool,
    ) -> Self {
        Self {
            sink,
            arena,
            tests,
            show_diff,
            timestamp: String::new(),
        }
    }

    fn write(&mut self, line: &str) -> io::Result<()> {
        self.sink.write_line(line)
    }

    /// Write the whole document, root element included.
    ///
    /// The root carries `failures="0"` and the real failure count under
    /// `errors`. Consumers of these reports read that split, so it stays.
    pub fn write_report(&mut self, summary: &RunSummary) -> io::Result<()> {
        self.timestamp = summary.timestamp.clone();

        let open = tag(
            "testsuite",
            &[
                ("name", Some(summary.suite_name.clone())),
                ("tests", Some(summary.tests.to_string())),
                ("failures", Some("0".to_string())),
                ("errors", Some(summary.failures.to_string())),
                ("skipped", Some(summary.skipped.to_string())),
                ("timestamp", Some(self.timestamp.clone())),
                ("time", Some(seconds(summary.duration_ms))),
            ],
            false,
        );
        self.write(&open)?;

        self.write_children(SuiteId::ROOT)?;

        self.write("</testsuite>")
    }

    fn write_children(&mut self, id: SuiteId) -> io::Result<()> {
        let arena = self.arena;
        let node = arena.get(id);
        if !node.child_suites().is_empty() {
            for &child in node.child_suites() {
                self.write_suite(child)?;
            }
        } else {
            for &test in node.child_tests() {
                self.write_test(test)?;
            }
        }
        Ok(())
    }

    fn write_suite(&mut self, id: SuiteId) -> io::Result<()> {
        let arena = self.arena;
        let node = arena.get(id);
        let open = tag(
            "testsuite",
            &[
                ("name", Some(node.title.clone())),
                ("tests", Some(node.child_tests().len().to_string())),
                ("failures", Some(node.failures.to_string())),
                ("timestamp", Some(self.timestamp.clone())),
                ("time", Some(seconds(node.duration_ms))),
            ],
            false,
        );
        self.write(&open)?;

        self.write_children(id)?;

        self.write("</testsuite>")
    }

    fn write_test(&mut self, id: TestId) -> io::Result<()> {
        let tests = self.tests;
        let test = &tests[id.index()];
        let open = tag(
            "testcase",
            &[
                ("name", Some(test.full_title.clone())),
                ("classname", Some(test.title.clone())),
                ("time", Some(seconds(test.duration_ms))),
            ],
            false,
        );
        self.write(&open)?;

        if test.is_failed() {
            self.write_failure(test)?;
        }

        self.write("</testcase>")
    }

    fn write_failure(&mut self, test: &TestRecord) -> io::Result<()> {
        let err = test.error.clone().unwrap_or_default();
        let diff = if self.show_diff {
            diff::failure_diff(&err)
                .map(|d| format!("\n{}", d))
                .unwrap_or_default()
        } else {
            String::new()
        };

        let open = tag(
            "failure",
            &[
                ("message", Some(escape(&err.message))),
                ("type", err.kind.clone()),
            ],
            false,
        );
        self.write(&open)?;

        let stack = err.stack.as_deref().unwrap_or_default();
        self.write(&cdata(&format!("{}\n{}\n{}", err.message, diff, stack)))?;

        self.write("</failure>")
    }
}
