// JUnit + spec reporter
//
// Prints the spec listing while events arrive, and on run end rebuilds the
// suite tree, writes the XML report and prints the epilogue. `done` closes
// the sink and only then reports completion.

use super::Reporter;
use crate::config::DEFAULT_SUITE_NAME;
use crate::error::{ReportError, Result};
use crate::events::{SuiteEvent, TestEvent};
use crate::report::collector::EventCollector;
use crate::report::console::{ConsoleReporter, DEFAULT_SLOW_MS, ListingTarget};
use crate::report::junit::{JunitWriter, RunSummary};
use crate::report::sink::{self, OutputSink};
use crate::state::{ErrorDetail, TestState};
use crate::time;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Resolved reporter settings
#[derive(Debug, Clone, PartialEq)]
pub struct ReporterOptions {
    /// Report file; stdout when `None`
    pub output: Option<PathBuf>,
    /// Root `testsuite` name
    pub suite_name: String,
    pub show_diff: bool,
    pub colors: bool,
    pub slow_ms: f64,
}

impl Default for ReporterOptions {
    fn default() -> Self {
        Self {
            output: None,
            suite_name: DEFAULT_SUITE_NAME.to_string(),
            show_diff: true,
            colors: true,
            slow_ms: DEFAULT_SLOW_MS,
        }
    }
}

pub struct JunitSpecReporter {
    options: ReporterOptions,
    collector: EventCollector,
    console: ConsoleReporter,
    sink: Option<Box<dyn OutputSink>>,
    ended: bool,
}

impl JunitSpecReporter {
    /// Open the configured destination and build the reporter.
    ///
    /// Fails before any event is processed when the destination cannot be
    /// prepared. Without an output file the listing moves to stderr.
    pub fn new(options: ReporterOptions) -> Result<Self> {
        let sink = sink::open_sink(options.output.as_deref())?;
        let target = ListingTarget::for_report(options.output.as_deref());
        let console = ConsoleReporter::new(target, options.colors, options.slow_ms);
        Ok(Self::with_parts(options, sink, console))
    }

    /// Build a reporter around an already opened sink and console
    pub fn with_parts(
        options: ReporterOptions,
        sink: Box<dyn OutputSink>,
        console: ConsoleReporter,
    ) -> Self {
        let collector = EventCollector::new(options.suite_name.clone());
        Self {
            options,
            collector,
            console,
            sink: Some(sink),
            ended: false,
        }
    }

    pub fn options(&self) -> &ReporterOptions {
        &self.options
    }

    pub fn collector(&self) -> &EventCollector {
        &self.collector
    }

    /// Number of failed tests observed so far
    pub fn failures(&self) -> usize {
        self.collector.stats().failures
    }

    pub fn has_ended(&self) -> bool {
        self.ended
    }

    fn accepting(&self, event: &str) -> bool {
        if self.ended {
            warn!("Ignoring {} received after run end", event);
        }
        !self.ended
    }

    fn observe(&mut self, test: &TestEvent, state: TestState, error: Option<ErrorDetail>) {
        let id = self.collector.observe_test(test, state, error);
        let depth = self.collector.depth();
        let record = &self.collector.tests()[id.index()];
        match state {
            TestState::Pending => self.console.test_pending(depth, &record.title),
            TestState::Passed => self.console.test_pass(depth, &record.title, record.duration_ms),
            TestState::Failed => self.console.test_fail(depth, &record.title),
        }
    }

    fn output_xml(&mut self, end: DateTime<Utc>) -> Result<()> {
        self.collector.reconstruct();

        let stats = self.collector.stats();
        let summary = RunSummary {
            suite_name: self.options.suite_name.clone(),
            tests: stats.tests(),
            passes: stats.passes,
            failures: stats.failures,
            skipped: stats.skipped(),
            duration_ms: stats.duration_ms(),
            timestamp: time::http_date(end),
        };

        let Some(sink) = self.sink.as_deref_mut() else {
            return Err(ReportError::Unsupported(
                "report sink already closed".to_string(),
            ));
        };

        JunitWriter::new(
            sink,
            self.collector.arena(),
            self.collector.tests(),
            self.options.show_diff,
        )
        .write_report(&summary)?;

        debug!(
            "Wrote report for {} test(s) in {} suite(s)",
            summary.tests,
            self.collector.suites().len()
        );
        Ok(())
    }

    /// Close the sink, then call `on_done` with the failure count.
    ///
    /// For a file destination `on_done` runs only after the file has been
    /// flushed and released.
    pub fn done<F>(mut self, on_done: F)
    where
        F: FnOnce(Result<usize>) + Send + 'static,
    {
        if !self.ended {
            warn!("Closing reporter before run end; no report was written");
        }

        let failures = self.failures();
        match self.sink.take() {
            Some(sink) => sink.close(Box::new(move |result| {
                on_done(result.map(|_| failures).map_err(ReportError::from));
            })),
            None => on_done(Ok(failures)),
        }
    }

    /// Await [`JunitSpecReporter::done`]
    pub async fn finish(self) -> Result<usize> {
        let (tx, rx) = oneshot::channel();
        self.done(move |result| {
            let _ = tx.send(result);
        });

        rx.await.unwrap_or_else(|_| {
            Err(ReportError::Unsupported(
                "report sink dropped its close callback".to_string(),
            ))
        })
    }
}

impl Reporter for JunitSpecReporter {
    fn on_run_begin(&mut self, at: Option<DateTime<Utc>>) {
        if !self.accepting("run_begin") {
            return;
        }
        self.collector.begin_run(at.unwrap_or_else(time::now_utc));
        self.console.run_begin();
    }

    fn on_suite_begin(&mut self, suite: &SuiteEvent) {
        if !self.accepting("suite_begin") {
            return;
        }
        self.collector.begin_suite(suite);
        self.console.suite_begin(self.collector.depth(), &suite.title);
    }

    fn on_suite_end(&mut self, _id: Option<&str>) {
        if !self.accepting("suite_end") {
            return;
        }
        let remaining = self.collector.end_suite();
        self.console.suite_end(remaining);
    }

    fn on_test_pending(&mut self, test: &TestEvent) {
        if self.accepting("test_pending") {
            self.observe(test, TestState::Pending, None);
        }
    }

    fn on_test_pass(&mut self, test: &TestEvent) {
        if self.accepting("test_pass") {
            self.observe(test, TestState::Passed, None);
        }
    }

    fn on_test_fail(&mut self, test: &TestEvent, error: &ErrorDetail) {
        if self.accepting("test_fail") {
            self.observe(test, TestState::Failed, Some(error.clone()));
        }
    }

    fn on_run_end(&mut self, at: Option<DateTime<Utc>>) -> Result<()> {
        if !self.accepting("run_end") {
            return Ok(());
        }
        self.ended = true;

        let end = at.unwrap_or_else(time::now_utc);
        self.collector.end_run(end);
        self.output_xml(end)?;

        let stats = self.collector.stats().clone();
        self.console
            .epilogue(&stats, self.collector.failures(), self.options.show_diff);

        info!(
            "Run finished: {} passing, {} failing, {} pending",
            stats.passes, stats.failures, stats.pending
        );
        Ok(())
    }
}
