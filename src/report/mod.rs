// Report module - lifecycle intake, tree reconstruction and output

pub mod collector;
pub mod console;
pub mod diff;
pub mod hierarchy;
pub mod junit;
pub mod junit_spec;
pub mod sink;
pub mod xml;

use crate::error::Result;
use crate::events::{LifecycleEvent, SuiteEvent, TestEvent};
use crate::state::ErrorDetail;
use chrono::{DateTime, Utc};

pub use collector::EventCollector;
pub use console::{ConsoleReporter, ListingTarget};
pub use junit::{JunitWriter, RunSummary};
pub use junit_spec::{JunitSpecReporter, ReporterOptions};
pub use sink::{CloseCallback, FileSink, OutputSink, StdoutSink};

/// Reporter trait
pub trait Reporter {
    /// Called once before any suite starts
    fn on_run_begin(&mut self, at: Option<DateTime<Utc>>);

    /// Called when a suite starts
    fn on_suite_begin(&mut self, suite: &SuiteEvent);

    /// Called when a suite finishes
    fn on_suite_end(&mut self, id: Option<&str>);

    /// Called for a skipped test
    fn on_test_pending(&mut self, test: &TestEvent);

    /// Called when a test passes
    fn on_test_pass(&mut self, test: &TestEvent);

    /// Called when a test fails
    fn on_test_fail(&mut self, test: &TestEvent, error: &ErrorDetail);

    /// Called when the entire run finishes
    fn on_run_end(&mut self, at: Option<DateTime<Utc>>) -> Result<()>;

    /// Route one event to its handler
    fn dispatch(&mut self, event: &LifecycleEvent) -> Result<()> {
        match event {
            LifecycleEvent::RunBegin { at } => self.on_run_begin(*at),
            LifecycleEvent::SuiteBegin(suite) => self.on_suite_begin(suite),
            LifecycleEvent::SuiteEnd { id } => self.on_suite_end(id.as_deref()),
            LifecycleEvent::TestPending { test } => self.on_test_pending(test),
            LifecycleEvent::TestPass { test } => self.on_test_pass(test),
            LifecycleEvent::TestFail { test, error } => self.on_test_fail(test, error),
            LifecycleEvent::RunEnd { at } => return self.on_run_end(*at),
        }
        Ok(())
    }
}
