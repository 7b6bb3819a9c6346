// Run counters

use crate::state::TestState;
use crate::time;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counters and wall-clock bounds of one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub passes: usize,
    pub failures: usize,
    pub pending: usize,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl RunStats {
    /// Count one observed test
    pub fn record(&mut self, state: TestState) {
        match state {
            TestState::Passed => self.passes += 1,
            TestState::Failed => self.failures += 1,
            TestState::Pending => self.pending += 1,
        }
    }

    /// Total observed tests, pending included
    pub fn tests(&self) -> usize {
        self.passes + self.failures + self.pending
    }

    /// Tests that neither passed nor failed
    pub fn skipped(&self) -> usize {
        self.tests()
            .saturating_sub(self.failures + self.passes)
    }

    /// Run duration in milliseconds, NaN until both bounds are known
    pub fn duration_ms(&self) -> f64 {
        match (self.start, self.end) {
            (Some(start), Some(end)) => time::elapsed_ms(start, end),
            _ => f64::NAN,
        }
    }
}
