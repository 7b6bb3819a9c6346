// State module - records collected during one run
// Flat test records, the suite arena and the run counters

pub mod metrics;
pub mod result;
pub mod suite;

pub use metrics::RunStats;
pub use result::{ErrorDetail, TestId, TestRecord};
pub use suite::{SuiteArena, SuiteId, SuiteNode};

use serde::{Deserialize, Serialize};

/// Final state of an observed test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestState {
    Pending,
    Passed,
    Failed,
}

impl TestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestState::Pending => "pending",
            TestState::Passed => "passed",
            TestState::Failed => "failed",
        }
    }
}
