pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod report;
pub mod state;
pub mod time;

pub use error::ReportError;
pub use events::{LifecycleEvent, SuiteEvent, TestEvent};
pub use report::{JunitSpecReporter, Reporter, ReporterOptions};
