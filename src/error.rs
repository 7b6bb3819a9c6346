// Error types for report generation

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or writing a report.
///
/// Construction-time variants (`CreateDir`, `OpenOutput`, `Unsupported`) are
/// fatal: no events are processed once one of them is returned.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to create report directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open report file {}: {source}", path.display())]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unsupported report destination: {0}")]
    Unsupported(String),

    #[error("failed to write report: {0}")]
    Write(#[from] io::Error),

    #[error("invalid lifecycle event on line {line}: {source}")]
    Event {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ReportError>;
