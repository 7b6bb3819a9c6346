// Output sinks for the XML report
//
// A sink is opened before the first line is written and closed exactly once
// after the last. `close` hands its outcome to a callback; the reporter's
// completion signal is chained onto that callback.

use crate::error::{ReportError, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Invoked once the sink has released its destination
pub type CloseCallback = Box<dyn FnOnce(io::Result<()>) + Send + 'static>;

pub trait OutputSink: Send {
    /// Write one line; the newline is added by the sink
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Flush and release the destination, then call `on_closed`
    fn close(self: Box<Self>, on_closed: CloseCallback);
}

/// File-backed sink
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileSink {
    /// Create parent directories and open `path` for writing
    pub fn create(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Err(ReportError::Unsupported(format!(
                "{} is a directory, not a file",
                path.display()
            )));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ReportError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = File::create(path).map_err(|source| ReportError::OpenOutput {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Opened report file {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for FileSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", line)
    }

    fn close(self: Box<Self>, on_closed: CloseCallback) {
        let FileSink { path, mut writer } = *self;
        let result = writer.flush().and_then(|_| writer.get_ref().sync_all());
        drop(writer);
        debug!("Closed report file {}", path.display());
        on_closed(result);
    }
}

/// Standard output sink
pub struct StdoutSink {
    out: io::Stdout,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for StdoutSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut out = self.out.lock();
        writeln!(out, "{}", line)
    }

    fn close(self: Box<Self>, on_closed: CloseCallback) {
        on_closed(self.out.lock().flush());
    }
}

/// Open the configured destination, falling back to stdout
pub fn open_sink(output: Option<&Path>) -> Result<Box<dyn OutputSink>> {
    match output {
        Some(path) => Ok(Box::new(FileSink::create(path)?)),
        None => Ok(Box::new(StdoutSink::new())),
    }
}
