// Run command - replay an event stream through the reporter

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;
use tracing::{debug, info, warn};

use crate::cli::Cli;
use crate::config::{self, Config};
use crate::events;
use crate::report::{JunitSpecReporter, Reporter};

/// Feed every event of `reader` to `reporter`; returns the event count
pub async fn feed_events<R, P>(reporter: &mut P, reader: R) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    P: Reporter + ?Sized,
{
    let mut lines = LinesStream::new(reader.lines());
    let mut line_no = 0;
    let mut count = 0;

    while let Some(line) = lines.next().await {
        line_no += 1;
        let line = line.with_context(|| format!("Failed to read event line {}", line_no))?;
        let Some(event) = events::parse_event_line(&line, line_no)? else {
            continue;
        };

        debug!("Event {} on line {}", event.name(), line_no);
        reporter.dispatch(&event)?;
        count += 1;
    }

    Ok(count)
}

/// Replay `reader` through `reporter`, then close the report.
///
/// The sink is closed even when the stream is aborted by a bad line, so no
/// half-written destination stays open. Returns the number of failed tests.
pub async fn replay_events<R>(mut reporter: JunitSpecReporter, reader: R) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let count = match feed_events(&mut reporter, reader).await {
        Ok(count) => count,
        Err(e) => {
            warn!("Event stream aborted; closing report without a document");
            if let Err(close) = reporter.finish().await {
                warn!("Failed to close report: {}", close);
            }
            return Err(e);
        }
    };
    info!("Processed {} event(s)", count);

    if !reporter.has_ended() {
        warn!("Event stream ended without run_end; no report was written");
    }

    let failures = reporter.finish().await.context("Failed to finalize report")?;
    Ok(failures)
}

/// Build the reporter from the CLI and replay the configured input.
///
/// Returns the number of failed tests.
pub async fn run_report(cli: &Cli, config: Option<&Config>) -> Result<usize> {
    let options = cli.reporter_options(config, std::env::var(config::ENV_JUNIT_REPORT_PATH).ok());
    match &options.output {
        Some(path) => info!("Writing report to {}", path.display()),
        None => info!("Writing report to stdout"),
    }

    match &cli.events {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open event file: {}", path.display()))?;
            let reporter =
                JunitSpecReporter::new(options).context("Failed to prepare report destination")?;
            replay_events(reporter, BufReader::new(file)).await
        }
        None => {
            let reporter =
                JunitSpecReporter::new(options).context("Failed to prepare report destination")?;
            replay_events(reporter, BufReader::new(tokio::io::stdin())).await
        }
    }
}
