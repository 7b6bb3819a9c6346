use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Default filter directives, quiet unless verbose
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "junit_spec=debug,warn"
    } else {
        "junit_spec=warn,error"
    }
}

/// Log line format: `EMOJI LEVEL [HH:MM:SS]: message`.
///
/// Debug and trace lines also carry the emitting module.
pub struct CustomFormatter;

impl<S, N> FormatEvent<S, N> for CustomFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let level = *metadata.level();
        let timestamp = Local::now().format("%H:%M:%S");

        let (emoji, level_str) = match level {
            Level::TRACE => ("🔬", "TRACE"),
            Level::DEBUG => ("🐛", "DEBUG"),
            Level::INFO => ("ℹ️ ", "INFO"),
            Level::WARN => ("⚠️ ", "WARN"),
            Level::ERROR => ("❌", "ERROR"),
        };

        write!(writer, "{} {} [{}]: ", emoji, level_str, timestamp)?;
        if level >= Level::DEBUG {
            write!(writer, "{}: ", metadata.target())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Install the global subscriber, logging to stderr
pub fn init(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .event_format(CustomFormatter)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
