// CLI argument definitions using Clap

use crate::config::{self, Config};
use crate::report::ReporterOptions;
use clap::Parser;
use std::path::PathBuf;

/// JUnit XML and spec reporter for test lifecycle event streams
#[derive(Parser, Debug)]
#[command(name = "junit-spec")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Turn a lifecycle event stream into a JUnit XML report", long_about = None)]
pub struct Cli {
    /// Newline-delimited JSON event file (reads stdin when omitted)
    #[arg(value_name = "EVENTS")]
    pub events: Option<PathBuf>,

    /// Output file for the XML report (stdout when omitted; the listing then goes to stderr)
    #[arg(short = 'o', long, value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,

    /// Name of the root testsuite element
    #[arg(long, value_name = "NAME")]
    pub suite_name: Option<String>,

    /// Do not render actual/expected diffs
    #[arg(long, default_value_t = false)]
    pub no_diff: bool,

    /// Slow test threshold in milliseconds
    #[arg(long, value_name = "MS")]
    pub slow: Option<u64>,

    /// Enable verbose debug output
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(short = 'c', long, global = true, default_value_t = false)]
    pub no_color: bool,

    /// Show current configuration and exit
    #[arg(long, default_value_t = false)]
    pub config: bool,

    /// Create default configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub init_config: Option<PathBuf>,

    /// Print shell completion (bash, zsh, fish, powershell)
    #[arg(long, value_name = "SHELL_TYPE", value_parser = ["bash", "zsh", "fish", "powershell"])]
    pub completion: Option<String>,
}

impl Cli {
    /// Merge flags over the config file over built-in defaults.
    ///
    /// `env_output` is the value of the report path environment variable and
    /// takes precedence over both flag and file.
    pub fn reporter_options(
        &self,
        config: Option<&Config>,
        env_output: Option<String>,
    ) -> ReporterOptions {
        let defaults = Config::default();
        let config = config.unwrap_or(&defaults);

        let output = self
            .output
            .clone()
            .or_else(|| config.report.output.as_ref().map(PathBuf::from));

        ReporterOptions {
            output: config::resolve_output_path(output, env_output),
            suite_name: self
                .suite_name
                .clone()
                .unwrap_or_else(|| config.report.suite_name.clone()),
            show_diff: !self.no_diff && config.report.show_diff,
            colors: !self.no_color && config.console.color,
            slow_ms: self.slow.unwrap_or(config.console.slow_ms) as f64,
        }
    }
}
