// Configuration file handling

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output file for the XML report (stdout when unset)
    #[serde(default)]
    pub output: Option<String>,

    /// Name of the root testsuite element
    #[serde(default = "default_suite_name")]
    pub suite_name: String,

    /// Render actual/expected diffs in failure blocks
    #[serde(default = "default_show_diff")]
    pub show_diff: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: None,
            suite_name: default_suite_name(),
            show_diff: default_show_diff(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Enable colored spec output
    #[serde(default = "default_color")]
    pub color: bool,

    /// Tests slower than this (ms) are flagged in the listing
    #[serde(default = "default_slow_ms")]
    pub slow_ms: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            slow_ms: default_slow_ms(),
        }
    }
}

// Default values
pub const ENV_JUNIT_REPORT_PATH: &str = "JUNIT_REPORT_PATH";
pub const DEFAULT_SUITE_NAME: &str = "Test Run";
pub const CONFIG_FILE_NAME: &str = ".junitspecrc.toml";

pub fn default_suite_name() -> String {
    String::from(DEFAULT_SUITE_NAME)
}

fn default_show_diff() -> bool {
    true
}

fn default_color() -> bool {
    true
}

fn default_slow_ms() -> u64 {
    75
}

/// Pick the report path: the environment value wins, the explicit option
/// applies only when the variable is absent or empty.
pub fn resolve_output_path(option: Option<PathBuf>, env_value: Option<String>) -> Option<PathBuf> {
    env_value
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or(option)
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        // Check locations in order:
        // 1. .junitspecrc.toml (current directory)
        // 2. ~/.junitspecrc.toml (home directory)

        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(CONFIG_FILE_NAME));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(CONFIG_FILE_NAME));
        }

        paths
            .iter()
            .find(|path| path.exists())
            .and_then(|path| Self::load_from_file(path))
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    /// Generate default configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[report]
output = "reports/junit.xml"
suite_name = "Integration"
show_diff = false

[console]
color = false
slow_ms = 200
"#;

        let config = Config::parse(toml).expect("Failed to parse config");
        assert_eq!(config.report.output.as_deref(), Some("reports/junit.xml"));
        assert_eq!(config.report.suite_name, "Integration");
        assert!(!config.report.show_diff);
        assert!(!config.console.color);
        assert_eq!(config.console.slow_ms, 200);
    }

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let config = Config::parse("[report]\nsuite_name = \"Smoke\"\n").expect("Failed to parse");
        assert_eq!(config.report.suite_name, "Smoke");
        assert!(config.report.output.is_none());
        assert!(config.report.show_diff);
        assert_eq!(config.console.slow_ms, 75);
    }

    #[test]
    fn test_resolve_output_path_precedence() {
        let option = Some(PathBuf::from("option.xml"));

        assert_eq!(
            resolve_output_path(option.clone(), Some("env.xml".to_string())),
            Some(PathBuf::from("env.xml"))
        );
        assert_eq!(
            resolve_output_path(option.clone(), None),
            Some(PathBuf::from("option.xml"))
        );
        assert_eq!(
            resolve_output_path(option, Some("  ".to_string())),
            Some(PathBuf::from("option.xml"))
        );
        assert_eq!(resolve_output_path(None, None), None);
    }

    #[test]
    fn test_to_toml_round_trips_defaults() {
        let toml = Config::default().to_toml();
        let parsed = Config::parse(&toml).expect("Failed to parse generated config");
        assert_eq!(parsed.report.suite_name, DEFAULT_SUITE_NAME);
        assert_eq!(parsed.console.slow_ms, 75);
    }
}
