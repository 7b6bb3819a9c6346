// Main entry point for junit-spec

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use junit_spec::cli::Cli;
use junit_spec::commands;
use junit_spec::config;
use junit_spec::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from file (if exists)
    let config = config::Config::load();

    let cli = Cli::parse();

    logging::init(cli.verbose);

    if cli.verbose {
        info!("Starting junit-spec v{}", env!("CARGO_PKG_VERSION"));
    }

    // Handle config flag
    if cli.config {
        print_configuration(&cli, config.as_ref());
        return Ok(());
    }

    // Handle init_config flag
    if let Some(config_file) = &cli.init_config {
        let toml_content = config::Config::default().to_toml();
        std::fs::write(config_file, toml_content)?;
        println!("Configuration file created: {}", config_file.display());
        println!("\nYou can now edit the file to customize your settings.");
        print_precedence();
        return Ok(());
    }

    // Handle completion flag
    if let Some(shell_type) = &cli.completion {
        return commands::handle_completion(shell_type);
    }

    match commands::run_report(&cli, config.as_ref()).await {
        Ok(0) => Ok(()),
        Ok(failures) => {
            info!("{} test(s) failed", failures);
            std::process::exit(1);
        }
        Err(e) => {
            error!("{:#}", e);
            Err(e)
        }
    }
}

fn print_configuration(cli: &Cli, config: Option<&config::Config>) {
    let env_output = std::env::var(config::ENV_JUNIT_REPORT_PATH).ok();
    let options = cli.reporter_options(config, env_output.clone());

    println!("Current configuration:");
    println!(
        "    Output: {}",
        options
            .output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".to_string())
    );
    println!("    Suite name: {}", options.suite_name);
    println!(
        "    Diffs: {}",
        if options.show_diff { "enabled" } else { "disabled" }
    );
    println!(
        "    Color: {}",
        if options.colors { "enabled" } else { "disabled" }
    );
    println!("    Slow threshold: {}ms", options.slow_ms);

    if config.is_some() {
        println!("\n  Configuration file loaded: {}", config::CONFIG_FILE_NAME);
    } else {
        println!("\n  No configuration file loaded");
        println!(
            "  Create one with: junit-spec --init-config {}",
            config::CONFIG_FILE_NAME
        );
    }

    println!("\n  Environment variables:");
    match env_output {
        Some(path) => println!("    {}: {}", config::ENV_JUNIT_REPORT_PATH, path),
        None => println!("    {}: not set", config::ENV_JUNIT_REPORT_PATH),
    }

    print_precedence();
}

fn print_precedence() {
    println!("\nConfiguration precedence:");
    println!("  1. {} environment variable (output path only)", config::ENV_JUNIT_REPORT_PATH);
    println!("  2. Command-line arguments");
    println!("  3. Configuration file");
    println!("  4. Built-in defaults (lowest)");
}
