//! OxideLog CLI - write, inspect and maintain rotating JSON logs

use anyhow::{Context, Result};
use clap::Parser;
use oxidelog_core::{Error, LoggerConfig};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set JSON output mode if requested
    output::set_json_mode(cli.json);

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("oxidelog={0},oxidelog_logs={0},oxidelog_core={0}", log_level).into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let result = match resolve_config(&cli) {
        Ok(config) => match cli.command {
            Commands::Write(args) => write::execute(config, args).await,
            Commands::Logs(args) => logs::execute(config, args).await,
            Commands::Cleanup => cleanup::execute(config),
            Commands::Compress => compress::execute(config).await,
            Commands::Flush => flush::execute(config).await,
            Commands::Config => config::execute(&config),
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Build the effective configuration.
///
/// Precedence, lowest first: defaults, config file (`--config` or the first
/// `oxidelog.*` in the working directory), `OXIDELOG_*` variables, `--file`.
fn resolve_config(cli: &Cli) -> Result<LoggerConfig> {
    let mut config = match &cli.config {
        Some(path) => LoggerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => {
            let cwd = std::env::current_dir()?;
            match LoggerConfig::find_and_load(&cwd) {
                Ok((config, path)) => {
                    debug!("Loaded config from {}", path.display());
                    config
                }
                Err(Error::ConfigNotFound(_)) => LoggerConfig::default(),
                Err(e) => return Err(e.into()),
            }
        }
    };

    config.apply_env_overrides();

    if let Some(file) = &cli.file {
        config.log_file = file.clone();
    }

    Ok(config)
}
