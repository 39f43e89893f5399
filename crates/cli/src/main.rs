//! lintcfg - inspect and validate flake8-style lint configuration

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::env;
use std::io;
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Cli, LogFormat};

fn main() -> Result<ExitCode> {
    // Load .env file if it exists
    let dotenv_result = dotenv::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.log_format)?;

    match dotenv_result {
        Ok(path) => debug!("Loaded environment variables from {}", path.display()),
        // Only warn if the error is not "file not found"
        Err(e) if !e.to_string().contains("No such file or directory") => {
            warn!("Could not load .env file: {}", e)
        }
        Err(_) => {}
    }

    let stdout = io::stdout();
    commands::run(cli, &mut stdout.lock()).map(ExitCode::from)
}

/// Initialize logging on stderr; stdout carries command output
fn init_logging(format_flag: Option<LogFormat>) -> Result<()> {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    let log_format = match format_flag {
        Some(format) => format,
        None => match env::var("LOG_FORMAT") {
            Ok(value) => LogFormat::from_str(&value, true)
                .map_err(|e| anyhow::anyhow!("Invalid LOG_FORMAT {:?}: {}", value, e))?,
            Err(_) => LogFormat::default(),
        },
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format {
        LogFormat::Json => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
        LogFormat::Pretty => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(io::stderr))
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
    }

    debug!(level = %log_level, format = ?log_format, "Logging initialized");
    Ok(())
}
