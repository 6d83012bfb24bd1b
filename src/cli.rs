//! Command-line interface for the payload validation service.
//!
//! # Commands
//!
//! - `serve`: Run the HTTP service
//! - `check`: Validate a JSON payload file without starting the server
//!
//! # Example
//!
//! ```bash
//! # Run on the configured address
//! payload-validator serve
//!
//! # Override the port
//! payload-validator serve --port 9000
//!
//! # Validate a payload offline
//! payload-validator check request.json
//! ```

use crate::api::server::run_server;
use crate::app_state::AppState;
use crate::config::Config;
use crate::error::{ServiceError, ServiceResult};
use crate::sink;
use crate::validation::{validate, ValidationRequest};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Payload validation service with request/response audit logging
#[derive(Parser, Debug)]
#[command(name = "payload-validator")]
#[command(about = "Payload validation service with request/response audit logging", long_about = None)]
#[command(version)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Bind address (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate a JSON payload file and print the result
    Check {
        /// Path to the JSON payload
        file: PathBuf,
    },
}

/// Parse CLI arguments and execute the appropriate command.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration loading fails
/// - The request log sink cannot be created
/// - The server fails to bind or run
/// - The checked payload is unreadable or fails validation
pub async fn run() -> ServiceResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => run_serve_command(host, port).await,
        Commands::Check { file } => run_check_command(&file),
    }
}

/// Execute the serve command.
async fn run_serve_command(host: Option<String>, port: Option<u16>) -> ServiceResult<()> {
    let mut config = Config::from_env()?;
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }

    let sink = sink::from_config(&config)?;
    let state = AppState::new(sink, &config);

    println!(
        "{} {}",
        "🚀 Serving on".cyan().bold(),
        config.bind_address().bold()
    );

    run_server(config, state).await
}

/// Execute the check command.
fn run_check_command(file: &Path) -> ServiceResult<()> {
    info!(file = %file.display(), "Checking payload file");

    let errors = check_file(file)?;

    if errors.is_empty() {
        println!("{} {}", "✅".green(), "Validation Passed".green().bold());
        return Ok(());
    }

    println!("{} {}", "❌".red(), "Validation failed:".red().bold());
    for error in &errors {
        println!("   {} {}", "•".red(), error);
    }

    Err(ServiceError::validation(
        format!("{} violation(s) in {}", errors.len(), file.display()),
        errors,
    ))
}

/// Read `file` as a payload and return its violations.
fn check_file(file: &Path) -> ServiceResult<Vec<String>> {
    let raw = std::fs::read_to_string(file).map_err(|e| {
        ServiceError::config(
            format!("cannot read payload file {}", file.display()),
            Some(Box::new(e)),
        )
    })?;

    let request: ValidationRequest = serde_json::from_str(&raw).map_err(|e| {
        ServiceError::config(
            format!("{} is not a valid payload", file.display()),
            Some(Box::new(e)),
        )
    })?;

    Ok(validate(&request, Utc::now()))
}
