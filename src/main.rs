//! Repopulse CLI entrypoint.
//!
//! Loads layered configuration, then either serves the HTTP API (`--serve`)
//! or runs one repository insight feature from the interactive menu.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use repopulse::{InsightConfig, InsightError, init_tracing};

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!("exiting after error: {error:?}");
            if writeln!(io::stderr().lock(), "An error occurred: {error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), InsightError> {
    let config = load_config()?;
    init_tracing(&config.log_filter)?;

    let services = cli::Services::from_config(&config)?;
    if config.serve {
        return cli::serve_api(&config, services).await;
    }

    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();
    cli::run_interactive(&config, &services, &mut input, &mut out).await
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`InsightError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<InsightConfig, InsightError> {
    InsightConfig::load().map_err(|error| InsightError::Configuration {
        message: error.to_string(),
    })
}
