//! Tracing subscriber setup.
//!
//! Diagnostics go to stderr so that report output on stdout stays clean.
//! `RUST_LOG` takes precedence over the configured filter.

use std::io;

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::InsightError;

/// Builds the filter from `RUST_LOG`, falling back to `configured`.
///
/// # Errors
///
/// Returns [`InsightError::Configuration`] when neither source parses.
pub fn log_filter(configured: &str) -> Result<EnvFilter, InsightError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .map_err(|error: ParseError| InsightError::Configuration {
            message: format!("invalid log filter '{configured}': {error}"),
        })
}

/// Installs the global subscriber.
///
/// Installing twice is harmless; the second call leaves the first
/// subscriber in place.
///
/// # Errors
///
/// Returns [`InsightError::Configuration`] when the filter is invalid.
pub fn init_tracing(configured: &str) -> Result<(), InsightError> {
    let filter = log_filter(configured)?;
    let installed = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}
