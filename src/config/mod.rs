//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.repopulse.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `REPOPULSE_*`, plus the conventional
//!    `GITHUB_TOKEN` and `GROQ_API_KEY` as fallbacks for the credentials
//! 4. **Command-line arguments** – `--repo`/`-r`, `--feature`/`-f`, …
//!
//! # Configuration File
//!
//! ```toml
//! github_token = "ghp_example"
//! ai_api_key = "gsk_example"
//! repo = "octocat/hello-world"
//! feature = 6
//! bind = "127.0.0.1:5000"
//! notifications_path = "state/notifications.json"
//! poll_interval_seconds = 30
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::ai::CompletionConfig;
use crate::ai::completion::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::error::InsightError;
use crate::notifications::{DEFAULT_LOG_PATH, NotificationLog};

/// Default GitHub REST API base.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Default raw file content host.
pub const DEFAULT_RAW_CONTENT_URL: &str = "https://raw.githubusercontent.com";

/// Default HTTP bind address.
pub const DEFAULT_BIND: &str = "0.0.0.0:5000";

/// Default seconds between activity polls.
pub const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 60;

/// Default tracing filter.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `REPOPULSE_GITHUB_TOKEN`, `GITHUB_TOKEN`, or `--github-token`
/// - `REPOPULSE_AI_API_KEY`, `GROQ_API_KEY`, or `--ai-api-key`
/// - `REPOPULSE_REPO` or `--repo`: repository as `owner/repo`
/// - `REPOPULSE_FEATURE` or `--feature`: feature selector, 1 to 8
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use repopulse::InsightConfig;
///
/// let config = InsightConfig::load().expect("failed to load configuration");
/// let settings = config.client_settings().expect("valid URLs");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "REPOPULSE",
    discovery(
        dotfile_name = ".repopulse.toml",
        config_file_name = "repopulse.toml",
        app_name = "repopulse"
    )
)]
pub struct InsightConfig {
    /// Personal access token for the GitHub REST API.
    ///
    /// Optional; unauthenticated requests work with a much lower rate limit.
    /// Falls back to `GITHUB_TOKEN` when unset.
    #[ortho_config(cli_short = 't')]
    pub github_token: Option<String>,

    /// API key for the chat completion provider.
    ///
    /// Falls back to `GROQ_API_KEY` when unset.
    #[ortho_config(cli_short = 'k')]
    pub ai_api_key: Option<String>,

    /// GitHub REST API base URL.
    #[ortho_config()]
    pub github_api_url: String,

    /// Raw file content base URL.
    #[ortho_config(cli_short = 'w')]
    pub raw_content_url: String,

    /// Chat completion API base URL.
    #[ortho_config()]
    pub ai_base_url: String,

    /// Chat completion model name.
    #[ortho_config()]
    pub ai_model: String,

    /// Repository to analyse, as `owner/repo`.
    ///
    /// Prompted for interactively when unset.
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Feature selector, 1 to 8.
    ///
    /// Prompted for interactively when unset.
    #[ortho_config(cli_short = 'f')]
    pub feature: Option<u8>,

    /// Branch for tree and file reads; the default branch when unset.
    #[ortho_config(cli_short = 'b')]
    pub branch: Option<String>,

    /// Serves the HTTP API instead of running the interactive menu.
    ///
    /// Can be provided via:
    /// - CLI: `--serve` / `-s`
    /// - Config file: `serve = true`
    #[ortho_config(cli_short = 's')]
    pub serve: bool,

    /// Address the HTTP API binds to.
    #[ortho_config()]
    pub bind: String,

    /// Location of the notification log.
    #[ortho_config()]
    pub notifications_path: String,

    /// Seconds between activity polls.
    #[ortho_config()]
    pub poll_interval_seconds: u64,

    /// Tracing filter used when `RUST_LOG` is unset.
    #[ortho_config()]
    pub log_filter: String,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            ai_api_key: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_owned(),
            raw_content_url: DEFAULT_RAW_CONTENT_URL.to_owned(),
            ai_base_url: DEFAULT_BASE_URL.to_owned(),
            ai_model: DEFAULT_MODEL.to_owned(),
            repo: None,
            feature: None,
            branch: None,
            serve: false,
            bind: DEFAULT_BIND.to_owned(),
            notifications_path: DEFAULT_LOG_PATH.to_owned(),
            poll_interval_seconds: DEFAULT_POLL_INTERVAL_SECONDS,
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

/// Validated connection settings handed to the client constructors.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// GitHub REST API base.
    pub github_api_url: String,
    /// Raw content base.
    pub raw_content_url: String,
    /// GitHub token, when one was found.
    pub github_token: Option<String>,
    /// Completion provider settings.
    pub completion: CompletionConfig,
}

impl std::fmt::Debug for ClientSettings {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ClientSettings")
            .field("github_api_url", &self.github_api_url)
            .field("raw_content_url", &self.raw_content_url)
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("completion", &self.completion)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn validated_url(field: &'static str, value: &str) -> Result<String, InsightError> {
    let parsed = Url::parse(value).map_err(|error| InsightError::InvalidUrl {
        field,
        message: error.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(InsightError::InvalidUrl {
            field,
            message: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(value.trim_end_matches('/').to_owned())
}

impl InsightConfig {
    /// Resolves the GitHub token from configuration or the conventional
    /// `GITHUB_TOKEN` environment variable.
    #[must_use]
    pub fn resolve_github_token(&self) -> Option<String> {
        non_empty(self.github_token.clone()).or_else(|| non_empty(env::var("GITHUB_TOKEN").ok()))
    }

    /// Resolves the completion API key from configuration or the
    /// conventional `GROQ_API_KEY` environment variable.
    #[must_use]
    pub fn resolve_ai_api_key(&self) -> Option<String> {
        non_empty(self.ai_api_key.clone()).or_else(|| non_empty(env::var("GROQ_API_KEY").ok()))
    }

    /// Checks every configured URL and gathers the client settings.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::InvalidUrl`] when a base URL is not an
    /// absolute `http` or `https` URL.
    pub fn client_settings(&self) -> Result<ClientSettings, InsightError> {
        let github_api_url = validated_url("github_api_url", &self.github_api_url)?;
        let raw_content_url = validated_url("raw_content_url", &self.raw_content_url)?;
        let ai_base_url = validated_url("ai_base_url", &self.ai_base_url)?;
        Ok(ClientSettings {
            github_api_url,
            raw_content_url,
            github_token: self.resolve_github_token(),
            completion: CompletionConfig::new(
                ai_base_url,
                self.ai_model.clone(),
                self.resolve_ai_api_key(),
            ),
        })
    }

    /// Handle to the configured notification log.
    #[must_use]
    pub fn notification_log(&self) -> NotificationLog {
        NotificationLog::new(self.notifications_path.as_str())
    }

    /// Delay between activity polls, at least one second.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds.max(1))
    }
}

#[cfg(test)]
mod tests;
