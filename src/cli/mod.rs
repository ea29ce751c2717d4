//! CLI operation mode handlers.
//!
//! - [`menu`]: feature menu and answer parsing
//! - [`Services`]: clients built once from configuration
//!
//! The binary either serves the HTTP API or runs one feature chosen from
//! configuration or the interactive menu.

use std::io::{BufRead, Write};
use std::sync::Arc;

use repopulse::notifications::run_until_shutdown;
use repopulse::{
    ActivityPoller, AppState, Feature, FeatureContext, FeatureTarget, InsightConfig, InsightError,
    NotificationLog, OpenAiCompletionService, RepositorySlug, RestGateway, run_feature, serve,
    write_report,
};

pub mod menu;

/// Clients shared by every feature run.
pub struct Services {
    gateway: Arc<RestGateway>,
    completion: Arc<OpenAiCompletionService>,
    notifications: NotificationLog,
    model_available: bool,
}

impl Services {
    /// Builds the GitHub and completion clients from configuration.
    ///
    /// A missing GitHub token is only a warning since public repositories
    /// can be read anonymously.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::InvalidUrl`] for a malformed base URL, or
    /// [`InsightError::Configuration`] when a client cannot be built.
    pub fn from_config(config: &InsightConfig) -> Result<Self, InsightError> {
        let settings = config.client_settings()?;
        if settings.github_token.is_none() {
            tracing::warn!(
                "no GitHub token configured; requests are unauthenticated and heavily rate limited"
            );
        }
        let model_available = settings
            .completion
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty());

        let gateway = RestGateway::new(
            &settings.github_api_url,
            &settings.raw_content_url,
            settings.github_token.as_deref(),
        )?;
        let completion = OpenAiCompletionService::new(settings.completion)?;

        Ok(Self {
            gateway: Arc::new(gateway),
            completion: Arc::new(completion),
            notifications: config.notification_log(),
            model_available,
        })
    }

    fn context(&self) -> FeatureContext<'_> {
        FeatureContext {
            gateway: self.gateway.as_ref(),
            completion: self.completion.as_ref(),
            notifications: &self.notifications,
        }
    }

    fn require_model(&self, feature: Feature) -> Result<(), InsightError> {
        if feature.uses_model() && !self.model_available {
            return Err(InsightError::Configuration {
                message: format!(
                    "{} needs an AI API key; set REPOPULSE_AI_API_KEY or GROQ_API_KEY",
                    feature.name()
                ),
            });
        }
        Ok(())
    }

    fn into_state(self) -> Arc<AppState> {
        Arc::new(AppState {
            gateway: self.gateway,
            completion: self.completion,
            notifications: self.notifications,
            model_available: self.model_available,
        })
    }
}

/// Serves the HTTP API until Ctrl-C.
///
/// # Errors
///
/// Returns [`InsightError::Server`] when the listener cannot be bound.
pub async fn serve_api(config: &InsightConfig, services: Services) -> Result<(), InsightError> {
    serve(&config.bind, services.into_state(), interrupted()).await
}

/// Runs one feature chosen from configuration or the menu.
///
/// # Errors
///
/// Returns [`InsightError`] for invalid answers, a missing AI key, or a
/// failed feature run.
pub async fn run_interactive<R, W>(
    config: &InsightConfig,
    services: &Services,
    input: &mut R,
    out: &mut W,
) -> Result<(), InsightError>
where
    R: BufRead,
    W: Write,
{
    let feature = match config.feature {
        Some(id) => menu::parse_feature_choice(&id.to_string())?,
        None => menu::choose_feature(input, out)?,
    };
    let repository = match config.repo.as_deref() {
        Some(repo) => menu::parse_repository(repo)?,
        None => menu::choose_repository(input, out)?,
    };
    services.require_model(feature)?;

    if feature == Feature::Activity {
        return watch_activity(config, services, repository, out).await;
    }

    let target = FeatureTarget::new(repository).with_branch(config.branch.clone());
    let report = run_feature(feature, services.context(), &target).await?;
    write_report(out, feature, &report)
}

async fn watch_activity<W: Write>(
    config: &InsightConfig,
    services: &Services,
    repository: RepositorySlug,
    out: &mut W,
) -> Result<(), InsightError> {
    let io_error = |error: std::io::Error| InsightError::io(&error);
    let last_seen = services
        .notifications
        .latest_time_for(&repository.to_string());
    writeln!(
        out,
        "Watching {repository} every {}s; press Ctrl-C to stop. Notifications are saved to {}",
        config.poll_interval().as_secs(),
        services.notifications.path()
    )
    .map_err(io_error)?;

    let mut poller = ActivityPoller::resume(repository, last_seen);
    let summary = run_until_shutdown(
        &mut poller,
        services.gateway.as_ref(),
        &services.notifications,
        config.poll_interval(),
        out,
        interrupted(),
    )
    .await?;

    writeln!(
        out,
        "\nStopped activity notifier after {} poll(s); {} notification(s) recorded.",
        summary.ticks, summary.notifications
    )
    .map_err(io_error)
}

async fn interrupted() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for Ctrl-C: {error}");
        std::future::pending::<()>().await;
    }
}
