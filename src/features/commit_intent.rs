//! Commit intent analysis of the newest commit.

use minijinja::context;
use serde::Serialize;

use crate::ai::prompt::DIFF_CEILING;
use crate::ai::{CommitAssessment, PromptTemplate, normalize, render_prompt};
use crate::error::InsightError;
use crate::github::{RepositoryIntake, RepositorySlug};
use crate::http::FetchResult;
use crate::text::truncate_with_marker;

use super::{FeatureContext, FeatureReport};

/// Assessment of the newest commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitIntentReport {
    /// Repository analysed.
    pub repository: String,
    /// Commit SHA.
    pub sha: String,
    /// Commit message.
    pub message: String,
    /// Whether the diff was cut to fit the prompt.
    pub diff_truncated: bool,
    /// Structured assessment, defaulted when the reply was unusable.
    pub assessment: CommitAssessment,
    /// Why the default assessment was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalisation_failure: Option<String>,
    /// The model's reply as received.
    pub raw_reply: String,
}

pub(super) async fn run(
    context: FeatureContext<'_>,
    repository: &RepositorySlug,
) -> Result<FeatureReport, InsightError> {
    let intake = RepositoryIntake::new(context.gateway);
    let Some(latest) = intake.most_recent_commit(repository).await else {
        return Ok(FeatureReport::unavailable(format!(
            "No recent commits found in {repository}"
        )));
    };

    let commit = match context.gateway.commit(repository, &latest.sha).await {
        FetchResult::Success(commit) => commit,
        other => {
            tracing::warn!(
                "commit {} unavailable: {}",
                latest.sha,
                other.failure_description().unwrap_or_default()
            );
            return Ok(FeatureReport::unavailable(format!(
                "Commit {} not found",
                latest.sha
            )));
        }
    };

    let Some(diff) = context
        .gateway
        .commit_diff(repository, &commit.sha)
        .await
        .success()
        .filter(|diff| !diff.is_empty())
    else {
        return Ok(FeatureReport::unavailable(format!(
            "Diff for commit {} not found",
            commit.sha
        )));
    };

    let bounded = truncate_with_marker(&diff, DIFF_CEILING);
    let prompt = render_prompt(
        PromptTemplate::CommitIntent,
        context! { message => &commit.message, diff => bounded.as_ref() },
    )?;

    let raw_reply = match context.completion.complete(prompt.as_str()).await {
        Ok(reply) => reply,
        Err(error) => {
            tracing::warn!("commit assessment failed: {error}");
            format!("AI analysis unavailable: {error}")
        }
    };
    let normalised = normalize::<CommitAssessment>(&raw_reply);
    let normalisation_failure = normalised.fallback_reason().map(str::to_owned);
    if let Some(reason) = &normalisation_failure {
        tracing::info!("commit assessment defaulted: {reason}");
    }

    Ok(FeatureReport::CommitIntent(CommitIntentReport {
        repository: repository.to_string(),
        sha: commit.sha,
        message: commit.message,
        diff_truncated: matches!(bounded, std::borrow::Cow::Owned(_)),
        assessment: normalised.into_record(),
        normalisation_failure,
        raw_reply,
    }))
}
