//! Security review of the lines added by the most recent pull request.

use minijinja::context;
use serde::Serialize;

use crate::ai::{PromptTemplate, complete_or_notice, render_prompt};
use crate::error::InsightError;
use crate::github::{RepositoryIntake, RepositorySlug};

use super::patch::added_lines;
use super::{FeatureContext, FeatureReport};

/// Files scanned per pull request.
pub const FILES_SCANNED: usize = 5;

/// Added lines sent to the model per file.
pub const LINES_PER_PROMPT: usize = 30;

/// Security findings for one pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityReport {
    /// Repository scanned.
    pub repository: String,
    /// Pull request scanned.
    pub pull_request: u64,
    /// Files changed by the pull request.
    pub files_changed: usize,
    /// Scanned files.
    pub files: Vec<FileScan>,
}

/// Findings for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileScan {
    /// Path of the file.
    pub filename: String,
    /// Added lines found in the patch.
    pub lines_scanned: usize,
    /// The model's findings; absent when there was nothing to scan.
    pub analysis: Option<String>,
}

pub(super) async fn run(
    context: FeatureContext<'_>,
    repository: &RepositorySlug,
) -> Result<FeatureReport, InsightError> {
    let intake = RepositoryIntake::new(context.gateway);
    let Some(pull) = intake.most_recent_pull_request(repository).await else {
        return Ok(FeatureReport::unavailable(format!(
            "No recent pull requests found in {repository}"
        )));
    };

    let changed = context
        .gateway
        .pull_request_files(repository, pull.number)
        .await;
    if changed.is_empty() {
        return Ok(FeatureReport::unavailable(format!(
            "No files found for pull request #{}",
            pull.number
        )));
    }

    let mut files = Vec::new();
    for file in changed.iter().take(FILES_SCANNED) {
        let added = file.patch.as_deref().map(added_lines).unwrap_or_default();
        let analysis = if added.is_empty() {
            tracing::debug!("nothing to scan in {}", file.filename);
            None
        } else {
            let sample: Vec<&str> = added.iter().take(LINES_PER_PROMPT).copied().collect();
            let prompt = render_prompt(
                PromptTemplate::SecurityScan,
                context! { filename => &file.filename, lines => sample },
            )?;
            Some(complete_or_notice(context.completion, prompt.as_str()).await)
        };
        files.push(FileScan {
            filename: file.filename.clone(),
            lines_scanned: added.len(),
            analysis,
        });
    }

    Ok(FeatureReport::SecurityScan(SecurityReport {
        repository: repository.to_string(),
        pull_request: pull.number,
        files_changed: changed.len(),
        files,
    }))
}
