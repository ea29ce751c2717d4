//! Smart code review of the most recent pull request.

use minijinja::context;
use serde::Serialize;

use crate::ai::{PromptTemplate, complete_or_notice, render_prompt};
use crate::error::InsightError;
use crate::github::{RepositoryIntake, RepositorySlug};

use super::patch::change_lines;
use super::{FeatureContext, FeatureReport};

/// Files reviewed per pull request.
pub const FILES_PER_PULL_REQUEST: usize = 5;

/// Change lines sent to the model per file.
pub const CHANGES_PER_PROMPT: usize = 20;

/// Review of the most recently updated pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeReviewReport {
    /// Repository reviewed.
    pub repository: String,
    /// The reviewed pull request.
    pub pull_request: PullRequestReview,
}

/// Reviews of the files in one pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestReview {
    /// Pull request number.
    pub number: u64,
    /// Pull request title.
    pub title: Option<String>,
    /// Files changed by the pull request.
    pub files_changed: usize,
    /// Up to [`FILES_PER_PULL_REQUEST`] file reviews.
    pub files: Vec<FileReview>,
}

/// Review of one changed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReview {
    /// Path of the file.
    pub filename: String,
    /// Change lines found in the patch.
    pub changes_analysed: usize,
    /// What happened to the file.
    #[serde(flatten)]
    pub outcome: FileReviewOutcome,
}

/// Result of reviewing one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileReviewOutcome {
    /// The model reviewed the changes.
    Reviewed {
        /// Review text.
        review: String,
    },
    /// GitHub returned no patch, e.g. for binary files.
    NoPatch,
    /// The patch had no added or removed lines.
    NoChanges,
}

pub(super) async fn run(
    context: FeatureContext<'_>,
    repository: &RepositorySlug,
) -> Result<FeatureReport, InsightError> {
    let intake = RepositoryIntake::new(context.gateway);
    let Some(recent) = intake.most_recent_pull_request(repository).await else {
        return Ok(FeatureReport::unavailable(format!(
            "No pull requests found in {repository}"
        )));
    };

    let pull_request = review_pull_request(context, repository, recent.number, recent.title).await?;
    Ok(FeatureReport::CodeReview(CodeReviewReport {
        repository: repository.to_string(),
        pull_request,
    }))
}

async fn review_pull_request(
    context: FeatureContext<'_>,
    repository: &RepositorySlug,
    number: u64,
    title: Option<String>,
) -> Result<PullRequestReview, InsightError> {
    let files = context.gateway.pull_request_files(repository, number).await;
    let mut reviews = Vec::new();

    for file in files.iter().take(FILES_PER_PULL_REQUEST) {
        let Some(patch) = file.patch.as_deref().filter(|patch| !patch.is_empty()) else {
            reviews.push(FileReview {
                filename: file.filename.clone(),
                changes_analysed: 0,
                outcome: FileReviewOutcome::NoPatch,
            });
            continue;
        };

        let changes = change_lines(patch);
        if changes.is_empty() {
            reviews.push(FileReview {
                filename: file.filename.clone(),
                changes_analysed: 0,
                outcome: FileReviewOutcome::NoChanges,
            });
            continue;
        }

        let listed: Vec<String> = changes
            .iter()
            .take(CHANGES_PER_PROMPT)
            .map(ToString::to_string)
            .collect();
        let prompt = render_prompt(
            PromptTemplate::CodeReview,
            context! { filename => &file.filename, changes => listed },
        )?;
        let review = complete_or_notice(context.completion, prompt.as_str()).await;
        reviews.push(FileReview {
            filename: file.filename.clone(),
            changes_analysed: changes.len(),
            outcome: FileReviewOutcome::Reviewed { review },
        });
    }

    Ok(PullRequestReview {
        number,
        title,
        files_changed: files.len(),
        files: reviews,
    })
}

#[cfg(test)]
mod tests {
    use mockall::predicate::{always, eq};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::ai::completion::MockCompletionService;
    use crate::github::gateway::MockRepositoryGateway;
    use crate::github::{ChangedFile, PullRequestSummary};
    use crate::notifications::NotificationLog;

    #[fixture]
    fn slug() -> RepositorySlug {
        RepositorySlug::parse("octocat/hello").expect("slug should parse")
    }

    fn summary(number: u64) -> PullRequestSummary {
        PullRequestSummary {
            number,
            title: Some(format!("PR {number}")),
            state: "open".to_owned(),
            author: Some("ada".to_owned()),
            created_at: None,
            merged_at: None,
        }
    }

    fn changed(name: &str, patch: Option<&str>) -> ChangedFile {
        ChangedFile {
            filename: name.to_owned(),
            status: "modified".to_owned(),
            patch: patch.map(str::to_owned),
            ..ChangedFile::default()
        }
    }

    #[rstest]
    #[tokio::test]
    async fn reviews_files_with_changes_and_skips_the_rest(slug: RepositorySlug) {
        let mut gateway = MockRepositoryGateway::new();
        gateway
            .expect_list_pull_requests()
            .returning(|_, _| vec![summary(7)]);
        gateway
            .expect_pull_request_files()
            .with(always(), eq(7))
            .returning(|_, _| {
                vec![
                    changed("app.js", Some("@@ -1 +1 @@\n-var a;\n+let a;")),
                    changed("logo.png", None),
                    changed("notes.md", Some("@@ -1 +1 @@\n same")),
                ]
            });
        let mut completion = MockCompletionService::new();
        completion
            .expect_complete()
            .times(1)
            .withf(|prompt| prompt.contains("Removed: var a;\nAdded: let a;"))
            .returning(|_| Ok("Looks fine".to_owned()));
        let log = NotificationLog::new("unused.json");
        let context = FeatureContext {
            gateway: &gateway,
            completion: &completion,
            notifications: &log,
        };

        let report = run(context, &slug).await.expect("review should succeed");

        let FeatureReport::CodeReview(report) = report else {
            panic!("expected a code review report");
        };
        let files = &report.pull_request.files;
        let outcomes: Vec<&FileReviewOutcome> = files.iter().map(|file| &file.outcome).collect();
        assert_eq!(
            outcomes,
            [
                &FileReviewOutcome::Reviewed {
                    review: "Looks fine".to_owned()
                },
                &FileReviewOutcome::NoPatch,
                &FileReviewOutcome::NoChanges,
            ]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn repository_without_pull_requests_is_unavailable(slug: RepositorySlug) {
        let mut gateway = MockRepositoryGateway::new();
        gateway
            .expect_list_pull_requests()
            .times(1)
            .returning(|_, _| Vec::new());
        let completion = MockCompletionService::new();
        let log = NotificationLog::new("unused.json");
        let context = FeatureContext {
            gateway: &gateway,
            completion: &completion,
            notifications: &log,
        };

        let report = run(context, &slug).await.expect("run should succeed");

        assert!(matches!(report, FeatureReport::Unavailable { .. }));
    }
}
