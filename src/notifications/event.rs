//! Mapping repository feed events to notification content.

use serde::Deserialize;
use serde_json::Value;

use crate::github::{ChangedFile, RepositoryEvent, RepositoryGateway, RepositorySlug};
use crate::http::FetchResult;
use crate::text::{capitalise, leading_chars};

const SUMMARY_CHARS: usize = 100;
const LISTED_CHANGES: usize = 5;

/// Feed event kinds the poller records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// `PushEvent`.
    Push,
    /// `PullRequestEvent`.
    PullRequest,
    /// `IssuesEvent`.
    Issues,
    /// `IssueCommentEvent`.
    IssueComment,
}

impl EventKind {
    /// Maps a feed type name, returning `None` for kinds outside the
    /// allow-list.
    #[must_use]
    pub fn from_feed_type(kind: &str) -> Option<Self> {
        match kind {
            "PushEvent" => Some(Self::Push),
            "PullRequestEvent" => Some(Self::PullRequest),
            "IssuesEvent" => Some(Self::Issues),
            "IssueCommentEvent" => Some(Self::IssueComment),
            _ => None,
        }
    }

    /// Operation label.
    #[must_use]
    pub const fn operation(self) -> &'static str {
        match self {
            Self::Push => "git push",
            Self::PullRequest => "git pull-request",
            Self::Issues => "issue creation/update",
            Self::IssueComment => "issue comment",
        }
    }

    /// Display label, e.g. `Pull Request`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Push => "Push",
            Self::PullRequest => "Pull Request",
            Self::Issues => "Issues",
            Self::IssueComment => "Issue Comment",
        }
    }
}

/// Display label for a changed-file status.
#[must_use]
pub fn change_label(status: &str) -> String {
    match status {
        "added" => "Added".to_owned(),
        "modified" => "Modified".to_owned(),
        "removed" => "Deleted".to_owned(),
        "" => "Unknown".to_owned(),
        other => capitalise(other),
    }
}

fn describe_changes(files: &[ChangedFile]) -> String {
    if files.is_empty() {
        return "No file changes".to_owned();
    }
    files
        .iter()
        .take(LISTED_CHANGES)
        .map(|file| format!("{}: {}", change_label(&file.status), file.filename))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Default, Deserialize)]
struct PushPayload {
    #[serde(default)]
    commits: Vec<PushCommit>,
    #[serde(default)]
    head: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PushCommit {
    sha: String,
}

#[derive(Debug, Default, Deserialize)]
struct PullRequestPayload {
    #[serde(default)]
    number: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct IssuesPayload {
    #[serde(default)]
    issue: Option<IssueRef>,
}

#[derive(Debug, Deserialize)]
struct IssueRef {
    number: u64,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CommentPayload {
    #[serde(default)]
    comment: Option<CommentRef>,
}

#[derive(Debug, Deserialize)]
struct CommentRef {
    #[serde(default)]
    body: Option<String>,
}

fn payload_as<T: for<'de> Deserialize<'de> + Default>(payload: &Value) -> T {
    serde_json::from_value(payload.clone()).unwrap_or_default()
}

/// Builds the human-readable update line for `event`.
///
/// Push and pull request events fetch their commit or pull request details;
/// a failed lookup degrades to placeholder text rather than dropping the
/// event.
pub async fn describe_event(
    gateway: &dyn RepositoryGateway,
    repository: &RepositorySlug,
    kind: EventKind,
    event: &RepositoryEvent,
) -> String {
    let actor = event.actor.as_deref().unwrap_or("unknown");
    match kind {
        EventKind::Push => describe_push(gateway, repository, actor, &event.payload).await,
        EventKind::PullRequest => {
            describe_pull_request(gateway, repository, actor, &event.payload).await
        }
        EventKind::Issues => {
            let payload: IssuesPayload = payload_as(&event.payload);
            payload.issue.map_or_else(
                || format!("Issue by {actor}: details unavailable"),
                |issue| {
                    let title = issue.title.unwrap_or_default();
                    format!(
                        "Issue by {actor} #{}: {}",
                        issue.number,
                        leading_chars(&title, SUMMARY_CHARS)
                    )
                },
            )
        }
        EventKind::IssueComment => {
            let payload: CommentPayload = payload_as(&event.payload);
            let body = payload
                .comment
                .and_then(|comment| comment.body)
                .unwrap_or_default();
            format!(
                "Comment by {actor}: {}...",
                leading_chars(&body, SUMMARY_CHARS)
            )
        }
    }
}

async fn describe_push(
    gateway: &dyn RepositoryGateway,
    repository: &RepositorySlug,
    actor: &str,
    payload: &Value,
) -> String {
    let push: PushPayload = payload_as(payload);
    let Some(sha) = push
        .commits
        .into_iter()
        .next()
        .map(|commit| commit.sha)
        .or(push.head)
    else {
        return "No commit details available.".to_owned();
    };

    match gateway.commit(repository, &sha).await {
        FetchResult::Success(commit) => format!(
            "Commit by {actor}: {}; Changes: {}",
            leading_chars(commit.message.trim(), SUMMARY_CHARS),
            describe_changes(&commit.files)
        ),
        _ => format!("Commit by {actor}: Unknown; Changes: No file changes"),
    }
}

async fn describe_pull_request(
    gateway: &dyn RepositoryGateway,
    repository: &RepositorySlug,
    actor: &str,
    payload: &Value,
) -> String {
    let pull: PullRequestPayload = payload_as(payload);
    let Some(number) = pull.number else {
        return format!("PR by {actor}: details unavailable");
    };

    let title = match gateway.pull_request(repository, number).await {
        FetchResult::Success(detail) => detail.title.unwrap_or_default(),
        _ => "Unknown".to_owned(),
    };
    let files = gateway.pull_request_files(repository, number).await;
    format!(
        "PR by {actor}: {}; Changes: {}",
        leading_chars(&title, SUMMARY_CHARS),
        describe_changes(&files)
    )
}
