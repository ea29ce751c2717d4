//! Repository data read from the GitHub REST API.
//!
//! The `Api*` types mirror the wire format and stay private to the module;
//! the public types carry only the fields the feature orchestrators use.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Repository metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySummary {
    /// `owner/name`.
    pub full_name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Dominant language reported by GitHub.
    pub language: Option<String>,
    /// Star count.
    pub stargazers_count: u64,
    /// Fork count.
    pub forks_count: u64,
    /// Default branch name.
    pub default_branch: Option<String>,
}

/// Pull request as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestSummary {
    /// Pull request number.
    pub number: u64,
    /// Title.
    pub title: Option<String>,
    /// `open` or `closed`.
    pub state: String,
    /// Author login.
    pub author: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: Option<String>,
    /// RFC 3339 merge timestamp, absent when unmerged.
    pub merged_at: Option<String>,
}

/// Pull request with line counts from the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestDetail {
    /// Pull request number.
    pub number: u64,
    /// Title.
    pub title: Option<String>,
    /// Author login.
    pub author: Option<String>,
    /// Lines added.
    pub additions: u64,
    /// Lines deleted.
    pub deletions: u64,
}

/// A file touched by a pull request or commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangedFile {
    /// Path within the repository.
    pub filename: String,
    /// `added`, `modified`, `removed`, `renamed`, …
    pub status: String,
    /// Unified diff hunk, absent for binary or oversized files.
    pub patch: Option<String>,
    /// Lines added.
    pub additions: u64,
    /// Lines deleted.
    pub deletions: u64,
}

/// Commit as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    /// Full SHA.
    pub sha: String,
    /// Commit message.
    pub message: String,
    /// Author name from the commit metadata.
    pub author_name: Option<String>,
    /// RFC 3339 author timestamp.
    pub authored_at: Option<String>,
}

/// Commit with its changed files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitDetail {
    /// Full SHA.
    pub sha: String,
    /// Commit message.
    pub message: String,
    /// Files changed by the commit.
    pub files: Vec<ChangedFile>,
}

/// Kind of a git tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryKind {
    /// A file.
    Blob,
    /// A directory.
    Tree,
    /// A submodule or anything else.
    #[serde(other)]
    Other,
}

/// One entry of a recursive git tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Path within the repository.
    pub path: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: TreeEntryKind,
    /// Size in bytes for blobs.
    #[serde(default)]
    pub size: Option<u64>,
}

/// An entry of the repository events feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEvent {
    /// Event type, e.g. `PushEvent`.
    pub kind: String,
    /// Actor login.
    pub actor: Option<String>,
    /// ISO-8601 UTC timestamp.
    pub created_at: Option<String>,
    /// Kind-specific payload.
    pub payload: Value,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) number: u64,
    #[serde(default)]
    pub(super) title: Option<String>,
    #[serde(default)]
    pub(super) state: Option<String>,
    #[serde(default)]
    pub(super) user: Option<ApiUser>,
    #[serde(default)]
    pub(super) created_at: Option<String>,
    #[serde(default)]
    pub(super) merged_at: Option<String>,
    #[serde(default)]
    pub(super) additions: Option<u64>,
    #[serde(default)]
    pub(super) deletions: Option<u64>,
}

impl ApiPullRequest {
    fn author(&self) -> Option<String> {
        self.user.as_ref().and_then(|user| user.login.clone())
    }
}

impl From<ApiPullRequest> for PullRequestSummary {
    fn from(value: ApiPullRequest) -> Self {
        let author = value.author();
        Self {
            number: value.number,
            title: value.title,
            state: value.state.unwrap_or_else(|| "unknown".to_owned()),
            author,
            created_at: value.created_at,
            merged_at: value.merged_at,
        }
    }
}

impl From<ApiPullRequest> for PullRequestDetail {
    fn from(value: ApiPullRequest) -> Self {
        let author = value.author();
        Self {
            number: value.number,
            title: value.title,
            author,
            additions: value.additions.unwrap_or_default(),
            deletions: value.deletions.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiCommitAuthor {
    #[serde(default)]
    pub(super) name: Option<String>,
    #[serde(default)]
    pub(super) date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiCommitData {
    #[serde(default)]
    pub(super) message: String,
    #[serde(default)]
    pub(super) author: Option<ApiCommitAuthor>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiCommit {
    pub(super) sha: String,
    pub(super) commit: ApiCommitData,
    #[serde(default)]
    pub(super) files: Vec<ChangedFile>,
}

impl From<ApiCommit> for CommitSummary {
    fn from(value: ApiCommit) -> Self {
        let (author_name, authored_at) = value
            .commit
            .author
            .map_or((None, None), |author| (author.name, author.date));
        Self {
            sha: value.sha,
            message: value.commit.message,
            author_name,
            authored_at,
        }
    }
}

impl From<ApiCommit> for CommitDetail {
    fn from(value: ApiCommit) -> Self {
        Self {
            sha: value.sha,
            message: value.commit.message,
            files: value.files,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiTree {
    #[serde(default)]
    pub(super) tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiEvent {
    #[serde(rename = "type")]
    pub(super) kind: String,
    #[serde(default)]
    pub(super) actor: Option<ApiUser>,
    #[serde(default)]
    pub(super) created_at: Option<String>,
    #[serde(default)]
    pub(super) payload: Value,
}

impl From<ApiEvent> for RepositoryEvent {
    fn from(value: ApiEvent) -> Self {
        Self {
            kind: value.kind,
            actor: value.actor.and_then(|actor| actor.login),
            created_at: value.created_at,
            payload: value.payload,
        }
    }
}
