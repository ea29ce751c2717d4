//! Gateway trait for reading repository data from GitHub.
//!
//! Listing operations collect every page up to the caller's limits and return
//! plain vectors; single-resource reads return a [`FetchResult`] so callers
//! can tell "missing" apart from "failed".

use async_trait::async_trait;

use crate::github::locator::RepositorySlug;
use crate::github::models::{
    ChangedFile, CommitDetail, CommitSummary, PullRequestDetail, PullRequestSummary,
    RepositoryEvent, RepositorySummary, TreeEntry,
};
use crate::github::pagination::PageLimits;
use crate::http::FetchResult;

mod rest;

pub use rest::RestGateway;

/// Read-only access to one GitHub host.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// Repository metadata.
    async fn repository(&self, repository: &RepositorySlug) -> FetchResult<RepositorySummary>;

    /// Pull requests in any state, most recently updated first.
    async fn list_pull_requests(
        &self,
        repository: &RepositorySlug,
        limits: PageLimits,
    ) -> Vec<PullRequestSummary>;

    /// One pull request including line counts.
    async fn pull_request(
        &self,
        repository: &RepositorySlug,
        number: u64,
    ) -> FetchResult<PullRequestDetail>;

    /// Files changed by a pull request.
    async fn pull_request_files(&self, repository: &RepositorySlug, number: u64)
    -> Vec<ChangedFile>;

    /// Commits on the default branch, newest first.
    async fn list_commits(
        &self,
        repository: &RepositorySlug,
        limits: PageLimits,
    ) -> Vec<CommitSummary>;

    /// One commit including its changed files.
    async fn commit(&self, repository: &RepositorySlug, sha: &str) -> FetchResult<CommitDetail>;

    /// Unified diff of one commit.
    async fn commit_diff(&self, repository: &RepositorySlug, sha: &str) -> FetchResult<String>;

    /// The newest `limit` entries of the repository events feed, newest first.
    async fn recent_events(
        &self,
        repository: &RepositorySlug,
        limit: u32,
    ) -> FetchResult<Vec<RepositoryEvent>>;

    /// Recursive git tree of `branch`.
    async fn tree(&self, repository: &RepositorySlug, branch: &str)
    -> FetchResult<Vec<TreeEntry>>;

    /// Raw content of `path` on `branch`.
    async fn raw_file(
        &self,
        repository: &RepositorySlug,
        branch: &str,
        path: &str,
    ) -> FetchResult<String>;
}

#[cfg(test)]
mod tests;
