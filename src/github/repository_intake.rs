//! Facade combining gateway calls with the lookup rules the features share.
//!
//! "Most recent" lookups fetch a single item, and content reads walk the
//! branch fallback list from [`branch_candidates`].

use super::gateway::RepositoryGateway;
use super::locator::{RepositorySlug, branch_candidates};
use super::models::{CommitSummary, PullRequestSummary, TreeEntry};
use super::pagination::PageLimits;
use crate::http::FetchResult;

/// Tree listing together with the branch it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchTree {
    /// Branch that answered.
    pub branch: String,
    /// Recursive tree entries.
    pub entries: Vec<TreeEntry>,
}

/// Aggregates repository lookups over a gateway.
pub struct RepositoryIntake<'client> {
    client: &'client dyn RepositoryGateway,
}

impl<'client> RepositoryIntake<'client> {
    /// Creates a facade over `client`.
    #[must_use]
    pub const fn new(client: &'client dyn RepositoryGateway) -> Self {
        Self { client }
    }

    /// The underlying gateway.
    #[must_use]
    pub const fn gateway(&self) -> &'client dyn RepositoryGateway {
        self.client
    }

    /// The most recently updated pull request, if any.
    pub async fn most_recent_pull_request(
        &self,
        repository: &RepositorySlug,
    ) -> Option<PullRequestSummary> {
        self.client
            .list_pull_requests(repository, PageLimits::bounded(1, 1))
            .await
            .into_iter()
            .next()
    }

    /// The newest commit on the default branch, if any.
    pub async fn most_recent_commit(&self, repository: &RepositorySlug) -> Option<CommitSummary> {
        self.client
            .list_commits(repository, PageLimits::bounded(1, 1))
            .await
            .into_iter()
            .next()
    }

    /// Reads the recursive tree, trying each candidate branch in turn.
    pub async fn tree_with_fallback(
        &self,
        repository: &RepositorySlug,
        requested_branch: Option<&str>,
    ) -> Option<BranchTree> {
        for branch in branch_candidates(requested_branch) {
            match self.client.tree(repository, &branch).await {
                FetchResult::Success(entries) => return Some(BranchTree { branch, entries }),
                other => tracing::debug!(
                    "tree for {repository}@{branch} unavailable: {}",
                    other.failure_description().unwrap_or_default()
                ),
            }
        }
        None
    }

    /// Reads raw file content, trying each candidate branch in turn.
    ///
    /// Empty files count as unavailable.
    pub async fn raw_file_with_fallback(
        &self,
        repository: &RepositorySlug,
        requested_branch: Option<&str>,
        path: &str,
    ) -> Option<String> {
        for branch in branch_candidates(requested_branch) {
            if let FetchResult::Success(content) =
                self.client.raw_file(repository, &branch, path).await
                && !content.is_empty()
            {
                return Some(content);
            }
        }
        None
    }
}
