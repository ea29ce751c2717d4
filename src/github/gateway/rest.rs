//! REST implementation of [`RepositoryGateway`].

use async_trait::async_trait;

use crate::error::InsightError;
use crate::github::locator::RepositorySlug;
use crate::github::models::{
    ApiCommit, ApiEvent, ApiPullRequest, ApiTree, ChangedFile, CommitDetail, CommitSummary,
    PullRequestDetail, PullRequestSummary, RepositoryEvent, RepositorySummary, TreeEntry,
};
use crate::github::pagination::{PageLimits, fetch_all_as};
use crate::http::{
    Authorization, EndpointRequest, FetchResult, GITHUB_DIFF, GITHUB_JSON, HttpClient,
};

use super::RepositoryGateway;

const FILES_PAGE_SIZE: u32 = 100;

/// Gateway backed by the GitHub REST API and the raw-content mirror.
#[derive(Debug, Clone)]
pub struct RestGateway {
    api: HttpClient,
    raw: HttpClient,
}

impl RestGateway {
    /// Creates a gateway for the given API root and raw-content mirror.
    ///
    /// The token, when present, is sent as `Authorization: token <value>`
    /// on API requests; requests go out unauthenticated otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::Configuration`] when an HTTP client cannot be
    /// built.
    pub fn new(
        api_base_url: &str,
        raw_base_url: &str,
        token: Option<&str>,
    ) -> Result<Self, InsightError> {
        let authorization = token
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Authorization::Token(value.to_owned()));
        let api = HttpClient::new(api_base_url)?
            .with_accept(GITHUB_JSON)
            .with_authorization(authorization);
        let raw = HttpClient::new(raw_base_url)?;
        Ok(Self { api, raw })
    }
}

#[async_trait]
impl RepositoryGateway for RestGateway {
    async fn repository(&self, repository: &RepositorySlug) -> FetchResult<RepositorySummary> {
        self.api
            .get_json(&EndpointRequest::new(repository.api_path()))
            .await
            .decode()
    }

    async fn list_pull_requests(
        &self,
        repository: &RepositorySlug,
        limits: PageLimits,
    ) -> Vec<PullRequestSummary> {
        let request = EndpointRequest::new(format!("{}/pulls", repository.api_path()))
            .with_param("state", "all")
            .with_param("sort", "updated")
            .with_param("direction", "desc");
        fetch_all_as::<ApiPullRequest>(&self.api, &request, limits)
            .await
            .into_iter()
            .map(PullRequestSummary::from)
            .collect()
    }

    async fn pull_request(
        &self,
        repository: &RepositorySlug,
        number: u64,
    ) -> FetchResult<PullRequestDetail> {
        let request = EndpointRequest::new(format!("{}/pulls/{number}", repository.api_path()));
        self.api
            .get_json(&request)
            .await
            .decode::<ApiPullRequest>()
            .map(PullRequestDetail::from)
    }

    async fn pull_request_files(
        &self,
        repository: &RepositorySlug,
        number: u64,
    ) -> Vec<ChangedFile> {
        let request =
            EndpointRequest::new(format!("{}/pulls/{number}/files", repository.api_path()));
        fetch_all_as(&self.api, &request, PageLimits::unbounded(FILES_PAGE_SIZE)).await
    }

    async fn list_commits(
        &self,
        repository: &RepositorySlug,
        limits: PageLimits,
    ) -> Vec<CommitSummary> {
        let request = EndpointRequest::new(format!("{}/commits", repository.api_path()));
        fetch_all_as::<ApiCommit>(&self.api, &request, limits)
            .await
            .into_iter()
            .map(CommitSummary::from)
            .collect()
    }

    async fn commit(&self, repository: &RepositorySlug, sha: &str) -> FetchResult<CommitDetail> {
        let request = EndpointRequest::new(format!("{}/commits/{sha}", repository.api_path()));
        self.api
            .get_json(&request)
            .await
            .decode::<ApiCommit>()
            .map(CommitDetail::from)
    }

    async fn commit_diff(&self, repository: &RepositorySlug, sha: &str) -> FetchResult<String> {
        let request = EndpointRequest::new(format!("{}/commits/{sha}", repository.api_path()));
        self.api.get_text(&request, Some(GITHUB_DIFF)).await
    }

    async fn recent_events(
        &self,
        repository: &RepositorySlug,
        limit: u32,
    ) -> FetchResult<Vec<RepositoryEvent>> {
        let request = EndpointRequest::new(format!("{}/events", repository.api_path()))
            .with_param("per_page", limit);
        self.api
            .get_json(&request)
            .await
            .decode::<Vec<ApiEvent>>()
            .map(|events| events.into_iter().map(RepositoryEvent::from).collect())
    }

    async fn tree(
        &self,
        repository: &RepositorySlug,
        branch: &str,
    ) -> FetchResult<Vec<TreeEntry>> {
        let request =
            EndpointRequest::new(format!("{}/git/trees/{branch}", repository.api_path()))
                .with_param("recursive", 1_u32);
        self.api
            .get_json(&request)
            .await
            .decode::<ApiTree>()
            .map(|tree| tree.tree)
    }

    async fn raw_file(
        &self,
        repository: &RepositorySlug,
        branch: &str,
        path: &str,
    ) -> FetchResult<String> {
        let request = EndpointRequest::new(format!("/{repository}/{branch}/{path}"));
        self.raw.get_text(&request, None).await
    }
}
