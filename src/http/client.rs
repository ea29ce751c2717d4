//! Async HTTP adapter shared by the GitHub gateway and the completion client.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::error::InsightError;
use crate::text::truncate_for_message;

use super::{EndpointRequest, FetchResult};

/// Fixed per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Media type for GitHub REST JSON responses.
pub const GITHUB_JSON: &str = "application/vnd.github.v3+json";

/// Media type for unified diffs from the GitHub REST API.
pub const GITHUB_DIFF: &str = "application/vnd.github.v3.diff";

const USER_AGENT: &str = concat!("repopulse/", env!("CARGO_PKG_VERSION"));
const ERROR_BODY_LIMIT: usize = 500;

/// Credential attached to every request made by a client.
#[derive(Clone, PartialEq, Eq)]
pub enum Authorization {
    /// GitHub personal access token, sent as `token <value>`.
    Token(String),
    /// Bearer credential, sent as `Bearer <value>`.
    Bearer(String),
}

impl Authorization {
    fn header_value(&self) -> String {
        match self {
            Self::Token(value) => format!("token {value}"),
            Self::Bearer(value) => format!("Bearer {value}"),
        }
    }
}

impl std::fmt::Debug for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Authorization::Token(<redacted>)"),
            Self::Bearer(_) => f.write_str("Authorization::Bearer(<redacted>)"),
        }
    }
}

/// HTTP client bound to one upstream base URL.
///
/// Every call resolves to a [`FetchResult`]; failures are logged here once so
/// callers only decide what to do with them.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    authorization: Option<Authorization>,
    accept: Option<&'static str>,
}

impl HttpClient {
    /// Creates a client for `base_url` with the fixed request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::Configuration`] when the TLS backend cannot be
    /// initialised.
    pub fn new(base_url: impl Into<String>) -> Result<Self, InsightError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Creates a client with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::Configuration`] when the TLS backend cannot be
    /// initialised.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, InsightError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| InsightError::Configuration {
                message: format!("failed to configure HTTP client: {error}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            authorization: None,
            accept: None,
        })
    }

    /// Attaches a credential to every subsequent request.
    #[must_use]
    pub fn with_authorization(mut self, authorization: Option<Authorization>) -> Self {
        self.authorization = authorization;
        self
    }

    /// Sets the default `Accept` header.
    #[must_use]
    pub const fn with_accept(mut self, accept: &'static str) -> Self {
        self.accept = Some(accept);
        self
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues a GET and decodes the body as JSON.
    pub async fn get_json(&self, request: &EndpointRequest) -> FetchResult<Value> {
        let url = request.resolve(&self.base_url);
        let builder = self.prepare(self.client.get(&url), request, self.accept);
        parse_json(self.send(builder, "GET", &url).await)
    }

    /// Issues a GET and returns the body as text, optionally overriding the
    /// `Accept` header.
    pub async fn get_text(
        &self,
        request: &EndpointRequest,
        accept: Option<&'static str>,
    ) -> FetchResult<String> {
        let url = request.resolve(&self.base_url);
        let builder = self.prepare(self.client.get(&url), request, accept.or(self.accept));
        self.send(builder, "GET", &url).await
    }

    /// Issues a POST with a JSON body and decodes the response as JSON.
    pub async fn post_json<B>(&self, request: &EndpointRequest, body: &B) -> FetchResult<Value>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = request.resolve(&self.base_url);
        let builder = self
            .prepare(self.client.post(&url), request, self.accept)
            .json(body);
        parse_json(self.send(builder, "POST", &url).await)
    }

    fn prepare(
        &self,
        builder: RequestBuilder,
        request: &EndpointRequest,
        accept: Option<&'static str>,
    ) -> RequestBuilder {
        let mut prepared = builder.query(&request.query_pairs());
        if let Some(accept_value) = accept {
            prepared = prepared.header(ACCEPT, accept_value);
        }
        if let Some(authorization) = self.authorization.as_ref() {
            prepared = prepared.header(AUTHORIZATION, authorization.header_value());
        }
        prepared
    }

    async fn send(&self, builder: RequestBuilder, method: &str, url: &str) -> FetchResult<String> {
        let response = match builder.send().await {
            Ok(response) => response,
            Err(error) => {
                let message = describe_transport_error(&error);
                tracing::warn!("{method} {url} failed: {message}");
                return FetchResult::TransportError(message);
            }
        };

        let status = response.status();
        match response.text().await {
            Ok(body) => classify(status, body, method, url),
            Err(error) => {
                let message = format!("failed to read response body: {error}");
                tracing::warn!("{method} {url} failed: {message}");
                FetchResult::TransportError(message)
            }
        }
    }
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out after {}s", REQUEST_TIMEOUT.as_secs())
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        error.to_string()
    }
}

fn classify(status: StatusCode, body: String, method: &str, url: &str) -> FetchResult<String> {
    if status.is_success() {
        return FetchResult::Success(body);
    }

    if status == StatusCode::NOT_FOUND {
        tracing::debug!("{method} {url} returned 404");
        return FetchResult::NotFound;
    }

    let detail = extract_github_message(&body).unwrap_or(body);
    let shortened = truncate_for_message(&detail, ERROR_BODY_LIMIT);
    tracing::warn!(
        "{method} {url} failed with status {}: {shortened}",
        status.as_u16()
    );
    FetchResult::StatusError {
        code: status.as_u16(),
        body: shortened,
    }
}

fn parse_json(result: FetchResult<String>) -> FetchResult<Value> {
    match result {
        FetchResult::Success(body) => match serde_json::from_str(&body) {
            Ok(value) => FetchResult::Success(value),
            Err(error) => {
                tracing::warn!("response body was not valid JSON: {error}");
                FetchResult::TransportError(format!("response body was not valid JSON: {error}"))
            }
        },
        FetchResult::NotFound => FetchResult::NotFound,
        FetchResult::TransportError(message) => FetchResult::TransportError(message),
        FetchResult::StatusError { code, body } => FetchResult::StatusError { code, body },
    }
}

/// Pulls the `message` field out of a GitHub-style JSON error body.
fn extract_github_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
