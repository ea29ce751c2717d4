//! Endpoint descriptors for REST calls.

use std::fmt;

/// A query parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// Free-form text.
    Text(String),
    /// Non-negative integer.
    Number(u64),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Number(u64::from(value))
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

/// Page cursor attached to paginated requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// 1-based page number.
    pub page: u32,
    /// Items requested per page.
    pub per_page: u32,
}

/// A REST endpoint: path relative to the API root, fixed query parameters,
/// and an optional page cursor.
///
/// A path that already carries a scheme (`https://…`) is used verbatim.
///
/// # Example
///
/// ```
/// use repopulse::http::EndpointRequest;
///
/// let request = EndpointRequest::new("/repos/octocat/hello/pulls")
///     .with_param("state", "all")
///     .paged(2, 50);
/// let pairs = request.query_pairs();
/// assert!(pairs.contains(&("page".to_owned(), "2".to_owned())));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRequest {
    path: String,
    query: Vec<(String, QueryValue)>,
    cursor: Option<PageCursor>,
}

impl EndpointRequest {
    /// Creates a request for `path` with no parameters.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            cursor: None,
        }
    }

    /// Adds a fixed query parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Returns a copy of this request positioned at `page`.
    #[must_use]
    pub fn paged(&self, page: u32, per_page: u32) -> Self {
        Self {
            path: self.path.clone(),
            query: self.query.clone(),
            cursor: Some(PageCursor { page, per_page }),
        }
    }

    /// Endpoint path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Page cursor, if the request is paginated.
    #[must_use]
    pub const fn cursor(&self) -> Option<PageCursor> {
        self.cursor
    }

    /// Query parameters rendered as string pairs, cursor last.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .query
            .iter()
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect();
        if let Some(cursor) = self.cursor {
            pairs.push(("per_page".to_owned(), cursor.per_page.to_string()));
            pairs.push(("page".to_owned(), cursor.page.to_string()));
        }
        pairs
    }

    /// Resolves the request URL against `base_url`.
    #[must_use]
    pub fn resolve(&self, base_url: &str) -> String {
        if self.path.starts_with("http://") || self.path.starts_with("https://") {
            return self.path.clone();
        }
        let base = base_url.trim_end_matches('/');
        if self.path.starts_with('/') {
            format!("{base}{}", self.path)
        } else {
            format!("{base}/{}", self.path)
        }
    }
}
