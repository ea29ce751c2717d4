//! Classified outcome of a single upstream HTTP call.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Outcome of one HTTP request against an upstream service.
///
/// Every call made through [`super::HttpClient`] resolves to exactly one of
/// these variants; transport failures never escape as panics or errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult<T = Value> {
    /// The request succeeded and the body decoded.
    Success(T),
    /// The upstream answered 404.
    NotFound,
    /// The request never produced a usable response, or the body could not
    /// be decoded.
    TransportError(String),
    /// The upstream answered with a non-2xx status other than 404.
    StatusError {
        /// HTTP status code.
        code: u16,
        /// Response body, possibly shortened.
        body: String,
    },
}

impl<T> FetchResult<T> {
    /// Transforms the success payload, leaving failures untouched.
    pub fn map<U>(self, transform: impl FnOnce(T) -> U) -> FetchResult<U> {
        match self {
            Self::Success(value) => FetchResult::Success(transform(value)),
            Self::NotFound => FetchResult::NotFound,
            Self::TransportError(message) => FetchResult::TransportError(message),
            Self::StatusError { code, body } => FetchResult::StatusError { code, body },
        }
    }

    /// Returns the success payload, discarding failure detail.
    #[must_use]
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Returns `true` for [`FetchResult::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` for [`FetchResult::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Human-readable description of a failure, or `None` on success.
    #[must_use]
    pub fn failure_description(&self) -> Option<String> {
        match self {
            Self::Success(_) => None,
            Self::NotFound => Some("resource not found".to_owned()),
            Self::TransportError(message) => Some(format!("request failed: {message}")),
            Self::StatusError { code, body } => Some(format!("status {code}: {body}")),
        }
    }
}

impl FetchResult<Value> {
    /// Decodes a JSON payload into `T`.
    ///
    /// A payload that does not match the expected shape becomes a
    /// [`FetchResult::TransportError`].
    #[must_use]
    pub fn decode<T: DeserializeOwned>(self) -> FetchResult<T> {
        match self {
            Self::Success(value) => match serde_json::from_value(value) {
                Ok(decoded) => FetchResult::Success(decoded),
                Err(error) => FetchResult::TransportError(format!(
                    "response body did not match the expected shape: {error}"
                )),
            },
            Self::NotFound => FetchResult::NotFound,
            Self::TransportError(message) => FetchResult::TransportError(message),
            Self::StatusError { code, body } => FetchResult::StatusError { code, body },
        }
    }
}
