//! Application-level errors surfaced to the CLI and HTTP boundaries.
//!
//! Remote failures are absorbed close to where they happen and rendered as
//! report content, so the variants here cover input validation, local setup,
//! and the rare unexpected failure that has to reach the outermost handler.

use thiserror::Error;

/// Errors that reach the CLI or HTTP boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InsightError {
    /// The repository identifier did not match `owner/repo`.
    #[error("Invalid repository format. Use 'owner/repo' (got '{input}')")]
    InvalidRepository {
        /// The rejected input.
        input: String,
    },

    /// The feature identifier was not one of the catalogued features.
    #[error("Invalid feature ID. Use 1-8 (got '{input}')")]
    InvalidFeature {
        /// The rejected input.
        input: String,
    },

    /// A request body could not be decoded.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Decoder error detail.
        message: String,
    },

    /// A configured URL could not be parsed.
    #[error("invalid URL for {field}: {message}")]
    InvalidUrl {
        /// Configuration field holding the URL.
        field: &'static str,
        /// Parser error detail.
        message: String,
    },

    /// Configuration could not be loaded or was inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O failed (console, sockets, files).
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// A prompt template failed to render.
    #[error("prompt template '{template}' failed to render: {message}")]
    Template {
        /// Template name.
        template: &'static str,
        /// Renderer error detail.
        message: String,
    },

    /// The HTTP surface failed to bind or serve.
    #[error("HTTP server error: {message}")]
    Server {
        /// Error detail from the server runtime.
        message: String,
    },
}

impl InsightError {
    /// Wraps an I/O error.
    #[must_use]
    pub fn io(error: &std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
