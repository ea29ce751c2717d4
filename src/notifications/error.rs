//! Errors raised while persisting notifications.

use thiserror::Error;

/// Failure to append to the notification log.
///
/// The poller logs these and keeps running; they never end a session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationLogError {
    /// The log path has no file name component.
    #[error("notification log path '{path}' has no file name")]
    InvalidPath {
        /// Configured path.
        path: String,
    },

    /// The parent directory could not be opened or created.
    #[error("failed to prepare notification directory '{path}': {message}")]
    Directory {
        /// Directory path.
        path: String,
        /// Error detail.
        message: String,
    },

    /// The record list could not be serialised.
    #[error("failed to serialise notifications: {message}")]
    Serialise {
        /// Error detail.
        message: String,
    },

    /// Writing or replacing the log file failed.
    #[error("failed to write notification log '{path}': {message}")]
    Write {
        /// Log path.
        path: String,
        /// Error detail.
        message: String,
    },
}
