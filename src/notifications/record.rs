//! Notification records persisted by the activity poller.

use serde::{Deserialize, Serialize};

/// One observed repository event, as stored in the notification log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// `owner/repo`.
    pub repository: String,
    /// Event label: `Push`, `Pull Request`, `Issues`, or `Issue Comment`.
    pub event: String,
    /// Login of the user who triggered the event.
    pub actor: String,
    /// ISO-8601 UTC timestamp from the event feed.
    pub time: String,
    /// Short operation label, e.g. `git push`.
    pub operation: String,
    /// Human-readable summary of what changed.
    pub updates: String,
}
