//! Long-poll loop over the repository events feed.
//!
//! Each tick reads the newest events, walks them oldest first, and records
//! every allow-listed event newer than the last one seen. Timestamps are
//! ISO-8601 UTC strings from the same feed, so plain string ordering matches
//! chronological ordering.

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use crate::error::InsightError;
use crate::github::{RepositoryGateway, RepositorySlug};
use crate::http::FetchResult;

use super::event::{EventKind, describe_event};
use super::log::NotificationLog;
use super::record::NotificationRecord;

/// Feed entries requested per tick.
pub const EVENT_BATCH_SIZE: u32 = 50;

/// Default delay between ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Poller state for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityPoller {
    repository: RepositorySlug,
    last_seen: Option<String>,
}

impl ActivityPoller {
    /// Creates a poller that has not seen any event yet.
    #[must_use]
    pub const fn new(repository: RepositorySlug) -> Self {
        Self {
            repository,
            last_seen: None,
        }
    }

    /// Creates a poller that treats events at or before `last_seen` as
    /// already recorded.
    #[must_use]
    pub const fn resume(repository: RepositorySlug, last_seen: Option<String>) -> Self {
        Self {
            repository,
            last_seen,
        }
    }

    /// Repository being watched.
    #[must_use]
    pub const fn repository(&self) -> &RepositorySlug {
        &self.repository
    }

    /// Timestamp of the newest recorded event.
    #[must_use]
    pub fn last_seen(&self) -> Option<&str> {
        self.last_seen.as_deref()
    }

    /// Runs one poll and returns the records produced, oldest first.
    ///
    /// A failed feed fetch yields no records and leaves the state unchanged.
    /// Records that cannot be persisted are still returned and still advance
    /// the state.
    pub async fn tick(
        &mut self,
        gateway: &dyn RepositoryGateway,
        log: &NotificationLog,
    ) -> Vec<NotificationRecord> {
        let events = match gateway
            .recent_events(&self.repository, EVENT_BATCH_SIZE)
            .await
        {
            FetchResult::Success(events) => events,
            other => {
                tracing::warn!(
                    "events feed for {} unavailable: {}",
                    self.repository,
                    other.failure_description().unwrap_or_default()
                );
                return Vec::new();
            }
        };

        let mut recorded = Vec::new();
        for event in events.iter().rev() {
            let Some(kind) = EventKind::from_feed_type(&event.kind) else {
                continue;
            };
            let Some(created_at) = event.created_at.as_deref().filter(|time| !time.is_empty())
            else {
                tracing::debug!("skipping {} without a timestamp", event.kind);
                continue;
            };
            if self
                .last_seen
                .as_deref()
                .is_some_and(|seen| created_at <= seen)
            {
                continue;
            }

            let updates = describe_event(gateway, &self.repository, kind, event).await;
            let record = NotificationRecord {
                repository: self.repository.to_string(),
                event: kind.label().to_owned(),
                actor: event.actor.clone().unwrap_or_else(|| "unknown".to_owned()),
                time: created_at.to_owned(),
                operation: kind.operation().to_owned(),
                updates,
            };

            if let Err(error) = log.append(&record) {
                tracing::error!("failed to persist notification: {error}");
            }
            self.last_seen = Some(created_at.to_owned());
            recorded.push(record);
        }

        recorded
    }
}

/// Totals from a finished polling session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// Ticks completed.
    pub ticks: u64,
    /// Notifications recorded across all ticks.
    pub notifications: u64,
}

/// Polls until `shutdown` resolves, writing each notification to `out`.
///
/// A tick that is in flight when `shutdown` fires runs to completion before
/// the loop exits; the sleep between ticks is cut short.
///
/// # Errors
///
/// Returns [`InsightError::Io`] when writing to `out` fails.
pub async fn run_until_shutdown<W, F>(
    poller: &mut ActivityPoller,
    gateway: &dyn RepositoryGateway,
    log: &NotificationLog,
    interval: Duration,
    out: &mut W,
    shutdown: F,
) -> Result<PollSummary, InsightError>
where
    W: Write,
    F: Future<Output = ()>,
{
    let mut summary = PollSummary::default();
    tokio::pin!(shutdown);

    loop {
        let mut interrupted = false;
        let records = {
            let tick = poller.tick(gateway, log);
            tokio::pin!(tick);
            tokio::select! {
                records = &mut tick => records,
                () = &mut shutdown => {
                    interrupted = true;
                    tick.await
                }
            }
        };

        summary.ticks = summary.ticks.saturating_add(1);
        for record in &records {
            write_notification(out, record)?;
            summary.notifications = summary.notifications.saturating_add(1);
        }
        if interrupted {
            break;
        }

        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            () = &mut shutdown => break,
        }
    }

    tracing::info!(
        "activity polling stopped after {} ticks ({} notifications)",
        summary.ticks,
        summary.notifications
    );
    Ok(summary)
}

/// Writes one notification in the console format.
///
/// # Errors
///
/// Returns [`InsightError::Io`] when writing fails.
pub fn write_notification<W: Write>(
    out: &mut W,
    record: &NotificationRecord,
) -> Result<(), InsightError> {
    writeln!(
        out,
        "[{}] {} on {} by {} ({})\n    {}",
        record.time, record.event, record.repository, record.actor, record.operation, record.updates
    )
    .map_err(|error| InsightError::io(&error))
}
