//! One-shot activity poll for callers that cannot hold a long-running loop.

use serde::Serialize;

use crate::github::RepositorySlug;
use crate::notifications::{ActivityPoller, NotificationRecord};

use super::{FeatureContext, FeatureReport};

/// Records produced by a single poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityReport {
    /// Repository polled.
    pub repository: String,
    /// Log the records were appended to.
    pub log_path: String,
    /// New records, oldest first.
    pub notifications: Vec<NotificationRecord>,
}

/// Polls once, resuming after the newest event already in the log so that
/// repeated calls never record the same event twice.
pub(super) async fn run(context: FeatureContext<'_>, repository: &RepositorySlug) -> FeatureReport {
    let last_seen = context
        .notifications
        .latest_time_for(&repository.to_string());
    let mut poller = ActivityPoller::resume(repository.clone(), last_seen);
    let notifications = poller.tick(context.gateway, context.notifications).await;

    FeatureReport::Activity(ActivityReport {
        repository: repository.to_string(),
        log_path: context.notifications.path().to_string(),
        notifications,
    })
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::ai::completion::MockCompletionService;
    use crate::github::RepositoryEvent;
    use crate::github::gateway::MockRepositoryGateway;
    use crate::http::FetchResult;
    use crate::notifications::NotificationLog;

    fn issue(time: &str, number: u64) -> RepositoryEvent {
        RepositoryEvent {
            kind: "IssuesEvent".to_owned(),
            actor: Some("grace".to_owned()),
            created_at: Some(time.to_owned()),
            payload: json!({"issue": {"number": number, "title": "Bug"}}),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn repeated_polls_do_not_duplicate_events() {
        let dir = TempDir::new().expect("temporary directory should be created");
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .expect("temporary path should be UTF-8");
        let log = NotificationLog::new(base.join("notifications.json"));
        let slug = RepositorySlug::parse("octocat/hello").expect("slug should parse");
        let mut gateway = MockRepositoryGateway::new();
        gateway.expect_recent_events().returning(|_, _| {
            FetchResult::Success(vec![
                issue("2024-05-01T11:00:00Z", 2),
                issue("2024-05-01T10:00:00Z", 1),
            ])
        });
        let completion = MockCompletionService::new();
        let context = FeatureContext {
            gateway: &gateway,
            completion: &completion,
            notifications: &log,
        };

        let FeatureReport::Activity(first) = run(context, &slug).await else {
            panic!("expected an activity report");
        };
        let FeatureReport::Activity(second) = run(context, &slug).await else {
            panic!("expected an activity report");
        };

        assert_eq!(first.notifications.len(), 2);
        assert!(second.notifications.is_empty());
        assert_eq!(log.load().len(), 2);
    }
}
