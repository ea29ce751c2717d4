//! Developer productivity metrics derived from merged pull requests.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::github::{PageLimits, PullRequestSummary, RepositorySlug};
use crate::http::FetchResult;

use super::{FeatureContext, FeatureReport};

/// Pull requests requested per page.
pub const PAGE_SIZE: u32 = 50;

/// Pages requested at most.
pub const MAX_PAGES: u32 = 10;

const SECONDS_PER_HOUR: f64 = 3600.0;
const HOURS_PER_DAY: f64 = 24.0;

/// Merge turnaround, line-count, and contributor metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductivityReport {
    /// Repository measured.
    pub repository: String,
    /// Pull requests examined, merged or not.
    pub pull_requests_examined: usize,
    /// Merged pull requests.
    pub merged_pull_requests: usize,
    /// Mean hours from creation to merge.
    pub average_turnaround_hours: f64,
    /// Mean days from creation to merge.
    pub average_turnaround_days: f64,
    /// Lines added by merged pull requests.
    pub lines_added: u64,
    /// Lines deleted by merged pull requests.
    pub lines_deleted: u64,
    /// Added minus deleted.
    pub net_lines: i64,
    /// Distinct authors of merged pull requests.
    pub unique_contributors: usize,
    /// Their logins, sorted.
    pub contributors: Vec<String>,
    /// Mean added plus deleted lines per merged pull request.
    pub average_changes_per_pull_request: f64,
}

#[derive(Debug, Default)]
struct Tally {
    merged: usize,
    turnaround_seconds: Vec<i64>,
    additions: u64,
    deletions: u64,
    contributors: BTreeSet<String>,
}

pub(super) async fn run(context: FeatureContext<'_>, repository: &RepositorySlug) -> FeatureReport {
    let pulls = context
        .gateway
        .list_pull_requests(repository, PageLimits::bounded(PAGE_SIZE, MAX_PAGES))
        .await;
    if pulls.is_empty() {
        return FeatureReport::unavailable(format!("No pull requests found in {repository}"));
    }

    let mut tally = Tally::default();
    for pull in pulls.iter().filter(|pull| pull.merged_at.is_some()) {
        tally.merged = tally.merged.saturating_add(1);
        if let Some(author) = &pull.author {
            tally.contributors.insert(author.clone());
        }
        if let Some(seconds) = turnaround_seconds(pull) {
            tally.turnaround_seconds.push(seconds);
        }

        match context.gateway.pull_request(repository, pull.number).await {
            FetchResult::Success(detail) => {
                tally.additions = tally.additions.saturating_add(detail.additions);
                tally.deletions = tally.deletions.saturating_add(detail.deletions);
            }
            other => tracing::debug!(
                "skipping line counts for #{}: {}",
                pull.number,
                other.failure_description().unwrap_or_default()
            ),
        }
    }

    FeatureReport::Productivity(summarise(repository, pulls.len(), tally))
}

fn turnaround_seconds(pull: &PullRequestSummary) -> Option<i64> {
    let created = parse_timestamp(pull.created_at.as_deref()?)?;
    let merged = parse_timestamp(pull.merged_at.as_deref()?)?;
    Some(merged.signed_duration_since(created).num_seconds())
}

fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .inspect_err(|error| tracing::debug!("unparseable timestamp '{value}': {error}"))
        .ok()
}

fn summarise(repository: &RepositorySlug, examined: usize, tally: Tally) -> ProductivityReport {
    let (hours, days, changes_per_pull) = averages(&tally);
    let added = i64::try_from(tally.additions).unwrap_or(i64::MAX);
    let deleted = i64::try_from(tally.deletions).unwrap_or(i64::MAX);
    ProductivityReport {
        repository: repository.to_string(),
        pull_requests_examined: examined,
        merged_pull_requests: tally.merged,
        average_turnaround_hours: hours,
        average_turnaround_days: days,
        lines_added: tally.additions,
        lines_deleted: tally.deletions,
        net_lines: added.saturating_sub(deleted),
        unique_contributors: tally.contributors.len(),
        contributors: tally.contributors.into_iter().collect(),
        average_changes_per_pull_request: changes_per_pull,
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "averages are reported as fractional values; counts stay far below 2^52"
)]
fn averages(tally: &Tally) -> (f64, f64, f64) {
    let hours = if tally.turnaround_seconds.is_empty() {
        0.0
    } else {
        let total: i64 = tally.turnaround_seconds.iter().sum();
        total as f64 / tally.turnaround_seconds.len() as f64 / SECONDS_PER_HOUR
    };
    let changes = tally.additions.saturating_add(tally.deletions) as f64;
    let per_pull = changes / tally.merged.max(1) as f64;
    (hours, hours / HOURS_PER_DAY, per_pull)
}
