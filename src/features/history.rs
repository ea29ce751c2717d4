//! Commit timeline and narrative history summary.

use std::collections::HashMap;

use chrono::DateTime;
use minijinja::context;
use serde::Serialize;

use crate::ai::{PromptTemplate, complete_or_notice, render_prompt};
use crate::error::InsightError;
use crate::github::{CommitSummary, PageLimits, RepositorySlug};
use crate::text::leading_chars;

use super::{FeatureContext, FeatureReport};

/// Commits requested per page.
pub const PAGE_SIZE: u32 = 100;

/// Commits shown in the timeline and sent for summary.
pub const TIMELINE_LENGTH: usize = 50;

/// Authors listed in the report.
pub const TOP_AUTHORS: usize = 5;

const MESSAGE_CHARS: usize = 100;
const SHORT_SHA: usize = 7;

/// Timeline and summary of a repository's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryReport {
    /// Repository summarised.
    pub repository: String,
    /// Commits read.
    pub total_commits: usize,
    /// `YYYY-MM-DD HH:MM | sha | author: subject`, sorted.
    pub timeline: Vec<String>,
    /// Model summary; absent when no commit had a message.
    pub summary: Option<String>,
    /// Most frequent commit authors.
    pub top_authors: Vec<AuthorCount>,
}

/// Commit count for one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorCount {
    /// Author name.
    pub author: String,
    /// Commits authored.
    pub commits: usize,
}

pub(super) async fn run(
    context: FeatureContext<'_>,
    repository: &RepositorySlug,
) -> Result<FeatureReport, InsightError> {
    let commits = context
        .gateway
        .list_commits(repository, PageLimits::unbounded(PAGE_SIZE))
        .await;
    if commits.is_empty() {
        return Ok(FeatureReport::unavailable(format!(
            "No commits found in {repository}"
        )));
    }

    let subjects: Vec<&str> = commits
        .iter()
        .take(TIMELINE_LENGTH)
        .map(|commit| subject(&commit.message))
        .filter(|subject| !subject.is_empty())
        .collect();
    let summary = if subjects.is_empty() {
        None
    } else {
        let prompt = render_prompt(
            PromptTemplate::HistorySummary,
            context! { messages => subjects },
        )?;
        Some(complete_or_notice(context.completion, prompt.as_str()).await)
    };

    Ok(FeatureReport::History(HistoryReport {
        repository: repository.to_string(),
        total_commits: commits.len(),
        timeline: timeline(&commits),
        summary,
        top_authors: top_authors(&commits),
    }))
}

fn subject(message: &str) -> &str {
    leading_chars(message.lines().next().unwrap_or_default(), MESSAGE_CHARS)
}

/// Timeline entries for the newest commits, sorted chronologically.
///
/// Commits without a parseable author date are left out.
#[must_use]
pub fn timeline(commits: &[CommitSummary]) -> Vec<String> {
    let mut entries: Vec<String> = commits
        .iter()
        .take(TIMELINE_LENGTH)
        .filter_map(|commit| {
            let date = DateTime::parse_from_rfc3339(commit.authored_at.as_deref()?).ok()?;
            Some(format!(
                "{} | {} | {}: {}",
                date.format("%Y-%m-%d %H:%M"),
                leading_chars(&commit.sha, SHORT_SHA),
                commit.author_name.as_deref().unwrap_or("unknown"),
                subject(&commit.message)
            ))
        })
        .collect();
    entries.sort();
    entries
}

fn top_authors(commits: &[CommitSummary]) -> Vec<AuthorCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for commit in commits {
        let author = commit.author_name.as_deref().unwrap_or("unknown");
        let count = counts.entry(author).or_default();
        *count = count.saturating_add(1);
    }

    let mut ranked: Vec<AuthorCount> = counts
        .into_iter()
        .map(|(author, commits)| AuthorCount {
            author: author.to_owned(),
            commits,
        })
        .collect();
    ranked.sort_by(|left, right| {
        right
            .commits
            .cmp(&left.commits)
            .then_with(|| left.author.cmp(&right.author))
    });
    ranked.truncate(TOP_AUTHORS);
    ranked
}
