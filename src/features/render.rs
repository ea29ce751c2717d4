//! Console rendering of feature reports.

use std::io::{self, Write};

use crate::error::InsightError;
use crate::notifications::write_notification;

use super::code_review::{CodeReviewReport, FileReviewOutcome};
use super::commit_intent::CommitIntentReport;
use super::docs::{DocumentationReport, DocumentationStatus};
use super::history::HistoryReport;
use super::onboarding::{FileNode, OnboardingReport};
use super::productivity::ProductivityReport;
use super::security::SecurityReport;
use super::{Feature, FeatureReport};

const RULE_WIDTH: usize = 60;

/// Writes `report` for `feature` in the console layout.
///
/// # Errors
///
/// Returns [`InsightError::Io`] when writing to `out` fails.
pub fn write_report<W: Write>(
    out: &mut W,
    feature: Feature,
    report: &FeatureReport,
) -> Result<(), InsightError> {
    write_sections(out, feature, report).map_err(|error| InsightError::io(&error))
}

fn write_sections<W: Write>(out: &mut W, feature: Feature, report: &FeatureReport) -> io::Result<()> {
    writeln!(out, "\n=== {} ===", feature.name())?;
    match report {
        FeatureReport::CodeReview(review) => write_code_review(out, review),
        FeatureReport::Productivity(metrics) => write_productivity(out, metrics),
        FeatureReport::CommitIntent(intent) => write_commit_intent(out, intent),
        FeatureReport::Documentation(docs) => write_documentation(out, docs),
        FeatureReport::SecurityScan(scan) => write_security(out, scan),
        FeatureReport::History(history) => write_history(out, history),
        FeatureReport::Onboarding(onboarding) => write_onboarding(out, onboarding),
        FeatureReport::Activity(activity) => {
            writeln!(
                out,
                "{} new notification(s) for {} saved to {}",
                activity.notifications.len(),
                activity.repository,
                activity.log_path
            )?;
            for record in &activity.notifications {
                write_notification(out, record).map_err(io::Error::other)?;
            }
            Ok(())
        }
        FeatureReport::Unavailable { message, .. } => writeln!(out, "{message}"),
    }
}

fn rule<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

fn write_code_review<W: Write>(out: &mut W, report: &CodeReviewReport) -> io::Result<()> {
    let pull = &report.pull_request;
    writeln!(
        out,
        "Pull request #{} {}: {} file(s) changed",
        pull.number,
        pull.title.as_deref().unwrap_or_default(),
        pull.files_changed
    )?;
    for (index, file) in pull.files.iter().enumerate() {
        let position = index.saturating_add(1);
        match &file.outcome {
            FileReviewOutcome::Reviewed { review } => {
                writeln!(out, "\n{position}. {}", file.filename)?;
                writeln!(out, "Changes analysed: {}", file.changes_analysed)?;
                writeln!(out, "Review suggestions:\n{review}")?;
                rule(out)?;
            }
            FileReviewOutcome::NoPatch => {
                writeln!(out, "{position}. {} - no changes to review", file.filename)?;
            }
            FileReviewOutcome::NoChanges => writeln!(
                out,
                "{position}. {} - no significant code changes detected",
                file.filename
            )?,
        }
    }
    Ok(())
}

fn write_productivity<W: Write>(out: &mut W, report: &ProductivityReport) -> io::Result<()> {
    writeln!(out, "Productivity metrics for {}:", report.repository)?;
    writeln!(
        out,
        "  Avg PR turnaround time: {:.1} hours ({:.1} days)",
        report.average_turnaround_hours, report.average_turnaround_days
    )?;
    writeln!(out, "  Total merged PRs: {}", report.merged_pull_requests)?;
    writeln!(out, "  Total lines added: {}", report.lines_added)?;
    writeln!(out, "  Total lines deleted: {}", report.lines_deleted)?;
    writeln!(out, "  Net lines changed: {}", report.net_lines)?;
    writeln!(out, "  Unique contributors: {}", report.unique_contributors)?;
    writeln!(
        out,
        "  Avg changes per PR: {:.0} lines",
        report.average_changes_per_pull_request
    )
}

fn write_commit_intent<W: Write>(out: &mut W, report: &CommitIntentReport) -> io::Result<()> {
    let assessment = &report.assessment;
    writeln!(out, "Commit {} in {}", report.sha, report.repository)?;
    writeln!(out, "Message: {}", report.message.trim())?;
    writeln!(
        out,
        "Rating: {:?} ({}/10)",
        assessment.rating, assessment.score
    )?;
    writeln!(out, "Message accuracy: {:?}", assessment.message_accuracy)?;
    writeln!(out, "Message practices: {:?}", assessment.message_practices)?;
    writeln!(out, "Cohesion: {:?}", assessment.cohesion)?;
    for suggestion in &assessment.suggestions {
        writeln!(out, "  - {suggestion}")?;
    }
    writeln!(out, "Summary: {}", assessment.summary)
}

fn write_documentation<W: Write>(out: &mut W, report: &DocumentationReport) -> io::Result<()> {
    if report.docs.is_empty() {
        return writeln!(out, "No documentable files found in {}", report.repo);
    }
    for doc in &report.docs {
        let status = match doc.status {
            DocumentationStatus::Completed => "completed",
            DocumentationStatus::Failed => "failed",
        };
        writeln!(out, "\nDocumentation for {} ({status}):", doc.path)?;
        writeln!(out, "{}", doc.documentation)?;
        rule(out)?;
    }
    Ok(())
}

fn write_security<W: Write>(out: &mut W, report: &SecurityReport) -> io::Result<()> {
    writeln!(
        out,
        "Security scan on PR #{} for {}: {} file(s) changed",
        report.pull_request, report.repository, report.files_changed
    )?;
    for file in &report.files {
        match &file.analysis {
            Some(analysis) => {
                writeln!(out, "\nFile: {}", file.filename)?;
                writeln!(out, "Lines scanned: {}", file.lines_scanned)?;
                writeln!(out, "Analysis:\n{analysis}")?;
                rule(out)?;
            }
            None => writeln!(out, "{} - no added lines to scan", file.filename)?,
        }
    }
    Ok(())
}

fn write_history<W: Write>(out: &mut W, report: &HistoryReport) -> io::Result<()> {
    writeln!(
        out,
        "{} commit(s) in {}\n\nCommit timeline:",
        report.total_commits, report.repository
    )?;
    for entry in &report.timeline {
        writeln!(out, "  {entry}")?;
    }
    writeln!(out, "\nTop authors:")?;
    for author in &report.top_authors {
        writeln!(out, "  {}: {} commit(s)", author.author, author.commits)?;
    }
    match &report.summary {
        Some(summary) => writeln!(out, "\nRepository summary:\n{summary}"),
        None => writeln!(out, "\nRepository summary: no commit messages to summarise."),
    }
}

fn write_onboarding<W: Write>(out: &mut W, report: &OnboardingReport) -> io::Result<()> {
    writeln!(out, "Repository: {} ({})", report.repository, report.branch)?;
    if let Some(overview) = &report.overview {
        if let Some(description) = &overview.description {
            writeln!(out, "Description: {description}")?;
        }
        writeln!(
            out,
            "Language: {} | Stars: {} | Forks: {}",
            overview.language.as_deref().unwrap_or("unknown"),
            overview.stars,
            overview.forks
        )?;
    }
    writeln!(out, "\nStructure:")?;
    write_tree(out, &report.files, 1)?;
    for (path, analysis) in &report.analyses {
        writeln!(out, "\n{path} [{}]", analysis.complexity)?;
        writeln!(out, "{}", analysis.description)?;
        if !analysis.functions.is_empty() {
            writeln!(out, "Key items: {}", analysis.functions.join(", "))?;
        }
        for suggestion in &analysis.suggestions {
            writeln!(out, "  - {suggestion}")?;
        }
    }
    Ok(())
}

fn write_tree<W: Write>(out: &mut W, nodes: &[FileNode], depth: usize) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    for node in nodes {
        let name = node.path().rsplit('/').next().unwrap_or_default();
        match node {
            FileNode::File { language, .. } => writeln!(out, "{indent}{name} ({language})")?,
            FileNode::Folder { children, .. } => {
                writeln!(out, "{indent}{name}/")?;
                write_tree(out, children, depth.saturating_add(1))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::features::history::AuthorCount;

    fn rendered(feature: Feature, report: &FeatureReport) -> String {
        let mut out = Vec::new();
        write_report(&mut out, feature, report).expect("rendering should succeed");
        String::from_utf8(out).expect("output should be UTF-8")
    }

    #[rstest]
    fn unavailable_reports_print_their_message() {
        let text = rendered(
            Feature::SecurityScan,
            &FeatureReport::unavailable("No recent pull requests found in a/b"),
        );

        assert!(text.contains("=== Security Scan with AI ==="));
        assert!(text.contains("No recent pull requests found in a/b"));
    }

    #[rstest]
    fn productivity_rounds_averages() {
        let report = FeatureReport::Productivity(ProductivityReport {
            repository: "a/b".to_owned(),
            pull_requests_examined: 4,
            merged_pull_requests: 3,
            average_turnaround_hours: 36.04,
            average_turnaround_days: 1.501_666,
            lines_added: 35,
            lines_deleted: 25,
            net_lines: 10,
            unique_contributors: 2,
            contributors: vec!["ada".to_owned(), "linus".to_owned()],
            average_changes_per_pull_request: 20.0,
        });

        let text = rendered(Feature::Productivity, &report);

        assert!(text.contains("Avg PR turnaround time: 36.0 hours (1.5 days)"));
        assert!(text.contains("Avg changes per PR: 20 lines"));
    }

    #[rstest]
    fn history_without_summary_says_so() {
        let report = FeatureReport::History(HistoryReport {
            repository: "a/b".to_owned(),
            total_commits: 1,
            timeline: vec!["2024-05-01 08:00 | abcdef1 | ada: Start".to_owned()],
            summary: None,
            top_authors: vec![AuthorCount {
                author: "ada".to_owned(),
                commits: 1,
            }],
        });

        let text = rendered(Feature::History, &report);

        assert!(text.contains("  2024-05-01 08:00 | abcdef1 | ada: Start"));
        assert!(text.contains("no commit messages to summarise"));
    }
}
