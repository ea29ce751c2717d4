//! Feature orchestrators.
//!
//! Each feature drives the repository gateway and the completion service in
//! sequence and returns a serialisable report. Remote failures are absorbed
//! into the report; only local failures such as template rendering surface as
//! [`InsightError`].

pub mod activity;
pub mod code_review;
pub mod commit_intent;
pub mod docs;
pub mod history;
pub mod language;
pub mod onboarding;
pub mod patch;
pub mod productivity;
pub mod render;
pub mod security;

use serde::Serialize;

use crate::ai::CompletionService;
use crate::error::InsightError;
use crate::github::{RepositoryGateway, RepositorySlug};
use crate::notifications::NotificationLog;

pub use activity::ActivityReport;
pub use code_review::{CodeReviewReport, FileReview, FileReviewOutcome, PullRequestReview};
pub use commit_intent::CommitIntentReport;
pub use docs::{DocumentationReport, DocumentedComponent, DocumentedFile, DocumentationStatus};
pub use history::{AuthorCount, HistoryReport};
pub use language::infer_language;
pub use onboarding::{FileNode, OnboardingReport, RepositoryOverview};
pub use productivity::ProductivityReport;
pub use render::write_report;
pub use security::{FileScan, SecurityReport};

/// The catalogued features, numbered as presented to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Reviews the changed lines of the most recent pull request.
    CodeReview,
    /// Merge turnaround and line-count metrics.
    Productivity,
    /// Assesses the newest commit message against its diff.
    CommitIntent,
    /// Generates documentation for repository files.
    Documentation,
    /// Scans lines added by the most recent pull request.
    SecurityScan,
    /// Commit timeline and narrative summary.
    History,
    /// Repository structure and starter file analyses.
    Onboarding,
    /// Records collaborator activity to the notification log.
    Activity,
}

impl Feature {
    /// Every feature in menu order.
    pub const ALL: [Self; 8] = [
        Self::CodeReview,
        Self::Productivity,
        Self::CommitIntent,
        Self::Documentation,
        Self::SecurityScan,
        Self::History,
        Self::Onboarding,
        Self::Activity,
    ];

    /// Numeric selector, 1 to 8.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::CodeReview => 1,
            Self::Productivity => 2,
            Self::CommitIntent => 3,
            Self::Documentation => 4,
            Self::SecurityScan => 5,
            Self::History => 6,
            Self::Onboarding => 7,
            Self::Activity => 8,
        }
    }

    /// Looks a feature up by its selector.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::CodeReview),
            2 => Some(Self::Productivity),
            3 => Some(Self::CommitIntent),
            4 => Some(Self::Documentation),
            5 => Some(Self::SecurityScan),
            6 => Some(Self::History),
            7 => Some(Self::Onboarding),
            8 => Some(Self::Activity),
            _ => None,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CodeReview => "Smart Code Reviewer",
            Self::Productivity => "Developer Productivity Insights",
            Self::CommitIntent => "Commit Intent Analyzer",
            Self::Documentation => "AI-Powered Documentation Generator",
            Self::SecurityScan => "Security Scan with AI",
            Self::History => "Visual Git History + Repository Summary",
            Self::Onboarding => "Onboarding Assistant",
            Self::Activity => "Activity Notifier",
        }
    }

    /// One-line description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::CodeReview => "Analyzes most recent PR",
            Self::Productivity => "Productivity metrics",
            Self::CommitIntent => "Analyzes most recent commit",
            Self::Documentation => "Generates docs for recent files",
            Self::SecurityScan => "Scans most recent PR",
            Self::History => "Entire history",
            Self::Onboarding => "Understand repo structure",
            Self::Activity => "Tracks collaborator actions to JSON",
        }
    }

    /// Whether the feature sends prompts to the model.
    #[must_use]
    pub const fn uses_model(self) -> bool {
        !matches!(self, Self::Productivity | Self::Activity)
    }
}

/// Catalogue entry as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureDescriptor {
    /// Numeric selector.
    pub id: u8,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
}

impl From<Feature> for FeatureDescriptor {
    fn from(feature: Feature) -> Self {
        Self {
            id: feature.id(),
            name: feature.name(),
            description: feature.description(),
        }
    }
}

/// Descriptors for every feature in menu order.
#[must_use]
pub fn catalogue() -> Vec<FeatureDescriptor> {
    Feature::ALL.into_iter().map(FeatureDescriptor::from).collect()
}

/// Services a feature run borrows.
#[derive(Clone, Copy)]
pub struct FeatureContext<'a> {
    /// GitHub access.
    pub gateway: &'a dyn RepositoryGateway,
    /// Model access.
    pub completion: &'a dyn CompletionService,
    /// Notification store used by the activity feature.
    pub notifications: &'a NotificationLog,
}

/// Repository a feature runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureTarget {
    /// Repository slug.
    pub repository: RepositorySlug,
    /// Branch for tree and content reads; the default branch when absent.
    pub branch: Option<String>,
}

impl FeatureTarget {
    /// Targets the default branch of `repository`.
    #[must_use]
    pub const fn new(repository: RepositorySlug) -> Self {
        Self {
            repository,
            branch: None,
        }
    }

    /// Sets the branch used for tree and content reads.
    #[must_use]
    pub fn with_branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch.filter(|name| !name.trim().is_empty());
        self
    }
}

/// Report produced by one feature run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureReport {
    /// Smart code review.
    CodeReview(CodeReviewReport),
    /// Productivity metrics.
    Productivity(ProductivityReport),
    /// Commit intent assessment.
    CommitIntent(CommitIntentReport),
    /// Generated documentation.
    Documentation(DocumentationReport),
    /// Security scan.
    SecurityScan(SecurityReport),
    /// History timeline and summary.
    History(HistoryReport),
    /// Onboarding overview.
    Onboarding(OnboardingReport),
    /// Activity recorded in one poll.
    Activity(ActivityReport),
    /// Nothing to report, e.g. a repository without pull requests.
    Unavailable {
        /// Always `unavailable`.
        status: &'static str,
        /// Explanation shown to the user.
        message: String,
    },
}

impl FeatureReport {
    /// Report explaining why a feature had nothing to work on.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            status: "unavailable",
            message: message.into(),
        }
    }
}

/// Runs `feature` against `target`.
///
/// # Errors
///
/// Returns [`InsightError::Template`] when a prompt fails to render. Remote
/// failures never produce an error; they are reflected in the report.
pub async fn run_feature(
    feature: Feature,
    context: FeatureContext<'_>,
    target: &FeatureTarget,
) -> Result<FeatureReport, InsightError> {
    tracing::info!("running {} for {}", feature.name(), target.repository);
    match feature {
        Feature::CodeReview => code_review::run(context, &target.repository).await,
        Feature::Productivity => Ok(productivity::run(context, &target.repository).await),
        Feature::CommitIntent => commit_intent::run(context, &target.repository).await,
        Feature::Documentation => docs::run(context, target).await,
        Feature::SecurityScan => security::run(context, &target.repository).await,
        Feature::History => history::run(context, &target.repository).await,
        Feature::Onboarding => onboarding::run(context, target).await,
        Feature::Activity => Ok(activity::run(context, &target.repository).await),
    }
}
