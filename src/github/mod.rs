//! Read-only access to GitHub repositories.
//!
//! The gateway speaks to the REST API and the raw-content mirror; the intake
//! facade layers the "most recent" and branch fallback rules on top.

pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod repository_intake;

pub use gateway::{RepositoryGateway, RestGateway};
pub use locator::{DEFAULT_BRANCH, RepositorySlug, branch_candidates};
pub use models::{
    ChangedFile, CommitDetail, CommitSummary, PullRequestDetail, PullRequestSummary,
    RepositoryEvent, RepositorySummary, TreeEntry, TreeEntryKind,
};
pub use pagination::{PageLimits, PageSource, fetch_all, fetch_all_as};
pub use repository_intake::{BranchTree, RepositoryIntake};
