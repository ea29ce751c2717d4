//! Repository identifiers and branch fallback rules.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::InsightError;

/// Branch assumed when the caller does not name one.
pub const DEFAULT_BRANCH: &str = "main";

/// Branch tried when the default branch does not exist.
pub const LEGACY_DEFAULT_BRANCH: &str = "master";

/// Validated `owner/repo` repository identifier.
///
/// # Example
///
/// ```
/// use repopulse::github::RepositorySlug;
///
/// let slug = RepositorySlug::parse("rust-lang/cargo").expect("valid slug");
/// assert_eq!(slug.owner(), "rust-lang");
/// assert_eq!(slug.name(), "cargo");
/// assert_eq!(slug.to_string(), "rust-lang/cargo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositorySlug {
    owner: String,
    name: String,
}

impl RepositorySlug {
    /// Parses `owner/repo`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::InvalidRepository`] when the input is not
    /// exactly two non-empty segments of GitHub-safe characters.
    pub fn parse(input: &str) -> Result<Self, InsightError> {
        let invalid = || InsightError::InvalidRepository {
            input: input.to_owned(),
        };
        let (owner, name) = input.trim().split_once('/').ok_or_else(invalid)?;

        if !is_valid_segment(owner) || !is_valid_segment(name) {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_owned(),
            name: name.to_owned(),
        })
    }

    /// Repository owner (user or organisation).
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// REST path prefix for this repository, e.g. `/repos/owner/name`.
    #[must_use]
    pub fn api_path(&self) -> String {
        format!("/repos/{}/{}", self.owner, self.name)
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || "-_.".contains(character))
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositorySlug {
    type Err = InsightError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

impl Serialize for RepositorySlug {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Branches to try, in order, when reading content for `requested`.
///
/// The requested branch (or `main`) comes first. `main` falls back to
/// `master`; any other branch falls back to `main`.
#[must_use]
pub fn branch_candidates(requested: Option<&str>) -> Vec<String> {
    let primary = requested
        .map(str::trim)
        .filter(|branch| !branch.is_empty())
        .unwrap_or(DEFAULT_BRANCH);
    let fallback = if primary == DEFAULT_BRANCH {
        LEGACY_DEFAULT_BRANCH
    } else {
        DEFAULT_BRANCH
    };
    vec![primary.to_owned(), fallback.to_owned()]
}
