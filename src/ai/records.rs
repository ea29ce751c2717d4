//! Structured records the model is asked to produce.

use serde::{Deserialize, Serialize};

/// Checks applied to a decoded reply before it is accepted.
pub trait StructuredReply: Sized + serde::de::DeserializeOwned {
    /// Field names that must be present in the reply object.
    const REQUIRED_FIELDS: &'static [&'static str];

    /// Record used when the reply cannot be decoded.
    fn fallback(reason: &str) -> Self;

    /// Rejects decoded values outside their allowed range.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Per-file onboarding analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnalysis {
    /// What the file is for.
    pub description: String,
    /// Functions, selectors, or components worth knowing about.
    pub functions: Vec<String>,
    /// `low`, `medium`, `high`, or `unknown`.
    pub complexity: String,
    /// Improvement suggestions.
    pub suggestions: Vec<String>,
}

impl FileAnalysis {
    /// Analysis recorded when a file has no readable content.
    #[must_use]
    pub fn unavailable(path: &str) -> Self {
        Self::fallback(&format!("no content available for {path}"))
    }
}

impl StructuredReply for FileAnalysis {
    const REQUIRED_FIELDS: &'static [&'static str] =
        &["description", "functions", "complexity", "suggestions"];

    fn fallback(reason: &str) -> Self {
        Self {
            description: format!("Analysis unavailable: {reason}"),
            functions: Vec::new(),
            complexity: "unknown".to_owned(),
            suggestions: Vec::new(),
        }
    }
}

/// Three-level quality grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    /// Good.
    #[serde(alias = "Good", alias = "GOOD")]
    Good,
    /// Acceptable with room for improvement.
    #[serde(alias = "Fair", alias = "FAIR")]
    Fair,
    /// Poor.
    #[serde(alias = "Poor", alias = "POOR")]
    Poor,
}

/// Grade of one aspect of a commit, `unknown` when it could not be judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectStatus {
    /// Good.
    #[serde(alias = "Good", alias = "GOOD")]
    Good,
    /// Acceptable with room for improvement.
    #[serde(alias = "Fair", alias = "FAIR")]
    Fair,
    /// Poor.
    #[serde(alias = "Poor", alias = "POOR")]
    Poor,
    /// Not assessed.
    #[serde(alias = "Unknown", alias = "UNKNOWN")]
    Unknown,
}

/// Assessment of how well a commit message matches its changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAssessment {
    /// Overall grade.
    pub rating: Grade,
    /// Score from 0 to 10.
    pub score: u8,
    /// Whether the message describes what changed.
    pub message_accuracy: AspectStatus,
    /// Whether the message follows commit conventions.
    pub message_practices: AspectStatus,
    /// Whether the changes belong together.
    pub cohesion: AspectStatus,
    /// Improvement suggestions.
    pub suggestions: Vec<String>,
    /// Short verdict.
    pub summary: String,
}

/// Score reported when the reply could not be decoded.
pub const NEUTRAL_SCORE: u8 = 5;

/// Highest allowed score.
pub const MAX_SCORE: u8 = 10;

impl StructuredReply for CommitAssessment {
    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "rating",
        "score",
        "message_accuracy",
        "message_practices",
        "cohesion",
        "suggestions",
        "summary",
    ];

    fn fallback(reason: &str) -> Self {
        Self {
            rating: Grade::Fair,
            score: NEUTRAL_SCORE,
            message_accuracy: AspectStatus::Unknown,
            message_practices: AspectStatus::Unknown,
            cohesion: AspectStatus::Unknown,
            suggestions: Vec::new(),
            summary: format!("The model reply could not be interpreted: {reason}"),
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.score > MAX_SCORE {
            return Err(format!(
                "score {} is outside 0-{MAX_SCORE}",
                self.score
            ));
        }
        Ok(())
    }
}
