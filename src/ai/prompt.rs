//! Prompt templates rendered with `minijinja`.
//!
//! Callers bound large payloads with [`truncate_with_marker`] before handing
//! them to a template, so every rendered prompt stays within the ceilings of
//! its inputs.

use minijinja::{Environment, Value};

use crate::error::InsightError;

pub use crate::text::{TRUNCATION_MARKER, truncate_with_marker};

/// Ceiling for commit diffs embedded in prompts.
pub const DIFF_CEILING: usize = 2000;

/// Ceiling for file contents embedded in prompts.
pub const FILE_CONTENT_CEILING: usize = 3000;

const CODE_REVIEW: &str = "\
You are an experienced software reviewer. Review the following changes to `{{ filename }}`.

Changes:
{% for line in changes %}{{ line }}
{% endfor %}
Point out likely bugs, readability problems, and concrete improvements. Keep the answer short.";

const COMMIT_INTENT: &str = "\
Assess whether this commit message describes the changes it introduces.

Commit message:
{{ message }}

Diff:
{{ diff }}

Reply with a JSON object inside a ```json fenced block with exactly these fields:
- rating: \"good\", \"fair\" or \"poor\"
- score: integer from 0 to 10
- message_accuracy: \"good\", \"fair\" or \"poor\"
- message_practices: \"good\", \"fair\" or \"poor\"
- cohesion: \"good\", \"fair\" or \"poor\"
- suggestions: array of strings
- summary: one or two sentences";

const DOCUMENTATION: &str = "\
Write developer documentation for the {{ language }} file `{{ filename }}`.

Use this Markdown structure:
# Overview
## Main Components
### name(parameters)
Description: what it does
Example:
```{{ language }}
usage example
```
## Dependencies
## Usage

File content:
```{{ language }}
{{ content }}
```";

const IMAGE_DOCUMENTATION: &str = "\
Document the image asset `{{ filename }}` stored at `{{ path }}` in this repository.

Describe its likely purpose, where it is probably used in the interface, and any accessibility \
notes (suggested alt text). Use Markdown with an # Overview heading.";

const SECURITY_SCAN: &str = "\
Review these lines added to `{{ filename }}` for security issues such as injection, hard-coded \
secrets, unsafe deserialisation, or missing input validation.

{% for line in lines %}{{ line }}
{% endfor %}
List each finding with a severity and a suggested fix. Reply \"No issues found.\" when nothing \
stands out.";

const HISTORY_SUMMARY: &str = "\
Summarise the development history of this repository from its commit messages, oldest first. \
Highlight major milestones, recurring themes, and the overall direction of the project.

{% for message in messages %}- {{ message }}
{% endfor %}";

const FILE_ANALYSIS: &str = "\
Analyse the {{ kind }} file `{{ path }}` for a developer who is new to the project.
{{ focus }}

Content:
{{ content }}

Reply with a JSON object inside a ```json fenced block with exactly these fields:
- description: what the file is for
- functions: array of strings naming the {{ function_label }}
- complexity: \"low\", \"medium\" or \"high\"
- suggestions: array of strings";

/// The prompt shapes the features send to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    /// Review of changed lines in one file.
    CodeReview,
    /// Commit message versus diff assessment, answered as JSON.
    CommitIntent,
    /// Documentation for a source file.
    Documentation,
    /// Documentation for an image asset.
    ImageDocumentation,
    /// Security review of added lines.
    SecurityScan,
    /// Narrative summary of commit history.
    HistorySummary,
    /// Structured analysis of one file, answered as JSON.
    FileAnalysis,
}

impl PromptTemplate {
    /// Template name used for rendering diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CodeReview => "code_review",
            Self::CommitIntent => "commit_intent",
            Self::Documentation => "documentation",
            Self::ImageDocumentation => "image_documentation",
            Self::SecurityScan => "security_scan",
            Self::HistorySummary => "history_summary",
            Self::FileAnalysis => "file_analysis",
        }
    }

    const fn source(self) -> &'static str {
        match self {
            Self::CodeReview => CODE_REVIEW,
            Self::CommitIntent => COMMIT_INTENT,
            Self::Documentation => DOCUMENTATION,
            Self::ImageDocumentation => IMAGE_DOCUMENTATION,
            Self::SecurityScan => SECURITY_SCAN,
            Self::HistorySummary => HISTORY_SUMMARY,
            Self::FileAnalysis => FILE_ANALYSIS,
        }
    }
}

/// A rendered prompt ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    /// Prompt text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Renders `template` with `context`.
///
/// # Errors
///
/// Returns [`InsightError::Template`] when rendering fails, which only
/// happens when the context is missing values the template needs.
pub fn render_prompt(template: PromptTemplate, context: Value) -> Result<Prompt, InsightError> {
    let to_error = |error: minijinja::Error| InsightError::Template {
        template: template.name(),
        message: error.to_string(),
    };

    let mut environment = Environment::new();
    environment.set_auto_escape_callback(|_| minijinja::AutoEscape::None);
    environment.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
    environment
        .add_template(template.name(), template.source())
        .map_err(to_error)?;

    environment
        .get_template(template.name())
        .and_then(|compiled| compiled.render(context))
        .map(Prompt)
        .map_err(to_error)
}
