//! Documentation generation for repository files.

use chrono::{SecondsFormat, Utc};
use minijinja::context;
use serde::Serialize;

use crate::ai::prompt::FILE_CONTENT_CEILING;
use crate::ai::{PromptTemplate, render_prompt};
use crate::error::InsightError;
use crate::github::{RepositoryIntake, TreeEntryKind};
use crate::text::truncate_with_marker;

use super::language::{IMAGE_LANGUAGE, UNKNOWN_LANGUAGE, infer_language};
use super::{FeatureContext, FeatureReport, FeatureTarget};

/// Files documented per run, failures included.
pub const MAX_DOCUMENTED_FILES: usize = 10;

const COMPONENTS_HEADING: &str = "## Main Components";
const NO_DESCRIPTION: &str = "No description provided";

/// Documentation for a set of repository files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentationReport {
    /// Repository documented.
    pub repo: String,
    /// Branch the files were read from.
    pub branch: String,
    /// Per-file documentation in tree order.
    pub docs: Vec<DocumentedFile>,
}

/// Whether a file was documented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentationStatus {
    /// Documentation was generated.
    Completed,
    /// Content or documentation could not be obtained.
    Failed,
}

/// Generated documentation for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentedFile {
    /// Final path component.
    pub filename: String,
    /// Path within the repository.
    pub path: String,
    /// Inferred language.
    pub language: String,
    /// Components listed under the documentation's components section.
    pub functions: Vec<DocumentedComponent>,
    /// Documentation text, or the failure explanation.
    pub documentation: String,
    /// RFC 3339 time the entry was produced.
    pub timestamp: String,
    /// Outcome.
    pub status: DocumentationStatus,
    /// Lines in the documented content.
    #[serde(rename = "linesCount")]
    pub lines_count: usize,
}

/// A function, class, or component described by generated documentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentedComponent {
    /// Component name.
    pub name: String,
    /// Parameter list from the heading.
    pub params: Vec<String>,
    /// Description text.
    pub description: String,
    /// Usage example, empty when none was given.
    pub example: String,
}

pub(super) async fn run(
    context: FeatureContext<'_>,
    target: &FeatureTarget,
) -> Result<FeatureReport, InsightError> {
    let repository = &target.repository;
    let intake = RepositoryIntake::new(context.gateway);
    let Some(tree) = intake
        .tree_with_fallback(repository, target.branch.as_deref())
        .await
    else {
        return Ok(FeatureReport::unavailable(format!(
            "No files found in {repository}"
        )));
    };

    let candidates = tree
        .entries
        .iter()
        .filter(|entry| entry.kind == TreeEntryKind::Blob)
        .map(|entry| (entry.path.as_str(), infer_language(&entry.path)))
        .filter(|(_, language)| *language != UNKNOWN_LANGUAGE)
        .take(MAX_DOCUMENTED_FILES);

    let mut docs = Vec::new();
    for (path, language) in candidates {
        let entry = if language == IMAGE_LANGUAGE {
            document_image(context, path).await?
        } else {
            let content = intake
                .raw_file_with_fallback(repository, Some(&tree.branch), path)
                .await;
            match content {
                Some(content) => document_source(context, path, language, &content).await?,
                None => {
                    tracing::warn!("content for {path} unavailable");
                    failed(path, language, format!("Failed to fetch content for {path}"))
                }
            }
        };
        docs.push(entry);
    }

    tracing::debug!("documented {} files in {repository}", docs.len());
    Ok(FeatureReport::Documentation(DocumentationReport {
        repo: repository.to_string(),
        branch: tree.branch,
        docs,
    }))
}

async fn document_image(
    context: FeatureContext<'_>,
    path: &str,
) -> Result<DocumentedFile, InsightError> {
    let prompt = render_prompt(
        PromptTemplate::ImageDocumentation,
        context! { filename => file_name(path), path => path },
    )?;
    Ok(match context.completion.complete(prompt.as_str()).await {
        Ok(documentation) => completed(path, IMAGE_LANGUAGE, documentation, Vec::new(), 0),
        Err(error) => failed(
            path,
            IMAGE_LANGUAGE,
            format!("Failed to generate documentation for {path}: {error}"),
        ),
    })
}

async fn document_source(
    context: FeatureContext<'_>,
    path: &str,
    language: &str,
    content: &str,
) -> Result<DocumentedFile, InsightError> {
    let bounded = truncate_with_marker(content, FILE_CONTENT_CEILING);
    let prompt = render_prompt(
        PromptTemplate::Documentation,
        context! {
            language => language,
            filename => path,
            content => bounded.as_ref(),
        },
    )?;

    Ok(match context.completion.complete(prompt.as_str()).await {
        Ok(documentation) => {
            let components = extract_components(&documentation);
            let lines = bounded.lines().count();
            completed(path, language, documentation, components, lines)
        }
        Err(error) => failed(
            path,
            language,
            format!("Failed to generate documentation for {path}: {error}"),
        ),
    })
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn completed(
    path: &str,
    language: &str,
    documentation: String,
    functions: Vec<DocumentedComponent>,
    lines_count: usize,
) -> DocumentedFile {
    DocumentedFile {
        filename: file_name(path).to_owned(),
        path: path.to_owned(),
        language: language.to_owned(),
        functions,
        documentation,
        timestamp: now(),
        status: DocumentationStatus::Completed,
        lines_count,
    }
}

fn failed(path: &str, language: &str, documentation: String) -> DocumentedFile {
    DocumentedFile {
        filename: file_name(path).to_owned(),
        path: path.to_owned(),
        language: language.to_owned(),
        functions: Vec::new(),
        documentation,
        timestamp: now(),
        status: DocumentationStatus::Failed,
        lines_count: 0,
    }
}

/// Extracts the components listed under `## Main Components`.
///
/// Each component starts at a `### name(params)` heading and may carry a
/// `Description:` paragraph and a fenced block after `Example:`.
#[must_use]
pub fn extract_components(markdown: &str) -> Vec<DocumentedComponent> {
    let mut lines = markdown.lines();
    if !lines
        .by_ref()
        .any(|line| line.trim_start().starts_with(COMPONENTS_HEADING))
    {
        return Vec::new();
    }

    let mut components = Vec::new();
    let mut current: Option<(DocumentedComponent, Vec<&str>)> = None;
    for line in lines {
        let trimmed = line.trim_start();
        if trimmed.starts_with("## ") {
            break;
        }
        if let Some(heading) = trimmed.strip_prefix("###") {
            if let Some((component, body)) = current.take() {
                components.push(finish_component(component, &body));
            }
            current = Some((parse_heading(heading), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some((component, body)) = current {
        components.push(finish_component(component, &body));
    }
    components
}

fn parse_heading(heading: &str) -> DocumentedComponent {
    let trimmed = heading.trim();
    let (name, params) = match trimmed.split_once('(') {
        Some((name, rest)) => {
            let inner = rest.split_once(')').map_or(rest, |(inner, _)| inner);
            let params = inner
                .split(',')
                .map(str::trim)
                .filter(|param| !param.is_empty())
                .map(str::to_owned)
                .collect();
            (name.trim(), params)
        }
        None => (trimmed, Vec::new()),
    };
    DocumentedComponent {
        name: name.to_owned(),
        params,
        ..DocumentedComponent::default()
    }
}

fn finish_component(mut component: DocumentedComponent, body: &[&str]) -> DocumentedComponent {
    component.description = description_of(body).unwrap_or_else(|| NO_DESCRIPTION.to_owned());
    component.example = example_of(body).unwrap_or_default();
    component
}

fn description_of(body: &[&str]) -> Option<String> {
    let start = body
        .iter()
        .position(|line| line.trim_start().starts_with("Description:"))?;
    let mut paragraph = Vec::new();
    for (offset, line) in body.iter().skip(start).enumerate() {
        let text = if offset == 0 {
            line.trim_start().trim_start_matches("Description:")
        } else {
            line
        };
        if offset > 0 && ends_description(line) {
            break;
        }
        paragraph.push(text.trim());
    }
    let description = paragraph.join("\n").trim().to_owned();
    (!description.is_empty()).then_some(description)
}

fn ends_description(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with("Example:") || trimmed.starts_with("```")
}

fn example_of(body: &[&str]) -> Option<String> {
    let start = body
        .iter()
        .position(|line| line.trim_start().starts_with("Example:"))?;
    let mut after = body.iter().skip(start.saturating_add(1));
    after.by_ref().find(|line| line.trim_start().starts_with("```"))?;
    let mut example = Vec::new();
    for line in after {
        if line.trim_start().starts_with("```") {
            return Some(example.join("\n").trim().to_owned());
        }
        example.push(*line);
    }
    None
}

#[cfg(test)]
mod tests {
    use mockall::predicate::{always, eq};
    use rstest::rstest;

    use super::*;
    use crate::ai::CompletionError;
    use crate::ai::completion::MockCompletionService;
    use crate::github::{RepositorySlug, TreeEntry};
    use crate::github::gateway::MockRepositoryGateway;
    use crate::http::FetchResult;
    use crate::notifications::NotificationLog;

    const DOCUMENTATION: &str = "\
# Overview
Entry point.

## Main Components
### render(root, props)
Description: Mounts the app.
Example:
```javascript
render(document.body, {});
```

### App
Description: Top-level component
spanning two lines.

## Dependencies
- react";

    #[rstest]
    fn components_are_read_from_their_section() {
        let components = extract_components(DOCUMENTATION);

        assert_eq!(
            components,
            [
                DocumentedComponent {
                    name: "render".to_owned(),
                    params: vec!["root".to_owned(), "props".to_owned()],
                    description: "Mounts the app.".to_owned(),
                    example: "render(document.body, {});".to_owned(),
                },
                DocumentedComponent {
                    name: "App".to_owned(),
                    params: Vec::new(),
                    description: "Top-level component\nspanning two lines.".to_owned(),
                    example: String::new(),
                },
            ]
        );
    }

    #[rstest]
    #[case("# Overview\nNothing here.")]
    #[case("## Main Components\n\n## Usage\n### not_a_component()")]
    fn missing_components_section_yields_nothing(#[case] markdown: &str) {
        assert!(extract_components(markdown).is_empty());
    }

    #[rstest]
    fn heading_without_description_uses_placeholder() {
        let components = extract_components("## Main Components\n### helper()\nJust text.");

        let helper = components.first().expect("one component");
        assert_eq!(helper.description, NO_DESCRIPTION);
        assert!(helper.params.is_empty());
    }

    fn blob(path: &str) -> TreeEntry {
        TreeEntry {
            path: path.to_owned(),
            kind: TreeEntryKind::Blob,
            size: Some(10),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn documents_known_files_and_records_failures() {
        let slug = RepositorySlug::parse("octocat/hello").expect("slug should parse");
        let mut gateway = MockRepositoryGateway::new();
        gateway
            .expect_tree()
            .with(always(), eq("main"))
            .returning(|_, _| {
                FetchResult::Success(vec![
                    TreeEntry {
                        path: "src".to_owned(),
                        kind: TreeEntryKind::Tree,
                        size: None,
                    },
                    blob("src/app.js"),
                    blob("Cargo.toml"),
                    blob("assets/logo.png"),
                    blob("src/missing.py"),
                ])
            });
        gateway
            .expect_raw_file()
            .withf(|_, _, path| path == "src/app.js")
            .returning(|_, _, _| FetchResult::Success("line one\nline two".to_owned()));
        gateway
            .expect_raw_file()
            .withf(|_, _, path| path == "src/missing.py")
            .returning(|_, _, _| FetchResult::NotFound);
        let mut completion = MockCompletionService::new();
        completion
            .expect_complete()
            .withf(|prompt| prompt.contains("logo.png"))
            .returning(|_| Err(CompletionError::EmptyResponse));
        completion
            .expect_complete()
            .returning(|_| Ok(DOCUMENTATION.to_owned()));
        let log = NotificationLog::new("unused.json");
        let context = FeatureContext {
            gateway: &gateway,
            completion: &completion,
            notifications: &log,
        };

        let FeatureReport::Documentation(report) = run(context, &FeatureTarget::new(slug))
            .await
            .expect("run should succeed")
        else {
            panic!("expected a documentation report");
        };

        let summary: Vec<(&str, DocumentationStatus, usize)> = report
            .docs
            .iter()
            .map(|doc| (doc.path.as_str(), doc.status, doc.lines_count))
            .collect();
        assert_eq!(
            summary,
            [
                ("src/app.js", DocumentationStatus::Completed, 2),
                ("assets/logo.png", DocumentationStatus::Failed, 0),
                ("src/missing.py", DocumentationStatus::Failed, 0),
            ]
        );
        let app = report.docs.first().expect("app entry");
        assert_eq!(app.filename, "app.js");
        assert_eq!(app.functions.len(), 2);
        let json = serde_json::to_value(app).expect("entry should serialise");
        assert_eq!(json.get("linesCount"), Some(&serde_json::json!(2)));
        assert_eq!(json.get("status"), Some(&serde_json::json!("completed")));
    }
}
