//! Onboarding overview: repository structure plus starter file analyses.

use std::collections::BTreeMap;

use minijinja::context;
use serde::Serialize;

use crate::ai::prompt::FILE_CONTENT_CEILING;
use crate::ai::{FileAnalysis, PromptTemplate, complete_or_notice, normalize, render_prompt};
use crate::error::InsightError;
use crate::github::{RepositoryIntake, TreeEntry, TreeEntryKind};
use crate::http::FetchResult;
use crate::text::truncate_with_marker;

use super::language::infer_language;
use super::{FeatureContext, FeatureReport, FeatureTarget};

/// Files analysed per run.
pub const ANALYSED_FILES: usize = 5;

/// Structure and starter analyses for a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnboardingReport {
    /// Repository described.
    pub repository: String,
    /// Branch the tree was read from.
    pub branch: String,
    /// Metadata, when the repository endpoint answered.
    pub overview: Option<RepositoryOverview>,
    /// Hierarchical file tree.
    pub files: Vec<FileNode>,
    /// Analyses keyed by path.
    pub analyses: BTreeMap<String, FileAnalysis>,
}

/// Repository metadata shown to newcomers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryOverview {
    /// Description.
    pub description: Option<String>,
    /// Dominant language.
    pub language: Option<String>,
    /// Stars.
    pub stars: u64,
    /// Forks.
    pub forks: u64,
}

/// A node of the repository file tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileNode {
    /// A file.
    File {
        /// Full path.
        path: String,
        /// Size in bytes.
        size: u64,
        /// Inferred language.
        language: String,
    },
    /// A directory.
    Folder {
        /// Full path.
        path: String,
        /// Entries inside the directory.
        children: Vec<FileNode>,
    },
}

impl FileNode {
    /// Full path of the node.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::File { path, .. } | Self::Folder { path, .. } => path,
        }
    }
}

/// Builds a hierarchical tree from a flat recursive listing.
///
/// Directories missing from the listing are created from file paths.
/// Submodules and other non-file, non-directory entries are left out.
#[must_use]
pub fn build_file_tree(entries: &[TreeEntry]) -> Vec<FileNode> {
    let mut root = Vec::new();
    for entry in entries.iter().filter(|entry| entry.kind != TreeEntryKind::Other) {
        let parts: Vec<&str> = entry.path.split('/').filter(|part| !part.is_empty()).collect();
        insert_entry(&mut root, "", &parts, entry);
    }
    root
}

fn insert_entry(level: &mut Vec<FileNode>, parent: &str, parts: &[&str], entry: &TreeEntry) {
    let Some((first, rest)) = parts.split_first() else {
        return;
    };
    let path = if parent.is_empty() {
        (*first).to_owned()
    } else {
        format!("{parent}/{first}")
    };

    if rest.is_empty() && entry.kind == TreeEntryKind::Blob {
        level.push(FileNode::File {
            language: infer_language(first).to_owned(),
            size: entry.size.unwrap_or_default(),
            path,
        });
        return;
    }

    let existing = level
        .iter()
        .position(|node| matches!(node, FileNode::Folder { path: folder, .. } if *folder == path));
    let index = existing.unwrap_or_else(|| {
        level.push(FileNode::Folder {
            path: path.clone(),
            children: Vec::new(),
        });
        level.len().saturating_sub(1)
    });
    if let Some(FileNode::Folder { children, .. }) = level.get_mut(index) {
        insert_entry(children, &path, rest, entry);
    }
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
        return Ok(FeatureReport::unavailable(
            "No files found or error fetching repository structure.",
        ));
    };

    let overview = match context.gateway.repository(repository).await {
        FetchResult::Success(summary) => Some(RepositoryOverview {
            description: summary.description,
            language: summary.language,
            stars: summary.stargazers_count,
            forks: summary.forks_count,
        }),
        other => {
            tracing::debug!(
                "metadata for {repository} unavailable: {}",
                other.failure_description().unwrap_or_default()
            );
            None
        }
    };

    let mut analyses = BTreeMap::new();
    let blobs = tree
        .entries
        .iter()
        .filter(|entry| entry.kind == TreeEntryKind::Blob)
        .take(ANALYSED_FILES);
    for entry in blobs {
        let content = intake
            .raw_file_with_fallback(repository, Some(&tree.branch), &entry.path)
            .await;
        let analysis = match content {
            Some(content) => analyse_file(context, &entry.path, &content).await?,
            None => FileAnalysis::unavailable(&entry.path),
        };
        analyses.insert(entry.path.clone(), analysis);
    }

    Ok(FeatureReport::Onboarding(OnboardingReport {
        repository: repository.to_string(),
        files: build_file_tree(&tree.entries),
        branch: tree.branch,
        overview,
        analyses,
    }))
}

struct AnalysisFocus {
    kind: &'static str,
    focus: &'static str,
    function_label: &'static str,
}

fn focus_for(path: &str) -> AnalysisFocus {
    let lowered = path.to_lowercase();
    match infer_language(path) {
        "css" => AnalysisFocus {
            kind: "CSS",
            focus: "Describe the key styles and where they apply. CSS has no functions, so \
                    the functions list may be empty; complexity may be \"not applicable\".",
            function_label: "notable selectors",
        },
        "javascript" if lowered.ends_with(".jsx") || lowered.ends_with(".html") => AnalysisFocus {
            kind: "JSX/React",
            focus: "Describe the main React components and their role in the project.",
            function_label: "main React components and key functions",
        },
        _ => AnalysisFocus {
            kind: "source",
            focus: "Describe the main functions or classes and notable usage.",
            function_label: "main functions or classes",
        },
    }
}

async fn analyse_file(
    context: FeatureContext<'_>,
    path: &str,
    content: &str,
) -> Result<FileAnalysis, InsightError> {
    let focus = focus_for(path);
    let bounded = truncate_with_marker(content, FILE_CONTENT_CEILING);
    let prompt = render_prompt(
        PromptTemplate::FileAnalysis,
        context! {
            kind => focus.kind,
            path => path,
            focus => focus.focus,
            content => bounded.as_ref(),
            function_label => focus.function_label,
        },
    )?;

    let reply = complete_or_notice(context.completion, prompt.as_str()).await;
    let normalised = normalize::<FileAnalysis>(&reply);
    if let Some(reason) = normalised.fallback_reason() {
        tracing::info!("analysis of {path} defaulted: {reason}");
    }
    Ok(normalised.into_record())
}
