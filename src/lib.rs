//! Repopulse library crate providing AI-assisted GitHub repository insights.
//!
//! The library reads repositories through the GitHub REST API, asks an
//! OpenAI-compatible chat model to review, document, and summarise what it
//! finds, and records collaborator activity to a local notification log.
//! The same feature orchestrators back both the interactive CLI and the HTTP
//! API.

pub mod ai;
pub mod config;
pub mod error;
pub mod features;
pub mod github;
pub mod http;
pub mod notifications;
pub mod server;
pub mod telemetry;
pub mod text;

pub use ai::{CompletionConfig, CompletionService, OpenAiCompletionService};
pub use config::{ClientSettings, InsightConfig};
pub use error::InsightError;
pub use features::{Feature, FeatureContext, FeatureReport, FeatureTarget, run_feature, write_report};
pub use github::{RepositoryGateway, RepositorySlug, RestGateway};
pub use notifications::{ActivityPoller, NotificationLog, NotificationRecord, run_until_shutdown};
pub use server::{AppState, router, serve};
pub use telemetry::init_tracing;
