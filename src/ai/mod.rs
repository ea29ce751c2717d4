//! Model access: prompt rendering, the completion client, and reply
//! normalisation.

pub mod completion;
pub mod prompt;
pub mod records;
pub mod reply;

pub use completion::{
    CompletionConfig, CompletionError, CompletionService, OpenAiCompletionService,
    complete_or_notice,
};
pub use prompt::{Prompt, PromptTemplate, render_prompt};
pub use records::{AspectStatus, CommitAssessment, FileAnalysis, Grade, StructuredReply};
pub use reply::{Normalized, ReplyCandidate, extract_candidate, normalize};
