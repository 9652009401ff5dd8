//! Error definitions for the summarization pipeline.

use thiserror::Error;

use crate::completion::CompletionError;

/// Errors surfaced while producing a document summary.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// No completion credential was supplied, so no request was attempted.
    #[error("OPENAI_API_KEY is not set; summaries are unavailable")]
    NotConfigured,
    /// A completion call failed partway through the pipeline.
    #[error(transparent)]
    Completion(#[from] CompletionError),
}
