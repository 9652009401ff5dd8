//! Document summarization pipeline: chunking, per-fragment completion, and reduction.

pub mod chunking;
mod pipeline;
pub mod types;

pub use chunking::chunk_text;
pub use pipeline::{Summarize, SummaryPipeline};
pub use types::SummarizeError;
