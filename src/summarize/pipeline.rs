//! Chunked summarization over a completion backend.
//!
//! Documents rarely fit into a single completion request, so the pipeline
//! splits the text into fragments, summarizes each fragment on its own, and
//! then reduces the partial summaries into one final summary. A document with
//! `n` fragments costs exactly `n + 1` completion calls.

use std::sync::Arc;

use async_trait::async_trait;

use crate::completion::CompletionClient;
use crate::metrics::BotMetrics;

use super::chunking::chunk_text;
use super::types::SummarizeError;

const FRAGMENT_SYSTEM_PROMPT: &str = "You are a precise and organized summarizer.";
const REDUCE_SYSTEM_PROMPT: &str = "Produce a final, coherent summary with short headings.";
const PARTIAL_SEPARATOR: &str = "\n\n---\n\n";

/// Interface the bot surface uses to request a summary.
#[async_trait]
pub trait Summarize: Send + Sync {
    /// Produce a condensed summary of the supplied document text.
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError>;
}

/// Drives the chunk, map, and reduce steps of a document summary.
///
/// The completion backend is optional. When it is absent every call fails
/// with [`SummarizeError::NotConfigured`] before any request is made, which
/// lets the bot keep answering chat commands without a credential.
pub struct SummaryPipeline {
    completion: Option<Box<dyn CompletionClient + Send + Sync>>,
    max_chars: usize,
    metrics: Arc<BotMetrics>,
}

impl SummaryPipeline {
    /// Create a pipeline over an optional completion backend.
    pub fn new(
        completion: Option<Box<dyn CompletionClient + Send + Sync>>,
        max_chars: usize,
        metrics: Arc<BotMetrics>,
    ) -> Self {
        Self {
            completion,
            max_chars,
            metrics,
        }
    }

    async fn run(&self, text: &str) -> Result<String, SummarizeError> {
        let Some(client) = self.completion.as_deref() else {
            return Err(SummarizeError::NotConfigured);
        };

        let fragments = chunk_text(text, self.max_chars);
        let total = fragments.len();
        tracing::info!(
            chars = text.chars().count(),
            fragments = total,
            "Starting document summary"
        );

        let mut partials = Vec::with_capacity(total);
        for (index, fragment) in fragments.iter().enumerate() {
            tracing::info!(
                fragment = index + 1,
                total,
                chars = fragment.chars().count(),
                "Summarizing fragment"
            );
            let user = format!("Summarize this section of the text:\n\n{fragment}");
            let partial = client.complete(FRAGMENT_SYSTEM_PROMPT, &user).await?;
            partials.push(partial.trim().to_string());
        }

        let joined = partials.join(PARTIAL_SEPARATOR);
        let user = format!("Turn these sectioned summaries into one final summary:\n\n{joined}");
        let summary = client.complete(REDUCE_SYSTEM_PROMPT, &user).await?;

        self.metrics.record_document(total as u64);
        tracing::info!(fragments = total, "Document summary complete");
        Ok(summary.trim().to_string())
    }
}

#[async_trait]
impl Summarize for SummaryPipeline {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        self.run(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionError;
    use tokio::sync::Mutex;

    type CallLog = Arc<Mutex<Vec<(String, String)>>>;

    /// Completion stub that records every call and can fail on demand.
    struct RecordingClient {
        calls: CallLog,
        fail_on_call: Option<usize>,
    }

    impl RecordingClient {
        fn new() -> (Self, CallLog) {
            let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
            let client = Self {
                calls: Arc::clone(&calls),
                fail_on_call: None,
            };
            (client, calls)
        }

        fn failing_on(call: usize) -> (Self, CallLog) {
            let (mut client, calls) = Self::new();
            client.fail_on_call = Some(call);
            (client, calls)
        }
    }

    #[async_trait]
    impl CompletionClient for RecordingClient {
        async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
            let mut calls = self.calls.lock().await;
            calls.push((system.to_string(), user.to_string()));
            let call_number = calls.len();
            if self.fail_on_call == Some(call_number) {
                return Err(CompletionError::InvalidResponse(
                    "stubbed failure".to_string(),
                ));
            }
            if system == REDUCE_SYSTEM_PROMPT {
                Ok("  final summary  ".to_string())
            } else {
                Ok(format!("partial {call_number}"))
            }
        }
    }

    fn pipeline_with(
        client: RecordingClient,
        max_chars: usize,
    ) -> (SummaryPipeline, Arc<BotMetrics>) {
        let metrics = Arc::new(BotMetrics::new());
        let pipeline =
            SummaryPipeline::new(Some(Box::new(client)), max_chars, Arc::clone(&metrics));
        (pipeline, metrics)
    }

    #[tokio::test]
    async fn three_fragments_cost_four_calls_in_order() {
        let (client, calls) = RecordingClient::new();
        let (pipeline, metrics) = pipeline_with(client, 10_000);
        let text = "a".repeat(25_000);

        let summary = pipeline.summarize(&text).await.unwrap();

        assert_eq!(summary, "final summary");
        let calls = calls.lock().await;
        assert_eq!(calls.len(), 4);
        for (system, user) in &calls[..3] {
            assert_eq!(system, FRAGMENT_SYSTEM_PROMPT);
            assert!(user.starts_with("Summarize this section of the text:"));
        }
        assert_eq!(calls[3].0, REDUCE_SYSTEM_PROMPT);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_summarized, 1);
        assert_eq!(snapshot.fragments_summarized, 3);
    }

    #[tokio::test]
    async fn reduction_receives_partials_joined_in_order() {
        let (client, calls) = RecordingClient::new();
        let (pipeline, _metrics) = pipeline_with(client, 4);

        pipeline.summarize("abcdefghij").await.unwrap();

        let calls = calls.lock().await;
        assert_eq!(calls.len(), 4);
        assert!(calls[0].1.ends_with("abcd"));
        assert!(calls[1].1.ends_with("efgh"));
        assert!(calls[2].1.ends_with("ij"));
        assert!(
            calls[3]
                .1
                .ends_with("partial 1\n\n---\n\npartial 2\n\n---\n\npartial 3")
        );
    }

    #[tokio::test]
    async fn single_fragment_still_runs_the_reduction() {
        let (client, calls) = RecordingClient::new();
        let (pipeline, metrics) = pipeline_with(client, 10_000);

        let summary = pipeline.summarize("short document").await.unwrap();

        assert_eq!(summary, "final summary");
        assert_eq!(calls.lock().await.len(), 2);
        assert_eq!(metrics.snapshot().documents_summarized, 1);
        assert_eq!(metrics.snapshot().fragments_summarized, 1);
    }

    #[tokio::test]
    async fn missing_backend_fails_before_any_call() {
        let metrics = Arc::new(BotMetrics::new());
        let pipeline = SummaryPipeline::new(None, 10_000, Arc::clone(&metrics));

        let error = pipeline.summarize("text").await.unwrap_err();

        assert!(matches!(error, SummarizeError::NotConfigured));
        assert_eq!(metrics.snapshot().documents_summarized, 0);
    }

    #[tokio::test]
    async fn mid_pipeline_failure_aborts_the_document() {
        let (client, calls) = RecordingClient::failing_on(2);
        let (pipeline, metrics) = pipeline_with(client, 4);

        let error = pipeline.summarize("abcdefghij").await.unwrap_err();

        assert!(matches!(error, SummarizeError::Completion(_)));
        assert_eq!(calls.lock().await.len(), 2);
        assert_eq!(metrics.snapshot().documents_summarized, 0);
    }
}
