//! Long-polling bot surface: command replies and the document pipeline.
//!
//! Updates are fetched via `getUpdates` and each message is handled on its
//! own task, so a slow summary never blocks polling. Document handling runs
//! the full retrieve, extract, and summarize sequence inside one recovery
//! boundary; any stage failure turns into a single error reply to the chat.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::completion::get_completion_client;
use crate::config::Config;
use crate::download::DownloadError;
use crate::extract::{ExtractError, PdfExtractor, TextExtractor};
use crate::metrics::{BotMetrics, MetricsSnapshot};
use crate::summarize::{Summarize, SummarizeError, SummaryPipeline};
use crate::telegram::{Document, Message, TelegramClient, TelegramError, Update};

/// Greeting for the `/start` command.
pub const START_REPLY: &str = "Hi! Send me a PDF file and I will summarize it for you.";
/// Usage notes for the `/help` command.
pub const HELP_REPLY: &str = "How to use:\n- Send /start\n- Send a PDF file\n";
/// Fallback for commands the bot does not recognize.
pub const UNKNOWN_COMMAND_REPLY: &str = "Unknown command.";
/// Guidance sent when an attachment is not a PDF.
pub const NON_PDF_REPLY: &str = "Please send a PDF file only.";
/// Acknowledgment sent before processing starts.
pub const PROCESSING_REPLY: &str = "File received. Processing...";
/// Notice sent when a PDF yields no extractable text.
pub const NO_TEXT_REPLY: &str = "No extractable text was found.";

const PDF_MIME: &str = "application/pdf";
const DEFAULT_FILE_NAME: &str = "file.pdf";
const POLL_BACKOFF: Duration = Duration::from_secs(2);

/// Errors collected from any stage of document processing.
///
/// The document handler is the only place these are caught; the rendered
/// message is what the chat sees after the `Error:` prefix.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Telegram API interaction failed.
    #[error(transparent)]
    Telegram(#[from] TelegramError),
    /// Scratch directory could not be created.
    #[error("Failed to prepare workspace: {0}")]
    Workspace(#[from] std::io::Error),
    /// Document retrieval failed.
    #[error(transparent)]
    Download(#[from] DownloadError),
    /// Blocking extraction task aborted before returning a result.
    #[error("Extraction task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
    /// Text extraction failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),
    /// Summarization failed.
    #[error(transparent)]
    Summarize(#[from] SummarizeError),
}

/// Coordinates polling, command replies, and document summarization.
///
/// The bot owns long-lived handles to the Telegram client, the summarization
/// pipeline, and the extractor so every spawned update task reuses the same
/// components. Construct it once near process start and share it through an
/// `Arc`.
pub struct DocSumBot {
    telegram: TelegramClient,
    summarizer: Arc<dyn Summarize + Send + Sync>,
    extractor: Arc<dyn TextExtractor + Send + Sync>,
    metrics: Arc<BotMetrics>,
    poll_timeout_secs: u64,
}

impl DocSumBot {
    /// Build the bot and its collaborators from the resolved configuration.
    pub fn new(config: &Config) -> Result<Self, TelegramError> {
        let telegram = TelegramClient::new(config)?;
        let metrics = Arc::new(BotMetrics::new());
        let pipeline = SummaryPipeline::new(
            get_completion_client(config),
            config.summary_max_chars,
            Arc::clone(&metrics),
        );

        Ok(Self::with_components(
            telegram,
            Arc::new(pipeline),
            Arc::new(PdfExtractor),
            metrics,
            config.poll_timeout_secs,
        ))
    }

    /// Assemble a bot from pre-built collaborators.
    ///
    /// Counters reported by [`DocSumBot::metrics`] come from `metrics`; hand
    /// the same handle to the summarization pipeline so finished documents
    /// are counted.
    pub fn with_components(
        telegram: TelegramClient,
        summarizer: Arc<dyn Summarize + Send + Sync>,
        extractor: Arc<dyn TextExtractor + Send + Sync>,
        metrics: Arc<BotMetrics>,
        poll_timeout_secs: u64,
    ) -> Self {
        Self {
            telegram,
            summarizer,
            extractor,
            metrics,
            poll_timeout_secs,
        }
    }

    /// Current processing counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Poll for updates until the process is stopped.
    ///
    /// Transient polling failures are logged and retried after a short
    /// backoff. Every received message is handled on its own task.
    pub async fn run(self: Arc<Self>) {
        tracing::info!("Bot is starting polling");
        let mut offset = None;
        loop {
            match self.telegram.get_updates(offset, self.poll_timeout_secs).await {
                Ok(updates) => {
                    offset = next_offset(offset, &updates);
                    for update in updates {
                        let Some(message) = update.message else {
                            continue;
                        };
                        let bot = Arc::clone(&self);
                        tokio::spawn(async move {
                            bot.handle_message(message).await;
                        });
                    }
                }
                Err(error) => {
                    tracing::warn!(error = %error, "Polling failed; backing off");
                    tokio::time::sleep(POLL_BACKOFF).await;
                }
            }
        }
    }

    /// Handle one incoming message: a document, a command, or noise.
    pub async fn handle_message(&self, message: Message) {
        let chat_id = message.chat.id;
        if let Some(document) = message.document {
            self.handle_document(chat_id, document).await;
            return;
        }
        if let Some(text) = message.text
            && let Some(reply) = command_reply(&text)
        {
            self.reply(chat_id, reply).await;
        }
    }

    async fn handle_document(&self, chat_id: i64, document: Document) {
        if document.mime_type.as_deref() != Some(PDF_MIME) {
            self.reply(chat_id, NON_PDF_REPLY).await;
            return;
        }

        if let Err(error) = self.process_document(chat_id, &document).await {
            tracing::error!(chat = chat_id, error = %error, "Failed to process document");
            self.reply(chat_id, &format!("Error: {error}")).await;
        }
    }

    async fn process_document(
        &self,
        chat_id: i64,
        document: &Document,
    ) -> Result<(), ProcessError> {
        let file = self.telegram.get_file(&document.file_id).await?;
        let file_path = file.file_path.ok_or_else(|| {
            TelegramError::InvalidResponse("getFile result carried no file_path".into())
        })?;

        self.telegram.send_message(chat_id, PROCESSING_REPLY).await?;

        // The scratch directory lives exactly as long as this scope.
        let workdir = tempfile::tempdir()?;
        let pdf_path = workdir
            .path()
            .join(document_file_name(document.file_name.as_deref()));
        self.telegram.download_document(&file_path, &pdf_path).await?;

        let extractor = Arc::clone(&self.extractor);
        let extracted =
            tokio::task::spawn_blocking(move || extractor.extract(&pdf_path)).await??;

        let Some(text) = extracted else {
            self.telegram.send_message(chat_id, NO_TEXT_REPLY).await?;
            return Ok(());
        };

        let summary = self.summarizer.summarize(&text).await?;
        self.telegram.send_message(chat_id, &summary).await?;

        let snapshot = self.metrics.snapshot();
        tracing::debug!(
            chat = chat_id,
            documents = snapshot.documents_summarized,
            fragments = snapshot.fragments_summarized,
            "Summary delivered"
        );
        Ok(())
    }

    async fn reply(&self, chat_id: i64, text: &str) {
        if let Err(error) = self.telegram.send_message(chat_id, text).await {
            tracing::warn!(chat = chat_id, error = %error, "Failed to send reply");
        }
    }
}

/// Advance the polling offset past every update in the batch.
fn next_offset(current: Option<i64>, updates: &[Update]) -> Option<i64> {
    updates
        .iter()
        .map(|update| update.update_id + 1)
        .max()
        .or(current)
}

/// Map a slash command to its canned reply, tolerating bot mentions and
/// trailing arguments. Plain text maps to nothing and is ignored.
fn command_reply(text: &str) -> Option<&'static str> {
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return None;
    }
    let command = trimmed.split_whitespace().next().unwrap_or(trimmed);
    let command = command.split('@').next().unwrap_or(command);
    Some(match command {
        "/start" => START_REPLY,
        "/help" => HELP_REPLY,
        _ => UNKNOWN_COMMAND_REPLY,
    })
}

/// Pick the on-disk name for a downloaded document, keeping only the final
/// path component of whatever the sender supplied.
fn document_file_name(supplied: Option<&str>) -> String {
    supplied
        .and_then(|name| Path::new(name).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string())
}
