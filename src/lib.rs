#![deny(missing_docs)]

//! Core library for the DocSum Telegram bot.

/// Update polling, command handling, and the document pipeline boundary.
pub mod bot;
/// Completion client abstraction and the OpenAI-compatible adapter.
pub mod completion;
/// Environment-driven configuration management.
pub mod config;
/// Streaming file download into request-scoped storage.
pub mod download;
/// PDF text extraction behind a swappable trait.
pub mod extract;
/// Structured logging and tracing setup.
pub mod logging;
/// Summarization metrics helpers.
pub mod metrics;
/// Chunked summarization pipeline.
pub mod summarize;
/// Thin Telegram Bot API client.
pub mod telegram;
