//! Wire types shared by the Telegram Bot API client.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors returned while interacting with the Telegram Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// HTTP layer failed before receiving a response.
    #[error("Telegram request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Telegram responded with an unexpected status code.
    #[error("Unexpected Telegram response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from Telegram.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Telegram answered the call with `ok = false`.
    #[error("Telegram rejected the call: {description}")]
    Api {
        /// Human-readable description from the response envelope.
        description: String,
    },
    /// Response body could not be decoded.
    #[error("Malformed Telegram response: {0}")]
    InvalidResponse(String),
}

/// Response envelope wrapping every Bot API result.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded.
    pub ok: bool,
    /// Method-specific payload, present when `ok` is true.
    pub result: Option<T>,
    /// Error description, present when `ok` is false.
    pub description: Option<String>,
}

/// A single incoming event delivered by `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonically increasing update identifier.
    pub update_id: i64,
    /// New incoming message, if this update carries one.
    pub message: Option<Message>,
}

/// An incoming chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Chat the message was sent in.
    pub chat: Chat,
    /// Text content for plain messages and commands.
    pub text: Option<String>,
    /// Attached general file, if any.
    pub document: Option<Document>,
}

/// The conversation a message belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    /// Unique chat identifier.
    pub id: i64,
}

/// A general file attached to a message.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    /// Identifier used to fetch the file via `getFile`.
    pub file_id: String,
    /// Original filename as supplied by the sender.
    pub file_name: Option<String>,
    /// MIME type as supplied by the sender.
    pub mime_type: Option<String>,
}

/// File metadata resolved by `getFile`.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramFile {
    /// Identifier the file was requested with.
    pub file_id: String,
    /// Relative path used to build the download URL.
    pub file_path: Option<String>,
    /// Size in bytes, when Telegram reports it.
    pub file_size: Option<u64>,
}
