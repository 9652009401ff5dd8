//! Thin HTTP client for the Telegram Bot API.
//!
//! Only the handful of methods the bot needs are wrapped: `getUpdates` for
//! long polling, `sendMessage` for replies, and `getFile` plus the file
//! endpoint for document retrieval. Requests go straight over HTTP instead of
//! through a bot framework.

pub mod types;

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::config::Config;
use crate::download::DownloadError;

pub use types::{ApiResponse, Chat, Document, Message, TelegramError, TelegramFile, Update};

/// Upper bound on a single request, sized for document downloads.
const REQUEST_TIMEOUT_SECS: u64 = 60;
/// Extra headroom on top of the server-side long-poll window.
const LONG_POLL_GRACE_SECS: u64 = 10;

/// Lightweight HTTP client for Bot API operations.
pub struct TelegramClient {
    pub(crate) http: Client,
    pub(crate) api_base: String,
    pub(crate) token: String,
}

impl TelegramClient {
    /// Construct a client from the resolved configuration.
    pub fn new(config: &Config) -> Result<Self, TelegramError> {
        let http = Client::builder()
            .user_agent("docsum/telegram")
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let api_base = config.telegram_api_url.trim_end_matches('/').to_string();
        tracing::debug!(url = %api_base, "Initialized Telegram client");

        Ok(Self {
            http,
            api_base,
            token: config.telegram_bot_token.clone(),
        })
    }

    /// Long-poll for new updates, blocking server-side up to `timeout_secs`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let mut body = json!({ "timeout": timeout_secs });
        if let Some(offset) = offset {
            body.as_object_mut()
                .expect("update body should remain an object")
                .insert("offset".into(), Value::from(offset));
        }

        let response = self
            .http
            .post(self.method_url("getUpdates"))
            .timeout(Duration::from_secs(timeout_secs + LONG_POLL_GRACE_SECS))
            .json(&body)
            .send()
            .await?;

        read_envelope(response).await
    }

    /// Send a plain-text message to the given chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let body = json!({ "chat_id": chat_id, "text": text });

        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await?;

        let _: Value = read_envelope(response).await?;
        tracing::debug!(chat = chat_id, "Message sent");
        Ok(())
    }

    /// Resolve download metadata for a previously received file identifier.
    pub async fn get_file(&self, file_id: &str) -> Result<TelegramFile, TelegramError> {
        let response = self
            .http
            .post(self.method_url("getFile"))
            .json(&json!({ "file_id": file_id }))
            .send()
            .await?;

        read_envelope(response).await
    }

    /// Build the authenticated download URL for a `getFile` result path.
    pub fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.api_base,
            self.token,
            file_path.trim_start_matches('/')
        )
    }

    /// Stream a resolved file into `dest`.
    pub async fn download_document(
        &self,
        file_path: &str,
        dest: &Path,
    ) -> Result<(), DownloadError> {
        let url = self.file_url(file_path);
        crate::download::download_file(&self.http, &url, dest).await
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }
}

async fn read_envelope<T>(response: reqwest::Response) -> Result<T, TelegramError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        // Telegram error statuses usually still carry an envelope with a description.
        if let Ok(envelope) = serde_json::from_str::<ApiResponse<Value>>(&body)
            && let Some(description) = envelope.description
        {
            return Err(TelegramError::Api { description });
        }
        return Err(TelegramError::UnexpectedStatus { status, body });
    }

    let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|error| {
        TelegramError::InvalidResponse(format!("failed to decode Telegram envelope: {error}"))
    })?;

    if !envelope.ok {
        return Err(TelegramError::Api {
            description: envelope
                .description
                .unwrap_or_else(|| "no description provided".into()),
        });
    }

    envelope
        .result
        .ok_or_else(|| TelegramError::InvalidResponse("envelope missing result".into()))
}
