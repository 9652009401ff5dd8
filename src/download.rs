//! Streaming file download into request-scoped storage.

use std::path::Path;

use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Errors surfaced while fetching a remote file.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// HTTP layer failed before or during the transfer.
    #[error("Download request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Server answered with a non-success status.
    #[error("Download failed with status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the server.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Local filesystem write failed.
    #[error("Failed to write downloaded file: {0}")]
    Io(#[from] std::io::Error),
}

/// Stream the body of `url` into `dest`, creating or truncating the file.
///
/// The body is written chunk by chunk so large documents never sit in memory
/// as one buffer. Nothing is created on disk when the server answers with an
/// error status.
pub async fn download_file(http: &Client, url: &str, dest: &Path) -> Result<(), DownloadError> {
    let response = http.get(url).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(DownloadError::UnexpectedStatus { status, body });
    }

    let mut file = File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        written += chunk.len() as u64;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    tracing::debug!(bytes = written, path = %dest.display(), "Download complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::GET, MockServer};

    #[tokio::test]
    async fn downloads_body_to_destination() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/file/bottest/documents/file_1.pdf");
                then.status(200).body(b"%PDF-1.4 fake body");
            })
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let dest = dir.path().join("file.pdf");
        let http = Client::new();

        download_file(
            &http,
            &format!("{}/file/bottest/documents/file_1.pdf", server.base_url()),
            &dest,
        )
        .await
        .expect("download");

        mock.assert();
        let contents = std::fs::read(&dest).expect("read file");
        assert_eq!(contents, b"%PDF-1.4 fake body");
    }

    #[tokio::test]
    async fn error_status_aborts_without_creating_the_file() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/file/bottest/documents/missing.pdf");
                then.status(404).body("Not Found");
            })
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let dest = dir.path().join("file.pdf");
        let http = Client::new();

        let error = download_file(
            &http,
            &format!("{}/file/bottest/documents/missing.pdf", server.base_url()),
            &dest,
        )
        .await
        .expect_err("status error");

        assert!(matches!(
            error,
            DownloadError::UnexpectedStatus { status, .. } if status.as_u16() == 404
        ));
        assert!(!dest.exists());
    }
}
