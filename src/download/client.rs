//! HTTP client wrapper implementing the fetch-and-classify pipeline.
//!
//! This module provides the `HttpClient` struct which fetches a resource,
//! buffers its body in memory, classifies it, and writes it under the
//! resolved extension.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::constants::{CONNECT_TIMEOUT, FIRST_CHUNK_SIZE, MAX_PREALLOCATED_BODY, REQUEST_TIMEOUT};
use super::error::DownloadError;
use super::filename::path_with_extension;
use super::outcome::DownloadOutcome;
use crate::classify::{
    ClassificationProfile, ClassificationResult, detect_signature, lookup_content_type, resolve,
};
use crate::user_agent::BROWSER_USER_AGENT;

/// HTTP client for fetching, classifying, and saving resources.
///
/// Created once and reused for every row of a run, taking advantage of
/// connection pooling. The classification profile is fixed at construction.
///
/// # Example
///
/// ```no_run
/// use docfetch_core::{ClassificationProfile, HttpClient};
/// use std::path::Path;
///
/// # async fn example() {
/// let client = HttpClient::new().with_profile(ClassificationProfile::spreadsheet());
/// let outcome = client
///     .fetch_and_save("https://example.com/export?id=7", Path::new("./data/2021_Investments"))
///     .await;
/// if let Some(path) = outcome.path() {
///     println!("saved {}", path.display());
/// }
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    profile: ClassificationProfile,
}

/// Details of a successfully saved resource.
#[derive(Debug, Clone)]
pub struct SavedFile {
    /// Final output path (`base` + resolved extension).
    pub path: PathBuf,
    pub classification: ClassificationResult,
    pub bytes_written: u64,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a client with default timeouts and the general profile.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Request timeout: 30 seconds
    /// - Browser User-Agent
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT, REQUEST_TIMEOUT)
    }

    /// Creates a client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout: Duration, request_timeout: Duration) -> Self {
        let client = build_client(connect_timeout, request_timeout)
            .expect("failed to build HTTP client with static configuration");
        Self {
            client,
            profile: ClassificationProfile::general(),
        }
    }

    /// Replaces the classification profile.
    #[must_use]
    pub fn with_profile(mut self, profile: ClassificationProfile) -> Self {
        self.profile = profile;
        self
    }

    #[must_use]
    pub fn profile(&self) -> &ClassificationProfile {
        &self.profile
    }

    /// Fetches `url`, classifies it, and writes it to `base` + extension.
    ///
    /// Never fails: every error is reported through the returned outcome.
    /// The body is fully buffered before anything touches the filesystem, so
    /// a failed call leaves no file behind. An existing file at the final
    /// path is overwritten.
    #[instrument(skip(self, base), fields(url = %url))]
    pub async fn fetch_and_save(&self, url: &str, base: &Path) -> DownloadOutcome {
        match self.try_fetch_and_save(url, base).await {
            Ok(saved) => DownloadOutcome::succeeded(saved.path, saved.classification),
            Err(error) => {
                warn!(error = %error, "download failed");
                DownloadOutcome::failed(&error)
            }
        }
    }

    /// Same pipeline as [`fetch_and_save`](Self::fetch_and_save), with typed errors.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is empty or malformed
    /// - The request fails (network error, timeout)
    /// - The server returns a non-success status
    /// - Reading the body stream or writing the file fails
    #[instrument(skip(self, base), fields(url = %url))]
    pub async fn try_fetch_and_save(
        &self,
        url: &str,
        base: &Path,
    ) -> Result<SavedFile, DownloadError> {
        debug!("starting download");

        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self.send_request(url).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let declared = lookup_content_type(&content_type, &self.profile);

        let body = buffer_body(response, url).await?;
        let head = &body[..body.len().min(FIRST_CHUNK_SIZE)];
        let signature = detect_signature(head, &self.profile);

        let classification = resolve(signature, declared, &self.profile);
        let path = path_with_extension(base, classification.file_type);
        debug!(path = %path.display(), "resolved output path");

        let bytes_written = write_body(&path, &body).await?;

        info!(
            path = %path.display(),
            bytes = bytes_written,
            extension = classification.extension(),
            detected_via = %classification.evidence,
            content_type = %content_type,
            "download complete"
        );

        Ok(SavedFile {
            path,
            classification,
            bytes_written,
        })
    }

    async fn send_request(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }
}

/// Consumes the response stream, keeping every chunk in arrival order.
async fn buffer_body(response: reqwest::Response, url: &str) -> Result<Vec<u8>, DownloadError> {
    let mut body = Vec::with_capacity(initial_capacity(response.content_length()));
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::from_reqwest(url, e))?;
        body.extend_from_slice(&chunk);
    }

    debug!(bytes = body.len(), "response body buffered");
    Ok(body)
}

/// Buffer size reserved before the first chunk arrives.
///
/// The declared length is only a hint from the server and is capped.
fn initial_capacity(content_length: Option<u64>) -> usize {
    content_length.map_or(FIRST_CHUNK_SIZE, |len| {
        usize::try_from(len).map_or(MAX_PREALLOCATED_BODY, |len| len.min(MAX_PREALLOCATED_BODY))
    })
}

/// Writes the buffered body, truncating any existing file.
///
/// A partially written file is removed before the error is returned.
async fn write_body(path: &Path, body: &[u8]) -> Result<u64, DownloadError> {
    let result = write_all(path, body).await;
    if result.is_err() {
        debug!(path = %path.display(), "cleaning up partial file after error");
        let _ = tokio::fs::remove_file(path).await;
    }
    result
}

async fn write_all(path: &Path, body: &[u8]) -> Result<u64, DownloadError> {
    let file = File::create(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(body)
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    writer.flush().await.map_err(|e| DownloadError::io(path, e))?;
    Ok(body.len() as u64)
}

fn build_client(
    connect_timeout: Duration,
    request_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(request_timeout)
        .gzip(true)
        .user_agent(BROWSER_USER_AGENT)
        .build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_invalid_url_is_reported_as_failure() {
        let temp_dir = TempDir::new().unwrap();
        let client = HttpClient::new();
        let base = temp_dir.path().join("report");

        let outcome = client.fetch_and_save("not-a-valid-url", &base).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.path(), None);
        assert!(outcome.error().unwrap().contains("invalid URL"));
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_empty_url_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let client = HttpClient::new();

        let result = client
            .try_fetch_and_save("", &temp_dir.path().join("x"))
            .await;

        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_write_body_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.json");
        std::fs::write(&path, b"old contents that are longer").unwrap();

        let written = write_body(&path, b"{}").await.unwrap();

        assert_eq!(written, 2);
        assert_eq!(std::fs::read(&path).unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_write_body_into_missing_directory_fails_cleanly() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("data.json");

        let result = write_body(&path, b"{}").await;

        assert!(matches!(result, Err(DownloadError::Io { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_initial_capacity_caps_declared_length() {
        assert_eq!(initial_capacity(None), FIRST_CHUNK_SIZE);
        assert_eq!(initial_capacity(Some(120)), 120);
        assert_eq!(
            initial_capacity(Some(900_000_000_000_000)),
            MAX_PREALLOCATED_BODY
        );
        assert_eq!(initial_capacity(Some(u64::MAX)), MAX_PREALLOCATED_BODY);
    }

    #[test]
    fn test_with_profile_replaces_profile() {
        let client = HttpClient::default().with_profile(ClassificationProfile::spreadsheet());
        assert_eq!(
            client.profile().kind,
            crate::classify::ProfileKind::Spreadsheet
        );
    }
}
