//! Platform content API client
//!
//! Attachments referenced by webhook messages are fetched from the
//! platform's content endpoint: a HEAD request probes size and declared
//! type, then a GET streams the body.

use std::pin::Pin;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::TryStreamExt;
use reqwest::Client;
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;

use mediadesk_core::AppError;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Result of a HEAD probe against the content endpoint.
#[derive(Debug, Clone)]
pub struct ContentProbe {
    pub size_bytes: u64,
    pub content_type: String,
}

/// HTTP client for the platform content API.
#[derive(Clone)]
pub struct ContentClient {
    http_client: Client,
    base_url: String,
    access_token: String,
}

impl ContentClient {
    pub fn new(base_url: String, access_token: String, timeout_seconds: u64) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .context("Failed to create HTTP client for content API")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    fn content_url(&self, message_id: &str) -> String {
        format!("{}/{}/content", self.base_url, message_id)
    }

    /// Probe an attachment's size and declared content type with a HEAD
    /// request. The reported size is authoritative for limit enforcement,
    /// so a missing `Content-Length` is an error.
    #[tracing::instrument(skip(self))]
    pub async fn probe(&self, message_id: &str) -> Result<ContentProbe, AppError> {
        let url = self.content_url(message_id);

        let response = self
            .http_client
            .head(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| AppError::HttpClient(format!("HEAD {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::HttpClient(format!(
                "HEAD {} returned status {}",
                url,
                response.status()
            )));
        }

        let size_bytes = response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or_else(|| {
                AppError::HttpClient(format!("HEAD {} returned no content length", url))
            })?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        tracing::debug!(
            message_id = %message_id,
            size_bytes,
            content_type = %content_type,
            "Content probe completed"
        );

        Ok(ContentProbe {
            size_bytes,
            content_type,
        })
    }

    /// Fetch an attachment body as a streaming reader. Chunks arrive as the
    /// destination consumes them; the payload is never buffered whole.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(
        &self,
        message_id: &str,
    ) -> Result<Pin<Box<dyn AsyncRead + Send + Unpin>>, AppError> {
        let url = self.content_url(message_id);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| AppError::HttpClient(format!("GET {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::HttpClient(format!(
                "GET {} returned status {}",
                url,
                response.status()
            )));
        }

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let reader = StreamReader::new(Box::pin(stream));

        Ok(Box::pin(reader))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_url_format() {
        let client = ContentClient::new(
            "https://api-data.line.me/v2/bot/message/".to_string(),
            "token".to_string(),
            30,
        )
        .unwrap();

        assert_eq!(
            client.content_url("100001"),
            "https://api-data.line.me/v2/bot/message/100001/content"
        );
    }
}
