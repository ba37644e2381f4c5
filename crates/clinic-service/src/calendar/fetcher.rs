//! HTTP access to published calendar documents.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use clinic_core::config::calendar::CalendarConfig;
use clinic_core::error::AppError;

/// Source of calendar documents.
#[async_trait]
pub trait CalendarFetcher: Send + Sync + std::fmt::Debug + 'static {
    /// Whether `url` answers a HEAD request with a success status.
    async fn probe(&self, url: &str) -> bool;

    /// Download `url` and return its text. PDFs are converted to text.
    async fn fetch_text(&self, url: &str) -> Result<String, AppError>;
}

/// Fetcher backed by `reqwest` with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpCalendarFetcher {
    client: reqwest::Client,
}

impl HttpCalendarFetcher {
    /// Build the HTTP client from calendar configuration.
    pub fn new(config: &CalendarConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

/// Whether a response body is a PDF, by header or magic bytes.
fn is_pdf(content_type: Option<&str>, body: &[u8]) -> bool {
    content_type.is_some_and(|ct| ct.contains("pdf")) || body.starts_with(b"%PDF")
}

/// Convert a downloaded body to text.
pub fn body_to_text(content_type: Option<&str>, body: &[u8]) -> Result<String, AppError> {
    if is_pdf(content_type, body) {
        // pdf-extract panics on some malformed documents.
        std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(body))
            .map_err(|_| AppError::external_service("PDF text extraction panicked"))?
            .map_err(|e| AppError::external_service(format!("PDF text extraction failed: {e}")))
    } else {
        Ok(String::from_utf8_lossy(body).into_owned())
    }
}

#[async_trait]
impl CalendarFetcher for HttpCalendarFetcher {
    async fn probe(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(resp) => {
                debug!(url, status = %resp.status(), "Probed calendar URL");
                resp.status().is_success()
            }
            Err(e) => {
                debug!(url, error = %e, "Calendar URL probe failed");
                false
            }
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String, AppError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::external_service(format!("Failed to fetch {url}: {e}")))?;

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp
            .bytes()
            .await
            .map_err(|e| AppError::external_service(format!("Failed to read {url}: {e}")))?;

        // PDF parsing is CPU-bound.
        tokio::task::spawn_blocking(move || body_to_text(content_type.as_deref(), &body))
            .await
            .map_err(|e| AppError::internal(format!("PDF extraction task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        let text = body_to_text(Some("text/plain; charset=utf-8"), "29 Ekim".as_bytes()).unwrap();
        assert_eq!(text, "29 Ekim");
    }

    #[test]
    fn test_pdf_detection() {
        assert!(is_pdf(Some("application/pdf"), b""));
        assert!(is_pdf(None, b"%PDF-1.4"));
        assert!(!is_pdf(Some("text/html"), b"<html>"));
    }

    #[test]
    fn test_broken_pdf_is_an_error() {
        assert!(body_to_text(Some("application/pdf"), b"%PDF-garbage").is_err());
    }
}
