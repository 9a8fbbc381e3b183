//! HTTP utilities for the Azure retail price catalog

use crate::pricing::item::CatalogResponse;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum length of response body to log
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while talking to the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog rejected the query: {0}")]
    Rejected(StatusCode),

    #[error("catalog request failed: {0}")]
    Status(StatusCode),

    #[error("catalog request timed out after {0:?}")]
    Timeout(Duration),

    #[error("catalog request could not be sent: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to parse catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CatalogError {
    /// Client errors mean "no data for this query" rather than a broken transport
    pub fn is_no_data(&self) -> bool {
        matches!(self, CatalogError::Rejected(_))
    }
}

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let char_count = body.chars().count();
    let truncated = if char_count > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for catalog calls
#[derive(Clone)]
pub struct CatalogHttpClient {
    client: Client,
    timeout: Duration,
}

impl CatalogHttpClient {
    /// Create a new HTTP client with a bounded request timeout
    pub fn new(timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(concat!("armcost/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(CatalogError::Transport)?;

        Ok(Self { client, timeout })
    }

    /// Make a GET request against the catalog and decode the body
    pub async fn get(&self, url: &Url) -> Result<CatalogResponse, CatalogError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if status.is_client_error() {
            tracing::warn!("Catalog rejected query: {} - {}", status, sanitize_for_log(&body));
            return Err(CatalogError::Rejected(status));
        }
        if !status.is_success() {
            tracing::error!("Catalog error: {} - {}", status, sanitize_for_log(&body));
            return Err(CatalogError::Status(status));
        }

        Ok(serde_json::from_str(&body)?)
    }

    fn classify(&self, error: reqwest::Error) -> CatalogError {
        if error.is_timeout() {
            CatalogError::Timeout(self.timeout)
        } else {
            CatalogError::Transport(error)
        }
    }
}
