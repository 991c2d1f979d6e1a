//! Upload client for captured scans.
//!
//! Packages a [`CapturedFrame`] as a multipart POST (`scan` file part plus a
//! `metadata` JSON part) and interprets the endpoint's response. Fire-and-once
//! semantics: nothing is retried, and a failed upload leaves the caller's
//! state untouched — the user re-triggers capture to try again.

use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use scanview_capture::CapturedFrame;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upload client errors.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Network unreachable, connection refused, or request timeout.
    #[error("Upload transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Upload rejected with status {0}")]
    Status(StatusCode),

    #[error("Failed to encode scan metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Metadata record sent alongside the image.
#[derive(Debug, Clone, Serialize)]
pub struct ScanMetadata {
    /// Capture timestamp, serialized as ISO-8601 (RFC 3339).
    pub timestamp: DateTime<Utc>,
    /// Client identifier string.
    pub device: String,
}

/// Response body from the scan endpoint. Every field is optional; only
/// `modelUrl` has client-side meaning.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanResponse {
    #[serde(rename = "modelUrl")]
    pub model_url: Option<String>,
    pub status: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "scanId")]
    pub scan_id: Option<String>,
}

/// HTTP client for the scan endpoint.
pub struct UploadClient {
    http: Client,
    endpoint: Url,
    device: String,
}

impl UploadClient {
    /// Create a client for the given endpoint with the default timeout.
    pub fn new(endpoint: Url) -> Result<Self, UploadError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: Url, timeout: Duration) -> Result<Self, UploadError> {
        let http = Client::builder().timeout(timeout).build()?;
        let device = format!(
            "scanview/{} ({})",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS
        );
        Ok(Self {
            http,
            endpoint,
            device,
        })
    }

    /// The endpoint this client posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Upload one captured frame. Returns the model URL from the response, if
    /// the endpoint provided one.
    ///
    /// A 2xx response with a missing `modelUrl` field is a success with no
    /// model. A 2xx response whose body is not valid JSON is treated the same
    /// way and logged at warn: the scan itself was accepted, and failing here
    /// would force a pointless re-capture.
    pub async fn upload_scan(&self, frame: &CapturedFrame) -> Result<Option<String>, UploadError> {
        let metadata = ScanMetadata {
            timestamp: frame.captured_at,
            device: self.device.clone(),
        };

        let image = Part::bytes(frame.jpeg.clone())
            .file_name(frame.filename())
            .mime_str("image/jpeg")?;
        let form = Form::new()
            .part("scan", image)
            .text("metadata", serde_json::to_string(&metadata)?);

        info!(
            "uploading {} ({} bytes) to {}",
            frame.filename(),
            frame.jpeg.len(),
            self.endpoint
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Status(status));
        }

        match response.json::<ScanResponse>().await {
            Ok(body) => {
                match &body.model_url {
                    Some(url) => info!("scan accepted, model available at {url}"),
                    None => info!("scan accepted, no model returned"),
                }
                Ok(body.model_url)
            }
            Err(e) => {
                warn!("scan accepted but response body was not valid JSON: {e}");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
