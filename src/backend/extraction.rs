//! Document text extraction client.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use super::{build_http_client, error_message, BackendConfig};
use crate::models::Document;

/// Errors from the extraction service.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Extraction service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed extraction response: {0}")]
    Malformed(String),

    #[error("Extraction service returned no text")]
    Empty,
}

/// Turns a validated document into plain text.
#[async_trait]
pub trait ExtractionClient: Send + Sync {
    /// Submit the document in one request and return its text.
    async fn extract(&self, document: &Document) -> Result<String, ExtractionError>;
}

/// Upload response format.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    document_text: String,
}

/// Extraction client for the backend's multipart `/upload` endpoint.
pub struct HttpExtractionClient {
    url: String,
    client: Client,
}

impl HttpExtractionClient {
    pub fn new(config: &BackendConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            url: config.upload_url(),
            client: build_http_client(config)?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ExtractionClient for HttpExtractionClient {
    async fn extract(&self, document: &Document) -> Result<String, ExtractionError> {
        let part = Part::bytes(document.content().to_vec())
            .file_name(document.upload_file_name())
            .mime_str(document.media_type())
            .map_err(|e| ExtractionError::Connection(e.to_string()))?;
        let form = Form::new().part("file", part);

        debug!(
            "Uploading {} ({} bytes) to {}",
            document.name(),
            document.size(),
            self.url
        );
        let resp = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ExtractionError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = error_message(resp).await;
            return Err(ExtractionError::Status { status, message });
        }

        let body: UploadResponse = resp
            .json()
            .await
            .map_err(|e| ExtractionError::Malformed(e.to_string()))?;

        if body.document_text.trim().is_empty() {
            return Err(ExtractionError::Empty);
        }

        info!(
            "Extracted {} characters from {}",
            body.document_text.chars().count(),
            document.name()
        );
        Ok(body.document_text)
    }
}
