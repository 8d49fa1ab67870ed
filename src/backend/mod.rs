//! Clients for the remote extraction and analysis services.
//!
//! Both services sit behind one backend. Each has an async trait
//! ([`ExtractionClient`], [`AnalysisClient`]) so the session can be driven by
//! anything that honors the contract, and an HTTP implementation that speaks
//! the backend's JSON wire format.

mod analysis;
mod config;
mod extraction;

#[cfg(test)]
pub(crate) mod test_support;

pub use analysis::{AnalysisClient, AnalysisError, AnalysisRequest, HttpAnalysisClient};
pub use config::BackendConfig;
pub use extraction::{ExtractionClient, ExtractionError, HttpExtractionClient};

use reqwest::{Client, Response};
use serde::Deserialize;

use crate::utils::truncate;

/// Longest error body we keep in an error message.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Build the HTTP client shared by the service clients.
pub(crate) fn build_http_client(config: &BackendConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.timeout())
        .user_agent(concat!("lexishield/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Error body format used by the backend (`{"error": "..."}`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Read a failed response into a short human-readable message.
pub(crate) async fn error_message(resp: Response) -> String {
    let body = resp.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.error,
        Err(_) => truncate(body.trim(), MAX_ERROR_BODY_CHARS),
    }
}
