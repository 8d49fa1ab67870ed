//! AI analysis client.
//!
//! Single-shot modes send just the document text. The chatbot also sends the
//! whole conversation so far (already ending with the new user turn) and the
//! question itself, mirroring what the backend folds into its prompt.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::{build_http_client, error_message, BackendConfig};
use crate::models::{AnalysisMode, ConversationHistory, Role};

/// Replies the backend sends with HTTP 200 when its own AI call failed.
const SERVICE_FAILURES: [&str; 3] = [
    "Error: API key is not configured on the server.",
    "Error: Unexpected response format from AI.",
    "Error: Could not connect to AI service.",
];

/// Errors from the analysis service.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Analysis service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed analysis response: {0}")]
    Malformed(String),

    #[error("Analysis service reported: {0}")]
    Service(String),

    #[error("Invalid analysis request: {0}")]
    InvalidRequest(String),
}

/// Everything the analysis service needs for one call.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub document_text: Arc<str>,
    pub mode: AnalysisMode,
    pub history: Option<ConversationHistory>,
    pub question: Option<String>,
}

impl AnalysisRequest {
    /// Request for a non-chatbot mode.
    pub fn single_shot(document_text: Arc<str>, mode: AnalysisMode) -> Self {
        Self {
            document_text,
            mode,
            history: None,
            question: None,
        }
    }

    /// Chatbot request. `history` must already end with the user's question.
    pub fn chat(
        document_text: Arc<str>,
        history: ConversationHistory,
        question: impl Into<String>,
    ) -> Self {
        Self {
            document_text,
            mode: AnalysisMode::Chatbot,
            history: Some(history),
            question: Some(question.into()),
        }
    }

    /// Check the mode-dependent shape of the request.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.mode.is_chatbot() {
            let question = self.question.as_deref().map(str::trim).unwrap_or_default();
            if question.is_empty() {
                return Err(AnalysisError::InvalidRequest(
                    "chatbot requests need a question".to_string(),
                ));
            }
        } else if self.history.is_some() || self.question.is_some() {
            return Err(AnalysisError::InvalidRequest(format!(
                "{} requests take no history or question",
                self.mode
            )));
        }
        Ok(())
    }
}

/// Produces answers for analysis requests.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Run one analysis and return the result text.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<String, AnalysisError>;
}

/// `/analyze` request body.
#[derive(Debug, Serialize)]
struct AnalyzeBody<'a> {
    document_text: &'a str,
    analysis_type: AnalysisMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    history: Option<Vec<WireTurn<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<&'a str>,
}

/// Conversation turn in the backend's `{role, parts: [{text}]}` shape.
#[derive(Debug, Serialize)]
struct WireTurn<'a> {
    role: Role,
    parts: [WirePart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

/// `/analyze` response body.
#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    analysis_result: String,
}

impl<'a> AnalyzeBody<'a> {
    fn from_request(request: &'a AnalysisRequest) -> Self {
        let history = request.history.as_ref().map(|history| {
            history
                .iter()
                .map(|turn| WireTurn {
                    role: turn.role,
                    parts: [WirePart { text: &turn.text }],
                })
                .collect()
        });

        Self {
            document_text: &*request.document_text,
            analysis_type: request.mode,
            history,
            question: request.question.as_deref().map(str::trim),
        }
    }
}

/// Analysis client for the backend's JSON `/analyze` endpoint.
pub struct HttpAnalysisClient {
    url: String,
    client: Client,
}

impl HttpAnalysisClient {
    pub fn new(config: &BackendConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            url: config.analyze_url(),
            client: build_http_client(config)?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
        request.validate()?;
        let body = AnalyzeBody::from_request(request);

        debug!(
            "Requesting {} analysis ({} history turns)",
            request.mode,
            request.history.as_ref().map_or(0, |h| h.len())
        );
        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = error_message(resp).await;
            return Err(AnalysisError::Status { status, message });
        }

        let parsed: AnalyzeResponse = resp
            .json()
            .await
            .map_err(|e| AnalysisError::Malformed(e.to_string()))?;

        let result = parsed.analysis_result;
        if let Some(failure) = SERVICE_FAILURES.iter().find(|f| result.trim() == **f) {
            let reason = failure.trim_start_matches("Error:").trim();
            warn!("Analysis service reported failure: {}", reason);
            return Err(AnalysisError::Service(reason.to_string()));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_support::spawn_backend;
    use crate::models::ConversationTurn;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::Mutex;

    async fn client_for(router: Router) -> HttpAnalysisClient {
        let base = spawn_backend(router).await;
        HttpAnalysisClient::new(&BackendConfig::base_default().with_base_url(&base)).unwrap()
    }

    /// Backend that records every request body and answers with `answer`.
    async fn recording_client(answer: &'static str) -> (HttpAnalysisClient, Arc<Mutex<Vec<Value>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let router = Router::new().route(
            "/analyze",
            post(move |Json(body): Json<Value>| {
                let recorder = recorder.clone();
                async move {
                    recorder.lock().unwrap().push(body);
                    Json(json!({ "analysis_result": answer }))
                }
            }),
        );
        (client_for(router).await, seen)
    }

    #[test]
    fn test_request_validation() {
        let text: Arc<str> = Arc::from("Lorem ipsum");
        assert!(AnalysisRequest::single_shot(text.clone(), AnalysisMode::Summary)
            .validate()
            .is_ok());
        assert!(
            AnalysisRequest::chat(text.clone(), ConversationHistory::new(), "  ")
                .validate()
                .is_err()
        );

        let mut bad = AnalysisRequest::single_shot(text, AnalysisMode::Jargon);
        bad.question = Some("why?".to_string());
        assert!(matches!(
            bad.validate().unwrap_err(),
            AnalysisError::InvalidRequest(_)
        ));
    }

    #[tokio::test]
    async fn test_single_shot_wire_format() {
        let (client, seen) = recording_client("This document states...").await;

        let request = AnalysisRequest::single_shot(Arc::from("Lorem ipsum"), AnalysisMode::Summary);
        let answer = client.analyze(&request).await.unwrap();
        assert_eq!(answer, "This document states...");

        let bodies = seen.lock().unwrap();
        assert_eq!(
            bodies[0],
            json!({ "document_text": "Lorem ipsum", "analysis_type": "summary" })
        );
    }

    #[tokio::test]
    async fn test_chat_wire_format_includes_new_turn() {
        let (client, seen) = recording_client("Clause 4 covers termination.").await;

        let mut history = ConversationHistory::new();
        history.push(ConversationTurn::user("Who are the parties?"));
        history.push(ConversationTurn::model("Acme and Bob."));
        history.push(ConversationTurn::user("What is clause 4?"));
        let request = AnalysisRequest::chat(Arc::from("Lorem ipsum"), history, "What is clause 4?");

        client.analyze(&request).await.unwrap();

        let bodies = seen.lock().unwrap();
        assert_eq!(
            bodies[0],
            json!({
                "document_text": "Lorem ipsum",
                "analysis_type": "chatbot",
                "history": [
                    { "role": "user", "parts": [{ "text": "Who are the parties?" }] },
                    { "role": "model", "parts": [{ "text": "Acme and Bob." }] },
                    { "role": "user", "parts": [{ "text": "What is clause 4?" }] }
                ],
                "question": "What is clause 4?"
            })
        );
    }

    #[tokio::test]
    async fn test_invalid_request_is_not_sent() {
        let (client, seen) = recording_client("unused").await;

        let request = AnalysisRequest::chat(Arc::from("Lorem"), ConversationHistory::new(), "");
        assert!(client.analyze(&request).await.is_err());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_known_backend_failure_text_is_failure() {
        let (client, _) = recording_client("Error: Could not connect to AI service.").await;

        let request = AnalysisRequest::single_shot(Arc::from("Lorem"), AnalysisMode::Loopholes);
        match client.analyze(&request).await.unwrap_err() {
            AnalysisError::Service(reason) => assert_eq!(reason, "Could not connect to AI service."),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_answer_quoting_an_error_is_not_a_failure() {
        let answer = "Error: clause 7 misnames the landlord, so the notice may be void.";
        let (client, _) = recording_client(answer).await;

        let mut history = ConversationHistory::new();
        history.push(ConversationTurn::user("Any mistakes?"));
        let request = AnalysisRequest::chat(Arc::from("Lorem"), history, "Any mistakes?");
        assert_eq!(client.analyze(&request).await.unwrap(), answer);
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let router = Router::new().route(
            "/analyze",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid analysis type" })),
                )
            }),
        );
        let client = client_for(router).await;

        let request = AnalysisRequest::single_shot(Arc::from("Lorem"), AnalysisMode::Asymmetry);
        match client.analyze(&request).await.unwrap_err() {
            AnalysisError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid analysis type");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let router = Router::new().route("/analyze", post(|| async { "not json" }));
        let client = client_for(router).await;

        let request = AnalysisRequest::single_shot(Arc::from("Lorem"), AnalysisMode::Summary);
        assert!(matches!(
            client.analyze(&request).await.unwrap_err(),
            AnalysisError::Malformed(_)
        ));
    }
}
