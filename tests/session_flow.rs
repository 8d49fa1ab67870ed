//! End-to-end session flow against a local mock of the LexiShield backend.

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use lexishield::models::Role;
use lexishield::{AnalysisMode, AnalysisSession, BackendConfig, DocumentCandidate, SessionPhase};

const LEASE_TEXT: &str = "RESIDENTIAL LEASE. The tenant shall pay rent monthly.";

#[derive(Default)]
struct MockBackend {
    analyze_bodies: Mutex<Vec<Value>>,
    uploads: Mutex<Vec<String>>,
}

async fn upload(State(mock): State<Arc<MockBackend>>, mut multipart: Multipart) -> Response {
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        field.bytes().await.unwrap();
        mock.uploads.lock().unwrap().push(name);
        return Json(json!({ "document_text": LEASE_TEXT })).into_response();
    }
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "No file part in the request" })),
    )
        .into_response()
}

async fn analyze(State(mock): State<Arc<MockBackend>>, Json(body): Json<Value>) -> Response {
    mock.analyze_bodies.lock().unwrap().push(body.clone());

    let mode = body["analysis_type"].as_str().unwrap_or_default();
    let answer = match mode {
        "chatbot" => {
            let question = body["question"].as_str().unwrap_or_default();
            let turns = body["history"].as_array().map(Vec::len).unwrap_or(0);
            format!("Answer to '{}' after {} turns", question, turns)
        }
        "summary" => "You must pay rent monthly.".to_string(),
        "jargon" => "Tenant: the person renting.".to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid analysis type" })),
            )
                .into_response()
        }
    };
    Json(json!({ "analysis_result": answer })).into_response()
}

async fn start_backend() -> (Arc<MockBackend>, BackendConfig) {
    let mock = Arc::new(MockBackend::default());
    let router = Router::new()
        .route("/upload", post(upload))
        .route("/analyze", post(analyze))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let config = BackendConfig::base_default().with_base_url(&format!("http://{}", addr));
    (mock, config)
}

async fn lease_from_disk(dir: &tempfile::TempDir) -> DocumentCandidate {
    let path = dir.path().join("lease.pdf");
    std::fs::write(&path, b"%PDF-1.4 lease").unwrap();
    DocumentCandidate::from_path(&path).await.unwrap()
}

#[tokio::test]
async fn test_full_session_flow() {
    let (mock, config) = start_backend().await;
    let session = AnalysisSession::from_config(&config).unwrap();
    let dir = tempfile::tempdir().unwrap();

    session.select_document(lease_from_disk(&dir).await).unwrap();
    assert_eq!(session.phase(), SessionPhase::Staged);

    session.upload().await.unwrap();
    assert_eq!(session.phase(), SessionPhase::DocumentReady);
    assert_eq!(session.extracted_text().as_deref(), Some(LEASE_TEXT));
    assert_eq!(*mock.uploads.lock().unwrap(), vec!["lease.pdf".to_string()]);

    session.run_analysis(AnalysisMode::Summary, None).await.unwrap();
    assert_eq!(
        session.analysis_result().as_deref(),
        Some("You must pay rent monthly.")
    );

    session.run_analysis(AnalysisMode::Jargon, None).await.unwrap();
    assert_eq!(
        session.analysis_result().as_deref(),
        Some("Tenant: the person renting.")
    );

    session.switch_mode(AnalysisMode::Chatbot).unwrap();
    assert!(session.analysis_result().is_none());
    assert!(session.conversation_history().is_empty());

    session
        .run_analysis(AnalysisMode::Chatbot, Some("Can I sublet?"))
        .await
        .unwrap();
    session.set_question_input("  Who pays for repairs?  ");
    session.run_analysis(AnalysisMode::Chatbot, None).await.unwrap();

    let history = session.conversation_history();
    let turns: Vec<(Role, &str)> = history.iter().map(|t| (t.role, t.text.as_str())).collect();
    assert_eq!(
        turns,
        vec![
            (Role::User, "Can I sublet?"),
            (Role::Model, "Answer to 'Can I sublet?' after 1 turns"),
            (Role::User, "Who pays for repairs?"),
            (Role::Model, "Answer to 'Who pays for repairs?' after 3 turns"),
        ]
    );

    let snapshot = session.snapshot();
    assert!(!snapshot.busy);
    assert!(snapshot.last_error.is_none());
    assert!(snapshot.question_input.is_empty());
    assert_eq!(snapshot.document_name.as_deref(), Some("lease.pdf"));
}

#[tokio::test]
async fn test_chat_request_carries_history_on_the_wire() {
    let (mock, config) = start_backend().await;
    let session = AnalysisSession::from_config(&config).unwrap();
    let dir = tempfile::tempdir().unwrap();

    session.select_document(lease_from_disk(&dir).await).unwrap();
    session.upload().await.unwrap();
    session
        .run_analysis(AnalysisMode::Chatbot, Some("Is there a deposit?"))
        .await
        .unwrap();
    session
        .run_analysis(AnalysisMode::Chatbot, Some("How much?"))
        .await
        .unwrap();

    let bodies = mock.analyze_bodies.lock().unwrap();
    assert_eq!(bodies.len(), 2);
    assert_eq!(
        bodies[1],
        json!({
            "document_text": LEASE_TEXT,
            "analysis_type": "chatbot",
            "history": [
                { "role": "user", "parts": [{ "text": "Is there a deposit?" }] },
                { "role": "model", "parts": [{ "text": "Answer to 'Is there a deposit?' after 1 turns" }] },
                { "role": "user", "parts": [{ "text": "How much?" }] }
            ],
            "question": "How much?"
        })
    );
}

#[tokio::test]
async fn test_backend_rejection_lands_in_last_error() {
    let (_mock, config) = start_backend().await;
    let session = AnalysisSession::from_config(&config).unwrap();
    let dir = tempfile::tempdir().unwrap();

    session.select_document(lease_from_disk(&dir).await).unwrap();
    session.upload().await.unwrap();

    let err = session
        .run_analysis(AnalysisMode::Loopholes, None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "An error occurred during analysis.");
    assert!(err.detail().contains("Invalid analysis type"));
    assert_eq!(
        session.last_error().as_deref(),
        Some("An error occurred during analysis.")
    );
    assert!(session.analysis_result().is_none());
    assert_eq!(session.active_mode(), Some(AnalysisMode::Loopholes));
}

#[tokio::test]
async fn test_upload_against_unreachable_backend() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = BackendConfig::base_default().with_base_url(&format!("http://{}", addr));
    let session = AnalysisSession::from_config(&config).unwrap();
    let dir = tempfile::tempdir().unwrap();

    session.select_document(lease_from_disk(&dir).await).unwrap();
    session.upload().await.unwrap_err();

    assert_eq!(session.phase(), SessionPhase::Staged);
    assert_eq!(
        session.last_error().as_deref(),
        Some("Error uploading or processing file. Please try again.")
    );
}
