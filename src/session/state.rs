//! Session state and the read-only view handed to the presentation layer.

use std::sync::Arc;

use serde::Serialize;

use super::error::SessionError;
use crate::models::{AnalysisMode, AnalysisResult, ConversationHistory, Document};

/// The network operation currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Extraction,
    Analysis(AnalysisMode),
}

/// Where the session is in its lifecycle. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No document selected.
    Idle,
    /// A document is selected but has no extracted text yet.
    Staged,
    /// Text extraction is running.
    DocumentLoading,
    /// Extracted text is available and nothing is running.
    DocumentReady,
    /// An analysis call is running.
    AnalysisRunning,
}

#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub document: Option<Arc<Document>>,
    /// Bumped on every successful document selection.
    pub generation: u64,
    pub extracted_text: Option<Arc<str>>,
    pub active_mode: Option<AnalysisMode>,
    pub result: Option<AnalysisResult>,
    pub history: ConversationHistory,
    pub question_input: String,
    pub in_flight: Option<Operation>,
    pub last_error: Option<String>,
}

impl SessionState {
    pub fn busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        match (self.in_flight, &self.extracted_text, &self.document) {
            (Some(Operation::Extraction), _, _) => SessionPhase::DocumentLoading,
            (Some(Operation::Analysis(_)), _, _) => SessionPhase::AnalysisRunning,
            (None, Some(_), _) => SessionPhase::DocumentReady,
            (None, None, Some(_)) => SessionPhase::Staged,
            (None, None, None) => SessionPhase::Idle,
        }
    }

    /// Drop everything derived from the current document.
    pub fn clear_derived(&mut self) {
        self.extracted_text = None;
        self.result = None;
        self.history.clear();
        self.active_mode = None;
    }

    /// Install a freshly validated document and start a new generation.
    pub fn install_document(&mut self, document: Document) {
        self.clear_derived();
        self.document = Some(Arc::new(document));
        self.generation += 1;
        self.question_input.clear();
        self.last_error = None;
    }

    /// Record `err` in the status slot (when it belongs there) and hand it back.
    pub fn fail(&mut self, err: SessionError) -> SessionError {
        if err.is_recorded() {
            self.last_error = Some(err.to_string());
        }
        err
    }

    /// The stored result, if it belongs to the active mode.
    pub fn visible_result(&self) -> Option<&AnalysisResult> {
        self.result
            .as_ref()
            .filter(|r| self.active_mode == Some(r.mode))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase(),
            busy: self.busy(),
            last_error: self.last_error.clone(),
            document_name: self.document.as_ref().map(|d| d.name().to_string()),
            extracted_text: self.extracted_text.clone(),
            active_mode: self.active_mode,
            analysis_result: self.visible_result().map(|r| r.text.clone()),
            conversation_history: self.history.clone(),
            question_input: self.question_input.clone(),
        }
    }
}

/// Everything the presentation layer reads, copied out of the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub busy: bool,
    pub last_error: Option<String>,
    pub document_name: Option<String>,
    pub extracted_text: Option<Arc<str>>,
    pub active_mode: Option<AnalysisMode>,
    /// Result of the active single-shot mode, if any.
    pub analysis_result: Option<String>,
    pub conversation_history: ConversationHistory,
    pub question_input: String,
}
