//! The analysis session: the state machine behind the user interface.
//!
//! A session owns the selected document, its extracted text, the active
//! analysis mode, the latest single-shot result, the chatbot conversation and
//! the busy/error status. Every mutation goes through one of its operations.
//!
//! Operations take `&self` so a session can be shared behind an `Arc` between
//! the presentation layer and whatever task is awaiting a network call. State
//! sits behind a `std::sync::Mutex` that is only held between suspension
//! points, never across one. At most one network operation is in flight;
//! a second `upload`/`run_analysis`/`switch_mode` while busy is rejected with
//! [`SessionError::Busy`].
//!
//! ```text
//! Idle -> Staged -> DocumentLoading -> DocumentReady <-> AnalysisRunning
//! ```

mod error;
mod state;


pub use error::SessionError;
pub use state::{SessionPhase, SessionSnapshot};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::backend::{
    AnalysisClient, AnalysisRequest, BackendConfig, ExtractionClient, ExtractionError,
    HttpAnalysisClient, HttpExtractionClient,
};
use crate::models::{
    validate, AnalysisMode, AnalysisResult, ConversationHistory, ConversationTurn,
    DocumentCandidate,
};
use state::{Operation, SessionState};

/// Orchestrates extraction and analysis for one document at a time.
pub struct AnalysisSession {
    extractor: Arc<dyn ExtractionClient>,
    analyzer: Arc<dyn AnalysisClient>,
    state: Mutex<SessionState>,
}

impl AnalysisSession {
    pub fn new(extractor: Arc<dyn ExtractionClient>, analyzer: Arc<dyn AnalysisClient>) -> Self {
        Self {
            extractor,
            analyzer,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Create a session talking to the configured HTTP backend.
    pub fn from_config(config: &BackendConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            Arc::new(HttpExtractionClient::new(config)?),
            Arc::new(HttpAnalysisClient::new(config)?),
        ))
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // No operation panics while holding the guard half-way through a mutation
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate and stage a document.
    ///
    /// On success every piece of derived state is reset. On failure the error
    /// is recorded and the previously staged document, if any, stays in place.
    pub fn select_document(&self, candidate: DocumentCandidate) -> Result<(), SessionError> {
        let name = candidate.name.clone();
        let mut state = self.lock();

        match validate(candidate) {
            Ok(document) => {
                if state.busy() {
                    debug!("Selecting {} while an operation is in flight", name);
                }
                info!("Selected document {} ({} bytes)", name, document.size());
                state.install_document(document);
                Ok(())
            }
            Err(e) => {
                warn!("Rejected document {}: {}", name, e);
                Err(state.fail(SessionError::Validation(e)))
            }
        }
    }

    /// Send the staged document to the extraction service.
    pub async fn upload(&self) -> Result<(), SessionError> {
        let (document, generation) = {
            let mut state = self.lock();
            if state.busy() {
                return Err(SessionError::Busy);
            }
            let Some(document) = state.document.clone() else {
                return Err(state.fail(SessionError::NoDocument));
            };

            state.in_flight = Some(Operation::Extraction);
            state.last_error = None;
            state.clear_derived();
            (document, state.generation)
        };

        let outcome = self.extractor.extract(&document).await;

        let mut state = self.lock();
        state.in_flight = None;
        if state.generation != generation {
            debug!("Discarding extraction result for replaced document {}", document.name());
            return Err(SessionError::Superseded);
        }

        match outcome {
            Ok(text) if text.trim().is_empty() => {
                warn!("Extraction returned no text for {}", document.name());
                Err(state.fail(SessionError::Extraction(ExtractionError::Empty)))
            }
            Ok(text) => {
                info!("Document {} ready for analysis", document.name());
                state.extracted_text = Some(Arc::from(text));
                Ok(())
            }
            Err(e) => {
                warn!("Extraction failed for {}: {}", document.name(), e);
                Err(state.fail(SessionError::Extraction(e)))
            }
        }
    }

    /// Run an analysis against the extracted text.
    ///
    /// For [`AnalysisMode::Chatbot`] the question is appended to the
    /// conversation as a user turn before the request goes out, and stays
    /// there even if the request fails. When `question` is `None` the pending
    /// question input is used.
    pub async fn run_analysis(
        &self,
        mode: AnalysisMode,
        question: Option<&str>,
    ) -> Result<(), SessionError> {
        let (request, generation) = {
            let mut state = self.lock();
            if state.busy() {
                return Err(SessionError::Busy);
            }
            let usable = state.extracted_text.clone().filter(|t| !t.trim().is_empty());
            let Some(text) = usable else {
                return Err(state.fail(SessionError::NoDocumentText));
            };

            let request = if mode.is_chatbot() {
                let question = question
                    .map(str::to_string)
                    .unwrap_or_else(|| state.question_input.clone());
                let question = question.trim();
                if question.is_empty() {
                    return Err(state.fail(SessionError::EmptyQuestion));
                }

                state.history.push(ConversationTurn::user(question));
                state.question_input.clear();
                AnalysisRequest::chat(text, state.history.clone(), question)
            } else {
                AnalysisRequest::single_shot(text, mode)
            };

            state.in_flight = Some(Operation::Analysis(mode));
            state.last_error = None;
            state.active_mode = Some(mode);
            state.result = None;
            (request, state.generation)
        };

        debug!("Running {} analysis", mode);
        let outcome = self.analyzer.analyze(&request).await;

        let mut state = self.lock();
        state.in_flight = None;
        if state.generation != generation {
            debug!("Discarding {} analysis for replaced document", mode);
            return Err(SessionError::Superseded);
        }

        match outcome {
            Ok(answer) if mode.is_chatbot() => {
                state.history.push(ConversationTurn::model(answer));
                Ok(())
            }
            Ok(answer) => {
                info!("{} analysis complete ({} chars)", mode, answer.len());
                state.result = Some(AnalysisResult { mode, text: answer });
                Ok(())
            }
            Err(e) => {
                warn!("{} analysis failed: {}", mode, e);
                Err(state.fail(SessionError::Analysis(e)))
            }
        }
    }

    /// Change the active mode without calling the analysis service.
    ///
    /// Switching to the chatbot clears the single-shot result. Switching to
    /// another single-shot mode only changes which result is visible.
    pub fn switch_mode(&self, mode: AnalysisMode) -> Result<(), SessionError> {
        let mut state = self.lock();
        if state.busy() {
            return Err(SessionError::Busy);
        }

        state.active_mode = Some(mode);
        if mode.is_chatbot() {
            state.result = None;
        }
        Ok(())
    }

    /// Store the pending chatbot question.
    pub fn set_question_input(&self, text: impl Into<String>) {
        self.lock().question_input = text.into();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    pub fn phase(&self) -> SessionPhase {
        self.lock().phase()
    }

    pub fn is_busy(&self) -> bool {
        self.lock().busy()
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    pub fn active_mode(&self) -> Option<AnalysisMode> {
        self.lock().active_mode
    }

    pub fn extracted_text(&self) -> Option<Arc<str>> {
        self.lock().extracted_text.clone()
    }

    /// Result of the active single-shot mode.
    pub fn analysis_result(&self) -> Option<String> {
        self.lock().visible_result().map(|r| r.text.clone())
    }

    pub fn conversation_history(&self) -> ConversationHistory {
        self.lock().history.clone()
    }
}
