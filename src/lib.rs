//! LexiShield - legal document analysis client.
//!
//! Validates a PDF, sends it to an extraction service for its text, and runs
//! analyses over that text against an analysis service: a plain-language
//! summary, a jargon glossary, a loophole review, a power-asymmetry review and
//! a chatbot that answers questions about the document.

pub mod backend;
pub mod config;
pub mod models;
pub mod session;
pub mod utils;

pub use backend::BackendConfig;
pub use config::Config;
pub use models::{AnalysisMode, ConversationHistory, DocumentCandidate};
pub use session::{AnalysisSession, SessionError, SessionPhase, SessionSnapshot};
