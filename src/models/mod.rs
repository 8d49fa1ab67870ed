//! Data models for LexiShield.

mod analysis;
mod conversation;
mod document;

pub use analysis::{AnalysisMode, AnalysisResult, ParseModeError};
pub use conversation::{ConversationHistory, ConversationTurn, Role};
pub use document::{validate, Document, DocumentCandidate, ValidationError};
