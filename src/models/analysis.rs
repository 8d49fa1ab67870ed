//! Analysis modes and single-shot results.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// The kind of analysis to run against a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Plain-language summary of obligations, rights and risks.
    Summary,
    /// Legal terms with simple explanations.
    Jargon,
    /// Missing clauses, contradictions and unfair conditions.
    Loopholes,
    /// One-sided or imbalanced clauses.
    Asymmetry,
    /// Multi-turn questions answered from the document.
    Chatbot,
}

impl AnalysisMode {
    /// Modes that produce a single result rather than a conversation.
    pub const SINGLE_SHOT: [AnalysisMode; 4] =
        [Self::Summary, Self::Jargon, Self::Loopholes, Self::Asymmetry];

    /// Wire tag sent as `analysis_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Jargon => "jargon",
            Self::Loopholes => "loopholes",
            Self::Asymmetry => "asymmetry",
            Self::Chatbot => "chatbot",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Summary => "Summarize Document",
            Self::Jargon => "Explain Jargon",
            Self::Loopholes => "Find Loopholes",
            Self::Asymmetry => "Detect Asymmetry",
            Self::Chatbot => "Legal Chatbot",
        }
    }

    pub fn is_chatbot(&self) -> bool {
        matches!(self, Self::Chatbot)
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown mode tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown analysis mode '{0}' (expected one of: summary, jargon, loopholes, asymmetry, chatbot)")]
pub struct ParseModeError(pub String);

impl FromStr for AnalysisMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" => Ok(Self::Summary),
            "jargon" => Ok(Self::Jargon),
            "loopholes" => Ok(Self::Loopholes),
            "asymmetry" => Ok(Self::Asymmetry),
            "chatbot" | "chat" => Ok(Self::Chatbot),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Output of a single-shot analysis, tagged with the mode that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub mode: AnalysisMode,
    pub text: String,
}
