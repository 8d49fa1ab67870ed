//! Session error taxonomy.
//!
//! The `Display` text of each variant is what lands in the session's
//! `last_error` slot, so it is written for the end user. The underlying cause
//! stays reachable through `source()`.

use thiserror::Error;

use crate::backend::{AnalysisError, ExtractionError};
use crate::models::ValidationError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please select a valid PDF file.")]
    Validation(#[source] ValidationError),

    #[error("No file selected.")]
    NoDocument,

    #[error("Error uploading or processing file. Please try again.")]
    Extraction(#[source] ExtractionError),

    #[error("Please upload a document first.")]
    NoDocumentText,

    #[error("An error occurred during analysis.")]
    Analysis(#[source] AnalysisError),

    #[error("Please enter a question.")]
    EmptyQuestion,

    #[error("Another operation is still in progress.")]
    Busy,

    /// A new document was selected while the operation was in flight; its
    /// outcome was discarded.
    #[error("The document changed before the operation finished.")]
    Superseded,
}

impl SessionError {
    /// Whether this error is recorded in `last_error`.
    ///
    /// Busy and superseded rejections leave the status slot to the operation
    /// that owns it.
    pub fn is_recorded(&self) -> bool {
        !matches!(self, Self::Busy | Self::Superseded)
    }

    /// Detailed cause for logs, e.g. the HTTP status behind an extraction failure.
    pub fn detail(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Extraction(e) => e.to_string(),
            Self::Analysis(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}
