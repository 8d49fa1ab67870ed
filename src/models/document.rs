//! Candidate files and validated documents.
//!
//! A [`DocumentCandidate`] is whatever the user picked: a name, a declared
//! media type and the raw bytes. [`validate`] turns it into a [`Document`]
//! when the declared type is PDF. The bytes are never inspected here; the
//! extraction service decides whether they actually parse.

use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::utils::{essence, guess_mime_type, is_pdf_mime, PDF_MIME};

/// Errors from document validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("not a PDF (declared type: {0})")]
    NotPdf(String),

    #[error("not a PDF (no declared type)")]
    MissingType,
}

/// A user-selected file before validation.
#[derive(Clone)]
pub struct DocumentCandidate {
    /// File name as selected by the user.
    pub name: String,
    /// Declared media type, if the source declared one.
    pub media_type: Option<String>,
    /// Raw file contents.
    pub content: Vec<u8>,
}

impl DocumentCandidate {
    pub fn new(
        name: impl Into<String>,
        media_type: Option<impl Into<String>>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.map(Into::into),
            content: content.into(),
        }
    }

    /// Read a candidate from disk, declaring its type from the file extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let content = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        Ok(Self {
            name,
            media_type: guess_mime_type(path),
            content,
        })
    }
}

impl fmt::Debug for DocumentCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentCandidate")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("size", &self.content.len())
            .finish()
    }
}

/// A validated PDF document ready for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    content: Vec<u8>,
}

impl Document {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Media type of the document. Always `application/pdf`.
    pub fn media_type(&self) -> &'static str {
        PDF_MIME
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// File name to send with the upload.
    ///
    /// The extraction service keys on a `.pdf` suffix, so one is appended
    /// when the selected name lacks it.
    pub fn upload_file_name(&self) -> String {
        if self.name.to_ascii_lowercase().ends_with(".pdf") {
            self.name.clone()
        } else {
            format!("{}.pdf", self.name)
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("size", &self.content.len())
            .finish()
    }
}

/// Accept a candidate iff its declared media type is `application/pdf`.
pub fn validate(candidate: DocumentCandidate) -> Result<Document, ValidationError> {
    match candidate.media_type.as_deref() {
        Some(mime) if is_pdf_mime(mime) => Ok(Document {
            name: candidate.name,
            content: candidate.content,
        }),
        Some(mime) if !essence(mime).is_empty() => Err(ValidationError::NotPdf(essence(mime))),
        _ => Err(ValidationError::MissingType),
    }
}
