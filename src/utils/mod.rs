//! Shared utility functions.
//!
//! - `mime`: media type normalization and guessing
//! - `text`: display helpers for terminal output

mod mime;
mod text;

pub use mime::{essence, guess_mime_type, is_pdf_mime, PDF_MIME};
pub use text::truncate;
