//! Media type normalization and guessing.

use std::path::Path;

/// The only media type accepted for analysis.
pub const PDF_MIME: &str = "application/pdf";

/// Strip parameters and whitespace from a media type, lowercased.
///
/// `"Application/PDF; charset=binary"` becomes `"application/pdf"`.
pub fn essence(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Check whether a declared media type names a PDF.
pub fn is_pdf_mime(mime: &str) -> bool {
    essence(mime) == PDF_MIME
}

/// Guess the media type of a file from its extension.
///
/// Returns `None` when the extension is unknown, the same way a browser file
/// input leaves the type empty.
pub fn guess_mime_type(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
}
