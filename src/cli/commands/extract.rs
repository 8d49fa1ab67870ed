//! Text extraction command.

use std::path::Path;

use lexishield::Config;

use crate::cli::helpers::open_document;

/// Extract a PDF through the backend and print its text.
pub async fn cmd_extract(config: &Config, file: &Path) -> anyhow::Result<()> {
    let session = open_document(config, file).await?;
    if let Some(text) = session.extracted_text() {
        println!("{}", text);
    }
    Ok(())
}
