use std::path::Path;

use anyhow::{anyhow, Result};
use tracing::info;

/// Extract plain text from the offering PDF, one string per page.
///
/// Text extraction carries no table structure, so callers feed each page
/// through the text-line splitter. Unreadable files surface as errors for
/// the caller to handle (the `run` pipeline falls back to sample data).
pub fn extract_pages(path: &Path) -> Result<Vec<String>> {
    info!("Extracting text from {}", path.display());
    let pages = pdf_extract::extract_text_by_pages(path)
        .map_err(|e| anyhow!("Failed to extract text from {}: {}", path.display(), e))?;
    info!("Extracted {} pages", pages.len());
    Ok(pages)
}
