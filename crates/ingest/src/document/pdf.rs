use super::ExtractionError;

/// Extract the text layer of a PDF. Pages are joined with blank lines.
///
/// Scanned PDFs without a text layer yield an empty string, not an error.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::PdfError(e.to_string()))?;

    // pdf-extract separates pages with form feeds.
    let pages: Vec<&str> = text
        .split('\x0C')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .collect();

    if pages.is_empty() {
        tracing::warn!("PDF has no extractable text layer");
    }

    Ok(pages.join("\n\n"))
}
