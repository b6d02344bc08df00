use bytes::Bytes;

use super::ExtractionError;

/// Reads every page of the PDF in order and concatenates the text.
/// Parsing runs on the blocking pool; a parser panic becomes an `ExtractionError`.
pub async fn extract_pdf_text(content: Bytes) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || read_pages(&content))
        .await
        .map_err(|e| {
            if e.is_panic() {
                ExtractionError::Pdf("PDF reader crashed on this file".to_string())
            } else {
                ExtractionError::Pdf(e.to_string())
            }
        })?
}

fn read_pages(bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    if pages.is_empty() {
        return Err(ExtractionError::Pdf("document has no pages".to_string()));
    }
    Ok(pages.concat())
}
