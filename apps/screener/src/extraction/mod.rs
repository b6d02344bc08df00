//! Text Extractor: turns an uploaded PDF or resume image into plain text.
//!
//! PDFs are read locally, page by page. Images are decoded locally and then
//! transcribed by the vision model through `GenerativeModel`.
//! Length checks on the result belong to the caller.

mod pdf;
mod raster;

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

use crate::llm_client::prompts::IMAGE_TRANSCRIPTION_PROMPT;
use crate::llm_client::{GenerativeModel, InlineImage, LlmError};

/// Every extension the extractor understands, lowercase and without the dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg", "gif", "bmp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Image,
    Unsupported,
}

impl DocumentFormat {
    pub fn from_filename(filename: &str) -> Self {
        match extension_of(filename).as_deref() {
            Some("pdf") => DocumentFormat::Pdf,
            Some("png" | "jpg" | "jpeg" | "gif" | "bmp") => DocumentFormat::Image,
            _ => DocumentFormat::Unsupported,
        }
    }
}

/// Lowercased extension after the last dot, if the name has one.
pub fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// An uploaded file. Lives only for the duration of one request.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub content: Bytes,
    /// Declared size in bytes, as received.
    pub size: usize,
    pub format: DocumentFormat,
}

impl Document {
    pub fn new(filename: impl Into<String>, content: Bytes) -> Self {
        let filename = filename.into();
        let format = DocumentFormat::from_filename(&filename);
        Self {
            size: content.len(),
            filename,
            content,
            format,
        }
    }

    pub fn extension(&self) -> Option<String> {
        extension_of(&self.filename)
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported file format")]
    UnsupportedFormat,

    #[error("PDF could not be read: {0}")]
    Pdf(String),

    #[error("image could not be decoded: {0}")]
    Image(String),

    #[error("image transcription failed: {0}")]
    Transcription(#[from] LlmError),
}

/// Extracts text from documents, using the model only for images.
#[derive(Clone)]
pub struct TextExtractor {
    model: Arc<dyn GenerativeModel>,
}

impl TextExtractor {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    pub async fn extract(&self, document: &Document) -> Result<String, ExtractionError> {
        match document.format {
            DocumentFormat::Pdf => pdf::extract_pdf_text(document.content.clone()).await,
            DocumentFormat::Image => self.transcribe_image(document).await,
            DocumentFormat::Unsupported => Err(ExtractionError::UnsupportedFormat),
        }
    }

    async fn transcribe_image(&self, document: &Document) -> Result<String, ExtractionError> {
        let png = raster::normalize_to_png(document.content.clone()).await?;
        debug!(
            filename = %document.filename,
            png_bytes = png.len(),
            "Image decoded, requesting transcription"
        );

        let image = InlineImage {
            mime_type: "image/png",
            data: png,
        };
        let text = self
            .model
            .generate_with_image(IMAGE_TRANSCRIPTION_PROMPT, &image)
            .await?;

        if text.trim().is_empty() {
            return Err(ExtractionError::Transcription(LlmError::EmptyContent));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::mock::{Reply, ScriptedModel};
    use crate::test_support::tiny_png;

    fn extractor(model: &Arc<ScriptedModel>) -> TextExtractor {
        TextExtractor::new(model.clone())
    }

    #[test]
    fn test_format_inferred_from_extension_case_insensitively() {
        assert_eq!(DocumentFormat::from_filename("cv.PDF"), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_filename("scan.Jpeg"), DocumentFormat::Image);
        assert_eq!(DocumentFormat::from_filename("scan.bmp"), DocumentFormat::Image);
        assert_eq!(
            DocumentFormat::from_filename("resume.docx"),
            DocumentFormat::Unsupported
        );
    }

    #[test]
    fn test_name_without_dot_is_unsupported() {
        assert_eq!(DocumentFormat::from_filename("pdf"), DocumentFormat::Unsupported);
        assert_eq!(DocumentFormat::from_filename("resume."), DocumentFormat::Unsupported);
        assert_eq!(extension_of("archive.tar.GZ").as_deref(), Some("gz"));
    }

    #[test]
    fn test_document_size_matches_content() {
        let doc = Document::new("a.pdf", Bytes::from_static(b"12345"));
        assert_eq!(doc.size, 5);
        assert_eq!(doc.extension().as_deref(), Some("pdf"));
    }

    #[tokio::test]
    async fn test_unsupported_format_never_calls_model() {
        let model = Arc::new(ScriptedModel::new());
        let doc = Document::new("resume.docx", Bytes::from_static(b"whatever"));

        let err = extractor(&model).extract(&doc).await.unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat));
        assert_eq!(model.image_calls() + model.text_calls(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_extraction_error() {
        let model = Arc::new(ScriptedModel::new());
        let doc = Document::new("broken.pdf", Bytes::from_static(b"this is not a pdf at all"));

        let err = extractor(&model).extract(&doc).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)), "got {err:?}");
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_image_is_transcribed_by_model() {
        let model = Arc::new(
            ScriptedModel::new().on_image(Reply::text("Jane Doe\nSenior Engineer\nRust, Go")),
        );
        let doc = Document::new("scan.png", tiny_png());

        let text = extractor(&model).extract(&doc).await.unwrap();
        assert!(text.contains("Jane Doe"));
        assert_eq!(model.image_calls(), 1);
        assert_eq!(model.prompts()[0], IMAGE_TRANSCRIPTION_PROMPT);
    }

    #[tokio::test]
    async fn test_undecodable_image_skips_model() {
        let model = Arc::new(ScriptedModel::new().on_image(Reply::text("unused")));
        let doc = Document::new("photo.jpg", Bytes::from_static(b"\x00\x01garbage"));

        let err = extractor(&model).extract(&doc).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Image(_)));
        assert_eq!(model.image_calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_transcription_is_error() {
        let model = Arc::new(ScriptedModel::new().on_image(Reply::text("   \n")));
        let doc = Document::new("scan.png", tiny_png());

        let err = extractor(&model).extract(&doc).await.unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Transcription(LlmError::EmptyContent)
        ));
    }

    #[tokio::test]
    async fn test_transcription_failure_is_error() {
        let model = Arc::new(ScriptedModel::new().on_image(Reply::Fail(503, "overloaded".into())));
        let doc = Document::new("scan.png", tiny_png());

        let err = extractor(&model).extract(&doc).await.unwrap_err();
        assert!(err.to_string().contains("overloaded"));
    }
}
