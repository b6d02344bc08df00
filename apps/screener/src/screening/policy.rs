//! Batch limits and pacing. One pipeline, parameterised per deployment profile.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::extraction::{Document, SUPPORTED_EXTENSIONS};

/// Extracted text shorter than this (in characters) is not worth analysing.
pub const MIN_TEXT_CHARS: usize = 50;

const MB: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchProfile {
    /// Small interactive batches; unsupported files are reported per resume.
    Standard,
    /// Large uploads; size and extension are checked up front and fail the request.
    Bulk,
}

impl FromStr for BatchProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(BatchProfile::Standard),
            "bulk" => Ok(BatchProfile::Bulk),
            other => Err(format!("unknown batch profile '{other}' (expected standard or bulk)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPolicy {
    pub max_files: usize,
    pub max_file_bytes: Option<usize>,
    /// When set, any other extension rejects the whole request before processing.
    pub allowed_extensions: Option<Vec<String>>,
    pub pause_after_success: Duration,
    pub pause_after_failure: Duration,
    pub min_text_chars: usize,
}

impl BatchPolicy {
    pub fn standard() -> Self {
        Self {
            max_files: 10,
            max_file_bytes: None,
            allowed_extensions: None,
            pause_after_success: Duration::from_millis(1000),
            pause_after_failure: Duration::from_millis(500),
            min_text_chars: MIN_TEXT_CHARS,
        }
    }

    pub fn bulk() -> Self {
        Self {
            max_files: 500,
            max_file_bytes: Some(5 * MB),
            allowed_extensions: Some(SUPPORTED_EXTENSIONS.iter().map(|e| e.to_string()).collect()),
            pause_after_success: Duration::from_millis(4000),
            pause_after_failure: Duration::from_millis(2000),
            min_text_chars: MIN_TEXT_CHARS,
        }
    }

    pub fn for_profile(profile: BatchProfile) -> Self {
        match profile {
            BatchProfile::Standard => Self::standard(),
            BatchProfile::Bulk => Self::bulk(),
        }
    }

    pub fn pause_after(&self, succeeded: bool) -> Duration {
        if succeeded {
            self.pause_after_success
        } else {
            self.pause_after_failure
        }
    }

    /// Whole-request checks, run before any document is touched.
    pub fn validate_batch(
        &self,
        job_description: &str,
        documents: &[Document],
    ) -> Result<(), ValidationError> {
        if job_description.trim().is_empty() {
            return Err(ValidationError::JobDescriptionMissing);
        }
        if documents.is_empty() {
            return Err(ValidationError::NoResumes);
        }
        if documents.len() > self.max_files {
            return Err(ValidationError::TooManyResumes {
                max: self.max_files,
            });
        }
        documents.iter().try_for_each(|d| self.validate_document(d))
    }

    /// Checks for the single-resume endpoint; hands the document back on success.
    pub fn validate_single(
        &self,
        job_description: &str,
        document: Option<Document>,
    ) -> Result<Document, ValidationError> {
        if job_description.trim().is_empty() {
            return Err(ValidationError::JobDescriptionMissing);
        }
        let document = document.ok_or(ValidationError::ResumeMissing)?;
        self.validate_document(&document)?;
        Ok(document)
    }

    fn validate_document(&self, document: &Document) -> Result<(), ValidationError> {
        if let Some(limit) = self.max_file_bytes {
            if document.size > limit {
                return Err(ValidationError::FileTooLarge {
                    filename: document.filename.clone(),
                    limit_bytes: limit,
                });
            }
        }
        if let Some(allowed) = &self.allowed_extensions {
            let ok = document
                .extension()
                .is_some_and(|ext| allowed.iter().any(|a| *a == ext));
            if !ok {
                return Err(ValidationError::DisallowedExtension {
                    filename: document.filename.clone(),
                    allowed: allowed.join(", "),
                });
            }
        }
        Ok(())
    }
}

/// Request-level rejections. Always a 400 and nothing is processed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Job description is required")]
    JobDescriptionMissing,

    #[error("At least one resume file is required")]
    NoResumes,

    #[error("Resume file is required")]
    ResumeMissing,

    #[error("Maximum {max} resumes allowed")]
    TooManyResumes { max: usize },

    #[error("File '{filename}' exceeds the {} size limit", human_size(.limit_bytes))]
    FileTooLarge { filename: String, limit_bytes: usize },

    #[error("File '{filename}' has an unsupported format. Allowed formats: {allowed}")]
    DisallowedExtension { filename: String, allowed: String },
}

fn human_size(bytes: &usize) -> String {
    if bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else {
        format!("{:.1}MB", *bytes as f64 / MB as f64)
    }
}
