//! Batch Orchestrator: runs extract → analyze for each resume, one at a time.
//!
//! Per-resume lifecycle:
//! `Pending → Extracting → {ExtractFailed | Extracted} → Analyzing → {AnalyzeFailed | Analyzed} → Recorded`
//!
//! A failure, or a panic, while processing one resume is recorded against that
//! resume and the batch moves on. Between resumes the orchestrator sleeps for a
//! fixed delay (shorter after a failure) to cap the call rate on the model.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use futures::FutureExt;
use thiserror::Error;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::analysis::{AnalysisError, AnalysisRecord, ResumeAnalyzer};
use crate::extraction::{Document, DocumentFormat, ExtractionError, TextExtractor};
use crate::screening::policy::{BatchPolicy, ValidationError};
use crate::screening::report::{BatchReport, FailedResume};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pending,
    Extracting,
    ExtractFailed,
    Extracted,
    Analyzing,
    AnalyzeFailed,
    Analyzed,
    Recorded,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Pending => "pending",
            Stage::Extracting => "extracting",
            Stage::ExtractFailed => "extract_failed",
            Stage::Extracted => "extracted",
            Stage::Analyzing => "analyzing",
            Stage::AnalyzeFailed => "analyze_failed",
            Stage::Analyzed => "analyzed",
            Stage::Recorded => "recorded",
        };
        f.write_str(name)
    }
}

/// Why one resume produced no analysis. `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum DocumentFailure {
    #[error("Unsupported file format")]
    UnsupportedFormat,

    #[error("Could not extract text: {0}")]
    Extraction(ExtractionError),

    #[error("Could not extract text or text too short ({chars} characters, minimum {min})")]
    TextTooShort { chars: usize, min: usize },

    #[error("AI analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("{0}")]
    Unhandled(String),
}

impl From<ExtractionError> for DocumentFailure {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::UnsupportedFormat => DocumentFailure::UnsupportedFormat,
            other => DocumentFailure::Extraction(other),
        }
    }
}

impl DocumentFailure {
    /// The terminal state this failure leaves the resume in.
    pub fn stage(&self) -> Stage {
        match self {
            DocumentFailure::UnsupportedFormat
            | DocumentFailure::Extraction(_)
            | DocumentFailure::TextTooShort { .. } => Stage::ExtractFailed,
            DocumentFailure::Analysis(_) | DocumentFailure::Unhandled(_) => Stage::AnalyzeFailed,
        }
    }

    /// True when the uploaded document itself is the problem.
    pub fn is_document_fault(&self) -> bool {
        self.stage() == Stage::ExtractFailed
    }
}

pub struct BatchOrchestrator {
    extractor: TextExtractor,
    analyzer: ResumeAnalyzer,
    policy: BatchPolicy,
}

impl BatchOrchestrator {
    pub fn new(extractor: TextExtractor, analyzer: ResumeAnalyzer, policy: BatchPolicy) -> Self {
        Self {
            extractor,
            analyzer,
            policy,
        }
    }

    pub fn policy(&self) -> &BatchPolicy {
        &self.policy
    }

    /// Validates the whole batch, then processes every resume in submission order.
    /// Only validation can fail the call; per-resume failures land in the report.
    pub async fn run_batch(
        &self,
        job_description: &str,
        documents: Vec<Document>,
    ) -> Result<BatchReport, ValidationError> {
        self.policy.validate_batch(job_description, &documents)?;

        let batch_id = Uuid::new_v4();
        let span = info_span!("batch", %batch_id, total = documents.len());
        Ok(self
            .process_all(job_description, documents)
            .instrument(span)
            .await)
    }

    async fn process_all(&self, job_description: &str, documents: Vec<Document>) -> BatchReport {
        let total = documents.len();
        let started = Instant::now();
        info!(
            jd_chars = job_description.len(),
            "Processing {total} resumes"
        );

        let mut successes = Vec::new();
        let mut failures = Vec::new();

        for (index, document) in documents.into_iter().enumerate() {
            let resume_id = index + 1;
            debug!(resume_id, filename = %document.filename, stage = %Stage::Pending);
            let doc_started = Instant::now();

            let outcome = self.process_isolated(&document, job_description).await;
            let elapsed_ms = doc_started.elapsed().as_millis() as u64;
            let succeeded = outcome.is_ok();

            match outcome {
                Ok(mut record) => {
                    record.stamp_success(&document.filename, resume_id);
                    info!(
                        resume_id,
                        filename = %document.filename,
                        stage = %Stage::Recorded,
                        fit = record.fit_percentage(),
                        elapsed_ms,
                        "Resume {resume_id}/{total} analyzed"
                    );
                    successes.push(record);
                }
                Err(failure) => {
                    warn!(
                        resume_id,
                        filename = %document.filename,
                        stage = %failure.stage(),
                        elapsed_ms,
                        "Resume {resume_id}/{total} failed: {failure}"
                    );
                    failures.push(FailedResume::new(document.filename, failure.to_string()));
                }
            }

            if resume_id < total {
                tokio::time::sleep(self.policy.pause_after(succeeded)).await;
            }
        }

        let report = BatchReport::assemble(successes, failures);
        info!(
            successful = report.successful,
            failed = report.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch complete"
        );
        report
    }

    /// Runs one resume without stamping batch metadata. Used by the single-resume endpoint.
    pub async fn analyze_single(
        &self,
        job_description: &str,
        document: &Document,
    ) -> Result<AnalysisRecord, DocumentFailure> {
        let span = info_span!("single", filename = %document.filename);
        self.process_isolated(document, job_description)
            .instrument(span)
            .await
    }

    /// Per-resume isolation boundary: panics become `DocumentFailure::Unhandled`.
    async fn process_isolated(
        &self,
        document: &Document,
        job_description: &str,
    ) -> Result<AnalysisRecord, DocumentFailure> {
        AssertUnwindSafe(self.process(document, job_description))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(DocumentFailure::Unhandled(panic_message(payload))))
    }

    async fn process(
        &self,
        document: &Document,
        job_description: &str,
    ) -> Result<AnalysisRecord, DocumentFailure> {
        if document.format == DocumentFormat::Unsupported {
            return Err(DocumentFailure::UnsupportedFormat);
        }

        debug!(stage = %Stage::Extracting, bytes = document.size);
        let text = self.extractor.extract(document).await?;

        let chars = text.chars().count();
        if chars < self.policy.min_text_chars {
            return Err(DocumentFailure::TextTooShort {
                chars,
                min: self.policy.min_text_chars,
            });
        }
        debug!(stage = %Stage::Extracted, chars);

        debug!(stage = %Stage::Analyzing);
        let record = self.analyzer.analyze(&text, job_description).await?;
        debug!(stage = %Stage::Analyzed);
        Ok(record)
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected failure while processing resume".to_string()
    }
}
