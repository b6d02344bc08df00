//! AI Analyzer: scores one resume against one job description.
//! All model calls go through `GenerativeModel`; nothing here speaks HTTP.

pub mod prompts;
pub mod record;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::llm_client::{strip_json_fences, GenerativeModel, LlmError};
use prompts::PromptTemplate;
pub use record::AnalysisRecord;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("model reply was empty")]
    EmptyReply,

    #[error("model reply is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("model reply is not a JSON object")]
    NotAnObject,

    #[error("model reply contained no analysis fields")]
    EmptyAnalysis,
}

/// Builds the analysis prompt, calls the model once and parses the reply.
/// Never retries: a reply that does not parse fails this resume only.
#[derive(Clone)]
pub struct ResumeAnalyzer {
    model: Arc<dyn GenerativeModel>,
    template: Arc<PromptTemplate>,
}

impl ResumeAnalyzer {
    pub fn new(model: Arc<dyn GenerativeModel>, template: PromptTemplate) -> Self {
        Self {
            model,
            template: Arc::new(template),
        }
    }

    pub async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisRecord, AnalysisError> {
        let prompt = self.template.render(resume_text, job_description);
        debug!(prompt_chars = prompt.len(), "Sending analysis prompt");

        let reply = self.model.generate_text(&prompt).await?;
        debug!(reply_chars = reply.len(), "Analysis reply received");

        parse_reply(&reply)
    }
}

/// Strips code fences and parses the reply as a JSON object.
pub fn parse_reply(reply: &str) -> Result<AnalysisRecord, AnalysisError> {
    let body = strip_json_fences(reply);
    if body.is_empty() {
        return Err(AnalysisError::EmptyReply);
    }

    match serde_json::from_str::<Value>(body)? {
        Value::Object(fields) if fields.is_empty() => Err(AnalysisError::EmptyAnalysis),
        Value::Object(fields) => Ok(AnalysisRecord::new(fields)),
        _ => Err(AnalysisError::NotAnObject),
    }
}
