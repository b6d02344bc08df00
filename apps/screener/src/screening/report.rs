use serde::{Deserialize, Serialize};

use crate::analysis::record::ResumeStatus;
use crate::analysis::AnalysisRecord;
use crate::screening::ranking::{rank_results, top_n, TOP_N};

/// A resume that did not produce an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedResume {
    pub filename: String,
    pub error: String,
    pub status: ResumeStatus,
}

impl FailedResume {
    pub fn new(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            error: error.into(),
            status: ResumeStatus::Failed,
        }
    }
}

/// Aggregate response for one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub total_resumes: usize,
    pub successful: usize,
    pub failed: usize,
    /// Rank order.
    pub results: Vec<AnalysisRecord>,
    /// Submission order.
    pub failed_resumes: Vec<FailedResume>,
    pub top_5: Vec<AnalysisRecord>,
}

impl BatchReport {
    /// `successes` must be in submission order; ranking relies on it for ties.
    pub fn assemble(successes: Vec<AnalysisRecord>, failures: Vec<FailedResume>) -> Self {
        let results = rank_results(successes);
        let top_5 = top_n(&results, TOP_N);
        Self {
            total_resumes: results.len() + failures.len(),
            successful: results.len(),
            failed: failures.len(),
            results,
            failed_resumes: failures,
            top_5,
        }
    }
}
