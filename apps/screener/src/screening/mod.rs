// Batch screening: validation, per-resume pipeline, ranking, HTTP handlers.
// Extraction and model calls are delegated to crate::extraction and crate::analysis.

pub mod handlers;
pub mod orchestrator;
pub mod policy;
pub mod ranking;
pub mod report;
