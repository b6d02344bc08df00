//! Axum route handlers for the screening API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::debug;

use crate::analysis::AnalysisRecord;
use crate::errors::AppError;
use crate::extraction::Document;
use crate::screening::report::BatchReport;
use crate::state::AppState;

const JOB_DESCRIPTION_FIELD: &str = "job_description";
const BATCH_FILE_FIELD: &str = "resumes";
const SINGLE_FILE_FIELD: &str = "resume";

/// Decoded multipart form. Unknown fields are ignored.
struct UploadForm {
    job_description: String,
    documents: Vec<Document>,
}

async fn read_upload(mut multipart: Multipart, file_field: &str) -> Result<UploadForm, AppError> {
    let mut job_description = String::new();
    let mut documents = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == JOB_DESCRIPTION_FIELD {
            job_description = field.text().await?;
        } else if name == file_field {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content = field.bytes().await?;
            // Browsers send an empty, nameless part when no file was picked.
            if filename.is_empty() && content.is_empty() {
                continue;
            }
            documents.push(Document::new(filename, content));
        } else {
            debug!("Ignoring multipart field '{name}'");
        }
    }

    Ok(UploadForm {
        job_description,
        documents,
    })
}

/// POST /api/v1/analyze
///
/// Analyzes every `resumes` part against `job_description` and returns the ranked report.
pub async fn handle_analyze_batch(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchReport>, AppError> {
    let form = read_upload(multipart, BATCH_FILE_FIELD).await?;

    let report = state
        .orchestrator
        .run_batch(&form.job_description, form.documents)
        .await?;

    Ok(Json(report))
}

/// POST /api/v1/analyze/single
///
/// Analyzes the single `resume` part and returns the bare analysis.
pub async fn handle_analyze_single(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisRecord>, AppError> {
    let form = read_upload(multipart, SINGLE_FILE_FIELD).await?;

    let document = state
        .orchestrator
        .policy()
        .validate_single(&form.job_description, form.documents.into_iter().next())?;

    let record = state
        .orchestrator
        .analyze_single(&form.job_description, &document)
        .await?;

    Ok(Json(record))
}

/// Any non-POST method on the analysis routes.
pub async fn handle_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
