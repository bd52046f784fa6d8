use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    routing::{get, post},
};
use clausewise_core::{Document, StoredSummary};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const FALLBACK_FILENAME: &str = "upload.pdf";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summarize-pdf", post(summarize_pdf))
        .route("/summaries/{id}", get(get_summary))
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub filename: String,
    pub summary: String,
    pub section_count: usize,
}

#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
async fn summarize_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let document = read_upload(multipart).await?;
    tracing::debug!(filename = %document.filename, bytes = document.data.len(), "Upload received");

    let summary = state.summarizer.summarize(document).await?;

    Ok(Json(SummarizeResponse {
        summary: summary.render().to_string(),
        section_count: summary.section_count,
        filename: summary.filename,
    }))
}

/// Pull the `file` field out of the form; other fields are skipped.
async fn read_upload(mut multipart: Multipart) -> Result<Document, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_FILENAME)
            .to_string();
        let data = field.bytes().await?;

        return Ok(Document::new(filename, data.to_vec()));
    }

    Err(ApiError::BadRequest(format!(
        "Missing multipart field '{FILE_FIELD}'."
    )))
}

async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StoredSummary>, ApiError> {
    let summary = state.storage.get_summary(id).await?;
    Ok(Json(summary))
}
