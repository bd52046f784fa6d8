use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/llm-smoke", get(llm_smoke))
}

#[derive(Debug, Serialize)]
pub struct SmokeResponse {
    pub model_response: String,
}

/// Fixed arithmetic question; proves the key, model and endpoint all work.
async fn llm_smoke(State(state): State<AppState>) -> Result<Json<SmokeResponse>, ApiError> {
    let model_response = state.summarizer.smoke().await?;
    tracing::info!(reply = %model_response, "Model smoke test answered");

    Ok(Json(SmokeResponse { model_response }))
}
