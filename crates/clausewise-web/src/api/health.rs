use axum::{Json, Router, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        service: "summarizer",
        version: env!("CARGO_PKG_VERSION"),
    })
}
