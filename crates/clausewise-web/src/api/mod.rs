mod health;
mod smoke;
mod summaries;

use axum::{Router, extract::DefaultBodyLimit};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::error::panic_response;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(smoke::router())
        .merge(summaries::router())
}

/// The full service: routes, upload limit and HTTP layers.
pub fn app(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    router()
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
