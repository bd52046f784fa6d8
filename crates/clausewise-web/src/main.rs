mod api;
mod config;
mod error;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use clausewise_core::{GatewayConfig, HttpGateway, PdfTextExtractor, Storage, Summarizer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "clausewise_web=debug,clausewise_core=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let gateway_config = GatewayConfig::from_env();
    gateway_config.validate()?;

    if gateway_config.api_key.is_none() {
        tracing::warn!("GROQ_API_KEY is not set; summarize and smoke requests will fail");
    }

    let storage = Arc::new(Storage::open(&config.db_path).await?);
    tracing::info!(path = %config.db_path, "Summary store ready");

    let gateway = HttpGateway::new(&gateway_config)?;
    tracing::info!(model = %gateway.model(), endpoint = %gateway.endpoint(), "Model gateway configured");

    let summarizer = Summarizer::new(Box::new(PdfTextExtractor::new()), Arc::new(gateway))
        .with_sink(storage.clone())
        .with_map_concurrency(config.map_concurrency);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = api::app(AppState::new(summarizer, storage, config));

    tracing::info!("Starting clausewise on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
