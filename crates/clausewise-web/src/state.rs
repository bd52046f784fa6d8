use std::sync::Arc;

use clausewise_core::{Storage, Summarizer};

use crate::config::ServerConfig;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    pub summarizer: Arc<Summarizer>,
    pub storage: Arc<Storage>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(summarizer: Summarizer, storage: Arc<Storage>, config: ServerConfig) -> Self {
        Self {
            summarizer: Arc::new(summarizer),
            storage,
            config,
        }
    }
}
