use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1/";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Model gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of an OpenAI-compatible API; `chat/completions` is appended
    pub base_url: String,
    /// Bearer token (read from `GROQ_API_KEY`)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model identifier sent with every request
    pub model: String,
    /// Request timeout in seconds
    pub request_timeout_seconds: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            request_timeout_seconds: 60,
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            base_url: var("CLAUSEWISE_GATEWAY_URL").unwrap_or(defaults.base_url),
            api_key: var("GROQ_API_KEY"),
            model: var("GROQ_MODEL").unwrap_or(defaults.model),
            request_timeout_seconds: var("CLAUSEWISE_GATEWAY_TIMEOUT_SECS").map_or(
                defaults.request_timeout_seconds,
                |raw| {
                    raw.parse().unwrap_or_else(|_| {
                        tracing::warn!(
                            var = "CLAUSEWISE_GATEWAY_TIMEOUT_SECS",
                            value = %raw,
                            "Ignoring unparseable setting"
                        );
                        defaults.request_timeout_seconds
                    })
                },
            ),
        }
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> Result<url::Url, url::ParseError> {
        let mut base = self.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        url::Url::parse(&base)?.join("chat/completions")
    }

    pub fn validate(&self) -> Result<(), GatewayConfigError> {
        if self.model.trim().is_empty() {
            return Err(GatewayConfigError::EmptyModel);
        }
        if self.request_timeout_seconds == 0 {
            return Err(GatewayConfigError::ZeroTimeout);
        }
        self.completions_url()
            .map_err(|e| GatewayConfigError::InvalidUrl(e.to_string()))?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayConfigError {
    #[error("Model name must not be empty")]
    EmptyModel,
    #[error("Request timeout must be at least one second")]
    ZeroTimeout,
    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(String),
}
