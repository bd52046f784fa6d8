use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use url::Url;

use super::config::GatewayConfig;
use super::{ChatMessage, CompletionOptions, GatewayError, GatewayResult, ModelGateway};

/// Longest slice of an error body kept in `GatewayError::Status`.
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_completion_tokens: u32,
    stream: bool,
}

/// Chat completions over HTTP against an OpenAI-compatible endpoint.
pub struct HttpGateway {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    model: String,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.completions_url()?,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ModelGateway for HttpGateway {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> GatewayResult<serde_json::Value> {
        let api_key = self.api_key.as_deref().ok_or(GatewayError::MissingApiKey)?;

        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature: options.temperature,
            max_completion_tokens: options.max_tokens,
            stream: false,
        };

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            max_tokens = options.max_tokens,
            "Sending chat completion"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > ERROR_BODY_LIMIT {
                let mut cut = ERROR_BODY_LIMIT;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            tracing::warn!(status = status.as_u16(), "Chat completion rejected");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
