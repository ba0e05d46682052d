//! OpenAiGateway -- concrete [`CompletionGateway`] implementation for any
//! OpenAI-compatible chat completions endpoint.
//!
//! Sends one non-streaming request per conversational turn. The API key is
//! wrapped in [`secrecy::SecretString`] and is never logged or included in
//! `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use parley_core::gateway::CompletionGateway;
use parley_types::config::GatewayConfig;
use parley_types::error::GatewayError;
use parley_types::gateway::ChatTurn;

use super::types::{ChatCompletionRequest, ChatCompletionResponse, WireMessage};

/// OpenAI-compatible completion gateway client.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing the authorization header. It never appears in Debug
/// output, Display output, or tracing logs.
pub struct OpenAiGateway {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    max_tokens: Option<u32>,
}

impl OpenAiGateway {
    /// Create a new gateway client from configuration plus the API key.
    pub fn new(config: &GatewayConfig, api_key: SecretString) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| GatewayError::Http {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    /// The model this gateway requests completions from.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, turns: &[ChatTurn]) -> ChatCompletionRequest {
        let messages = turns
            .iter()
            .map(|t| WireMessage {
                role: t.role.to_string(),
                content: t.content.clone(),
            })
            .collect();

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
        }
    }
}

// OpenAiGateway intentionally does NOT derive Debug so the API key inside
// can never leak through formatting.

impl CompletionGateway for OpenAiGateway {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, GatewayError> {
        let body = self.build_request(turns);

        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Http {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => GatewayError::AuthenticationFailed,
                429 => GatewayError::RateLimited,
                503 | 529 => GatewayError::Overloaded(error_body),
                code => GatewayError::Api {
                    status: code,
                    message: error_body,
                },
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Deserialization(format!("failed to parse response: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| GatewayError::Deserialization("response contained no reply".to_string()))
    }
}
