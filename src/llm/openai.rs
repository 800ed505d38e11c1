//! OpenAI-compatible HTTP client
//!
//! Implements [`TextGenerator`] over the Chat Completions endpoint and
//! [`EmbeddingProvider`] over the Embeddings endpoint. Transient failures
//! are retried with exponential backoff by the `reqwest-retry` middleware;
//! everything else is mapped onto [`ProviderError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::{EmbeddingProvider, Message, ProviderError, SamplingConfig, TextGenerator};
use crate::config::LlmConfig;

/// OpenAI API client
pub struct OpenAiClient {
    http: ClientWithMiddleware,
    api_key: String,
    base_url: String,
    chat_model: String,
    embedding_model: String,
}

impl OpenAiClient {
    /// Create a new client from configuration.
    ///
    /// The API key comes from the config or, failing that, from `OPENAI_API_KEY`.
    pub fn from_config(config: &LlmConfig) -> crate::Result<Self> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            crate::TravelPlannerError::config(
                "Missing API key: set llm.api_key or the OPENAI_API_KEY env var",
            )
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("travelplanner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                crate::TravelPlannerError::config(format!("Failed to create HTTP client: {e}"))
            })?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let http = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
        })
    }

    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ProviderError> {
        let url = format!("{}/{}", self.base_url, path);
        let payload =
            serde_json::to_vec(body).map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %url, "provider returned an error status");

            return Err(match status.as_u16() {
                401 | 403 => ProviderError::Auth(message),
                429 => ProviderError::RateLimited {
                    retry_after: Duration::from_secs(retry_after.unwrap_or(60)),
                },
                code => ProviderError::Api {
                    status: code,
                    message,
                },
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    #[instrument(name = "chat_completion", level = "debug", skip_all, fields(model = %self.chat_model))]
    async fn generate(
        &self,
        messages: &[Message],
        sampling: &SamplingConfig,
    ) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: &self.chat_model,
            messages,
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
            top_p: sampling.top_p,
            frequency_penalty: sampling.frequency_penalty,
            presence_penalty: sampling.presence_penalty,
        };

        let response: ChatResponse = self.post("chat/completions", &body).await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        debug!(chars = content.len(), "chat completion received");
        Ok(content)
    }

    fn model(&self) -> &str {
        &self.chat_model
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    #[instrument(name = "embeddings", level = "debug", skip_all, fields(model = %self.embedding_model, inputs = inputs.len()))]
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let body = EmbeddingRequest {
            model: &self.embedding_model,
            input: inputs,
        };

        let response: EmbeddingResponse = self.post("embeddings", &body).await?;
        order_embeddings(response, inputs.len())
    }
}

/// Put embeddings back in input order and check one came back per input
fn order_embeddings(
    response: EmbeddingResponse,
    expected: usize,
) -> Result<Vec<Vec<f32>>, ProviderError> {
    let mut data = response.data;
    if data.len() != expected {
        return Err(ProviderError::InvalidResponse(format!(
            "expected {expected} embeddings, got {}",
            data.len()
        )));
    }
    data.sort_by_key(|d| d.index);
    if data.iter().enumerate().any(|(i, d)| d.index != i) {
        return Err(ProviderError::InvalidResponse(
            "embedding indices are not a permutation of the inputs".to_string(),
        ));
    }
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

// OpenAI API request and response types

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn test_chat_request_body() {
        let messages = vec![Message::system("You are helpful"), Message::user("Hello")];
        let sampling = SamplingConfig::itinerary();
        let body = ChatRequest {
            model: "gpt-4o",
            messages: &messages,
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
            top_p: sampling.top_p,
            frequency_penalty: sampling.frequency_penalty,
            presence_penalty: sampling.presence_penalty,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["max_tokens"], 3000);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Hello");
        assert_eq!(messages[0].role, Role::System);
    }

    #[test]
    fn test_embeddings_reordered_by_index() {
        let response: EmbeddingResponse = serde_json::from_str(
            r#"{"data": [
                {"index": 1, "embedding": [0.0, 1.0]},
                {"index": 0, "embedding": [1.0, 0.0]}
            ]}"#,
        )
        .unwrap();

        let vectors = order_embeddings(response, 2).unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_embeddings_count_mismatch_is_invalid() {
        let response: EmbeddingResponse =
            serde_json::from_str(r#"{"data": [{"index": 0, "embedding": [1.0]}]}"#).unwrap();
        assert!(matches!(
            order_embeddings(response, 3),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let config = LlmConfig {
            api_key: None,
            ..LlmConfig::default()
        };
        // Only meaningful when the environment does not provide a key
        if std::env::var("OPENAI_API_KEY").is_err() {
            assert!(OpenAiClient::from_config(&config).is_err());
        }
    }
}
