//! Groq Provider - Implementation of AIProvider for Groq's OpenAI-compatible API.
//!
//! Sends the transcript as-is to `{base_url}/chat/completions`, persona in a
//! leading `system` message.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GroqConfig::new(Some(api_key))
//!     .with_model("llama-3.3-70b-versatile")
//!     .with_timeout(Duration::from_secs(60));
//!
//! let provider = GroqProvider::new(config);
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ProviderInfo, SystemRoleSupport, TokenUsage,
};

use super::upstream;

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Name reported when the key is missing.
const CREDENTIAL: &str = "ai.groq_api_key";

/// Configuration for the Groq provider.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key for authentication. `None` leaves the provider unconfigured.
    api_key: Option<Secret<String>>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl GroqConfig {
    /// Creates a configuration. Blank keys count as missing.
    pub fn new(api_key: Option<Secret<String>>) -> Self {
        let api_key = api_key.filter(|key| !key.expose_secret().trim().is_empty());
        Self {
            api_key,
            model: GROQ_DEFAULT_MODEL.to_string(),
            base_url: GROQ_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Groq API provider implementation.
pub struct GroqProvider {
    config: GroqConfig,
    client: Result<Client, String>,
}

impl GroqProvider {
    /// Creates a new Groq provider with the given configuration.
    pub fn new(config: GroqConfig) -> Self {
        let client = upstream::build_client(config.timeout);
        Self { config, client }
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Converts our request to the chat-completions format.
    fn to_groq_request(&self, request: &CompletionRequest) -> GroqRequest {
        let messages = request
            .messages
            .iter()
            .map(|msg| GroqMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: Some(msg.content.clone()),
            })
            .collect();

        GroqRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    /// Sends one request. No retry.
    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| AIError::not_configured(CREDENTIAL))?;
        let client = self.client.as_ref().map_err(|e| AIError::network(e.clone()))?;

        client
            .post(self.completions_url())
            .bearer_auth(api_key.expose_secret())
            .json(&self.to_groq_request(request))
            .send()
            .await
            .map_err(|e| upstream::transport_error(e, self.config.timeout))
    }

    /// Parses a response, mapping non-2xx statuses to errors.
    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AIError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(upstream::error_from_status(status, &body));
        }

        let groq_response: GroqResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        let model = groq_response
            .model
            .unwrap_or_else(|| self.config.model.clone());

        let usage = groq_response
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        // No choices reads as an empty completion; the flow applies its fallback.
        let Some(choice) = groq_response.choices.into_iter().next() else {
            return Ok(CompletionResponse::new("", model)
                .with_usage(usage)
                .with_finish_reason(FinishReason::Other));
        };

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("stop") | None => FinishReason::Stop,
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            Some(_) => FinishReason::Other,
        };

        Ok(
            CompletionResponse::new(choice.message.content.unwrap_or_default(), model)
                .with_usage(usage)
                .with_finish_reason(finish_reason),
        )
    }
}

#[async_trait]
impl AIProvider for GroqProvider {
    fn ensure_configured(&self) -> Result<(), AIError> {
        if self.config.has_api_key() {
            Ok(())
        } else {
            Err(AIError::not_configured(CREDENTIAL))
        }
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self.send_request(&request).await?;
        self.parse_response(response).await
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("groq", &self.config.model).with_system_role(SystemRoleSupport::Native)
    }
}

// ----- Groq API Types -----

#[derive(Debug, Serialize)]
struct GroqRequest {
    model: String,
    messages: Vec<GroqMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GroqMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    model: Option<String>,
    #[serde(default)]
    choices: Vec<GroqChoice>,
    usage: Option<GroqUsage>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroqUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
