//! LLM client trait and provider implementations.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};

use super::types::{ChatRole, CompletionRequest, CompletionResponse, Provider, StopReason, TokenUsage};

/// LLM client trait for making completions.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Complete a prompt.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider for this client.
    fn provider(&self) -> Provider;
}

/// Configuration for LLM clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key
    pub api_key: String,
    /// Base URL override
    pub base_url: Option<String>,
    /// Default model
    pub default_model: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            default_model: None,
            timeout_secs: 60,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Build the client for a provider.
pub fn client_for(provider: Provider, config: ClientConfig) -> Result<Arc<dyn LLMClient>> {
    let client: Arc<dyn LLMClient> = match provider {
        Provider::Anthropic => Arc::new(AnthropicClient::new(config)?),
        _ => Arc::new(OpenAIClient::new(provider, config)?),
    };
    Ok(client)
}

/// Client for OpenAI-compatible chat-completions APIs.
///
/// Serves OpenAI itself plus Grok and Perplexity, which expose the same wire
/// format under a different base URL.
pub struct OpenAIClient {
    provider: Provider,
    config: ClientConfig,
    http: Client,
}

impl OpenAIClient {
    pub fn new(provider: Provider, config: ClientConfig) -> Result<Self> {
        if !provider.is_openai_compatible() {
            return Err(Error::Config(format!(
                "{} does not speak the chat-completions format",
                provider
            )));
        }
        let http = build_http_client(config.timeout_secs)?;

        Ok(Self {
            provider,
            config,
            http,
        })
    }

    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(self.provider.default_base_url())
    }

    fn endpoint(&self) -> String {
        // Perplexity serves chat completions without the /v1 prefix
        match self.provider {
            Provider::Perplexity if self.config.base_url.is_none() => {
                format!("{}/chat/completions", self.base_url())
            }
            _ => format!("{}/v1/chat/completions", self.base_url()),
        }
    }
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<OpenAIResponseFormat>,
}

#[derive(Debug, Serialize)]
struct OpenAIResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    model: String,
    choices: Vec<OpenAIChoice>,
    #[serde(default)]
    usage: Option<OpenAIUsage>,
    #[serde(default)]
    citations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    error: OpenAIErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorDetail {
    message: String,
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let model = request
            .model
            .or(self.config.default_model.clone())
            .unwrap_or_else(|| self.provider.default_main_model().to_string());

        let mut messages: Vec<OpenAIMessage> = Vec::new();

        if let Some(system) = &request.system {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: Some(system.clone()),
            });
        }

        for m in &request.messages {
            messages.push(OpenAIMessage {
                role: match m.role {
                    ChatRole::User => "user".to_string(),
                    ChatRole::Assistant => "assistant".to_string(),
                    ChatRole::System => "system".to_string(),
                },
                content: Some(m.content.clone()),
            });
        }

        let response_format = (request.json_response && self.provider.supports_json_mode())
            .then_some(OpenAIResponseFormat {
                format_type: "json_object",
            });

        let api_request = OpenAIRequest {
            model: model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format,
        };

        let url = self.endpoint();
        debug!(provider = %self.provider, model = %model, "Sending chat completion");

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("content-type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| Error::LLM(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::LLM(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<OpenAIError>(&body) {
                return Err(Error::llm_api(self.provider.to_string(), error.error.message));
            }
            return Err(Error::llm_api(
                self.provider.to_string(),
                format!("({}): {}", status, body),
            ));
        }

        let api_response: OpenAIResponse = serde_json::from_str(&body)
            .map_err(|e| Error::LLM(format!("Failed to parse response: {}", e)))?;

        let choice = api_response
            .choices
            .first()
            .ok_or_else(|| Error::LLM("No choices in response".to_string()))?;

        let stop_reason = choice.finish_reason.as_deref().map(|r| match r {
            "stop" => StopReason::EndTurn,
            "length" => StopReason::MaxTokens,
            "tool_calls" => StopReason::ToolUse,
            _ => StopReason::EndTurn,
        });

        let usage = api_response
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: api_response.id,
            model: if api_response.model.is_empty() {
                model
            } else {
                api_response.model
            },
            content: choice.message.content.clone().unwrap_or_default(),
            stop_reason,
            usage,
            citations: api_response.citations,
            timestamp: Utc::now(),
        })
    }

    fn provider(&self) -> Provider {
        self.provider
    }
}

/// Anthropic Claude client.
pub struct AnthropicClient {
    config: ClientConfig,
    http: Client,
}

impl AnthropicClient {
    const API_VERSION: &'static str = "2023-06-01";

    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = build_http_client(config.timeout_secs)?;

        Ok(Self { config, http })
    }

    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(Provider::Anthropic.default_base_url())
    }
}

// Anthropic API types
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    id: String,
    model: String,
    content: Vec<AnthropicContent>,
    stop_reason: Option<String>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u64,
    output_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: String,
}

#[async_trait]
impl LLMClient for AnthropicClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let model = request
            .model
            .or(self.config.default_model.clone())
            .unwrap_or_else(|| Provider::Anthropic.default_main_model().to_string());

        // System messages are sent through the top-level `system` field
        let mut system = request.system;
        let mut messages = Vec::with_capacity(request.messages.len());
        for m in request.messages {
            match m.role {
                ChatRole::System => {
                    system = Some(match system {
                        Some(existing) => format!("{}\n\n{}", existing, m.content),
                        None => m.content,
                    });
                }
                ChatRole::User => messages.push(AnthropicMessage {
                    role: "user".to_string(),
                    content: m.content,
                }),
                ChatRole::Assistant => messages.push(AnthropicMessage {
                    role: "assistant".to_string(),
                    content: m.content,
                }),
            }
        }

        let api_request = AnthropicRequest {
            model: model.clone(),
            messages,
            max_tokens: request.max_tokens.unwrap_or(4096),
            system,
            temperature: request.temperature,
        };

        let url = format!("{}/v1/messages", self.base_url());
        debug!(provider = "anthropic", model = %model, "Sending messages request");

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| Error::LLM(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::LLM(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<AnthropicError>(&body) {
                return Err(Error::llm_api(
                    "anthropic",
                    format!("({}) {}", error.error.error_type, error.error.message),
                ));
            }
            return Err(Error::llm_api("anthropic", format!("({}): {}", status, body)));
        }

        let api_response: AnthropicResponse = serde_json::from_str(&body)
            .map_err(|e| Error::LLM(format!("Failed to parse response: {}", e)))?;

        let content = api_response
            .content
            .iter()
            .filter_map(|c| c.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        let stop_reason = api_response.stop_reason.as_deref().map(|r| match r {
            "end_turn" => StopReason::EndTurn,
            "max_tokens" => StopReason::MaxTokens,
            "stop_sequence" => StopReason::StopSequence,
            "tool_use" => StopReason::ToolUse,
            _ => StopReason::EndTurn,
        });

        Ok(CompletionResponse {
            id: api_response.id,
            model: api_response.model,
            content,
            stop_reason,
            usage: TokenUsage {
                input_tokens: api_response.usage.input_tokens,
                output_tokens: api_response.usage.output_tokens,
            },
            citations: Vec::new(),
            timestamp: Utc::now(),
        })
    }

    fn provider(&self) -> Provider {
        Provider::Anthropic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new("test-key")
            .with_base_url("https://custom.api.com")
            .with_default_model("gpt-4o-mini")
            .with_timeout(15);

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, Some("https://custom.api.com".to_string()));
        assert_eq!(config.default_model, Some("gpt-4o-mini".to_string()));
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn test_openai_compatible_endpoints() {
        let openai = OpenAIClient::new(Provider::OpenAI, ClientConfig::new("k")).unwrap();
        assert_eq!(openai.endpoint(), "https://api.openai.com/v1/chat/completions");

        let grok = OpenAIClient::new(Provider::Grok, ClientConfig::new("k")).unwrap();
        assert_eq!(grok.endpoint(), "https://api.x.ai/v1/chat/completions");

        let pplx = OpenAIClient::new(Provider::Perplexity, ClientConfig::new("k")).unwrap();
        assert_eq!(pplx.endpoint(), "https://api.perplexity.ai/chat/completions");
    }

    #[test]
    fn test_openai_client_rejects_anthropic() {
        assert!(OpenAIClient::new(Provider::Anthropic, ClientConfig::new("k")).is_err());
    }

    #[test]
    fn test_client_for_provider() {
        let client = client_for(Provider::Perplexity, ClientConfig::new("k")).unwrap();
        assert_eq!(client.provider(), Provider::Perplexity);

        let client = client_for(Provider::Anthropic, ClientConfig::new("k")).unwrap();
        assert_eq!(client.provider(), Provider::Anthropic);
    }

    #[test]
    fn test_parse_perplexity_citations() {
        let body = r#"{
            "id": "abc",
            "model": "sonar-pro",
            "choices": [{"message": {"role": "assistant", "content": "Paris."}, "finish_reason": "stop"}],
            "citations": ["https://en.wikipedia.org/wiki/Paris"]
        }"#;
        let parsed: OpenAIResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.citations.len(), 1);
        assert!(parsed.usage.is_none());
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("Paris."));
    }
}
