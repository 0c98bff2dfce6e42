//! LLM client abstraction.
//!
//! This module provides a unified interface over the providers used for
//! answer generation and claim judging. OpenAI, Grok and Perplexity share the
//! chat-completions wire format and are served by [`OpenAIClient`]; Anthropic
//! has its own client.
//!
//! ## Example
//!
//! ```rust,ignore
//! use truthlens_core::llm::{client_for, ChatMessage, ClientConfig, CompletionRequest, Provider};
//!
//! let client = client_for(
//!     Provider::OpenAI,
//!     ClientConfig::new("your-api-key").with_default_model("gpt-4o"),
//! )?;
//!
//! let request = CompletionRequest::new()
//!     .with_system("You are a fact checker.")
//!     .with_message(ChatMessage::user("Hello"));
//!
//! let response = client.complete(request).await?;
//! ```

mod client;
mod types;

pub use client::{client_for, AnthropicClient, ClientConfig, LLMClient, OpenAIClient};
pub(crate) use client::build_http_client;
pub use types::{
    ChatMessage, ChatRole, CompletionRequest, CompletionResponse, Provider, StopReason, TokenUsage,
};
