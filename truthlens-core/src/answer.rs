//! Answer generation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::llm::{ChatMessage, CompletionRequest, LLMClient};

const ANSWER_SYSTEM_PROMPT: &str = "You are a knowledgeable assistant focused on accuracy and transparency.

Guidelines:
- Give clear, concise and accurate answers
- State assumptions and uncertainty explicitly
- Avoid speculation when information may be out of date
- Use structure when it helps
- Give approximate dates for time-sensitive information
- Say so plainly when you are unsure

Your answer will be fact-checked against web sources. Prefer accuracy over completeness.";

/// An answer plus any citation URLs the provider attached to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedAnswer {
    pub text: String,
    #[serde(default)]
    pub citations: Vec<String>,
}

impl GeneratedAnswer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            citations: Vec::new(),
        }
    }

    pub fn with_citations(mut self, citations: Vec<String>) -> Self {
        self.citations = citations;
        self
    }
}

/// Produces a candidate answer for a question.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, question: &str) -> Result<GeneratedAnswer>;
}

/// Answer generator backed by an LLM.
pub struct LlmAnswerGenerator {
    client: Arc<dyn LLMClient>,
    model: Option<String>,
    system_prompt: String,
}

impl LlmAnswerGenerator {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            client,
            model: None,
            system_prompt: ANSWER_SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}

#[async_trait]
impl AnswerGenerator for LlmAnswerGenerator {
    #[instrument(skip(self, question))]
    async fn generate(&self, question: &str) -> Result<GeneratedAnswer> {
        let mut request = CompletionRequest::new()
            .with_system(self.system_prompt.clone())
            .with_message(ChatMessage::user(question))
            .with_temperature(0.7)
            .with_max_tokens(1000);

        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }

        let response = self.client.complete(request).await?;
        let text = response.content.trim();
        if text.is_empty() {
            return Err(Error::LLM(format!(
                "{} returned an empty answer",
                self.client.provider()
            )));
        }

        debug!(
            chars = text.len(),
            citations = response.citations.len(),
            "Answer generated"
        );

        Ok(GeneratedAnswer::new(text).with_citations(response.citations))
    }
}
