//! Claim judging.
//!
//! A [`ClaimJudge`] reads an answer and the retrieved sources and returns its
//! verdict as raw text. [`ClaimVerifier`] makes exactly one judge call and
//! normalizes whatever comes back.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::normalize::normalize_verification;
use super::types::Verification;
use crate::error::{Error, Result};
use crate::llm::{ChatMessage, CompletionRequest, LLMClient};
use crate::search::Source;

const VERIFIER_SYSTEM_PROMPT: &str = r#"You are a strict fact-checking assistant. You verify the claims in an answer against the sources you are given.

Rules:
- Do not add new information.
- Judge each claim only against the provided sources.
- Never invent or assume sources.
- When evidence is weak or missing, use "uncertain" or "unsupported".

Split the answer into atomic factual claims. For each claim choose one status:
- verified: a source directly supports it
- uncertain: evidence is partial, weak or ambiguous
- outdated: the information predates current sources or is marked as old
- unsupported: no source addresses it
- contradicted: a source states something incompatible with it

Respond with JSON only, in exactly this format:
{
  "overall_confidence": 0-100,
  "claims": [
    {
      "text": "the claim as stated in the answer",
      "status": "verified|uncertain|outdated|unsupported|contradicted",
      "reason": "short explanation",
      "sources": [1]
    }
  ]
}

"sources" lists the numbers of the [Source N] blocks that support or contradict the claim. Use an empty list when none apply.

Estimate overall_confidence by starting at 100 and subtracting 5 per uncertain claim, 15 per outdated claim, 20 per unsupported claim and 30 per contradicted claim, with a minimum of 0."#;

/// Everything the judge sees for one answer.
#[derive(Debug, Clone)]
pub struct JudgeRequest {
    pub question: String,
    pub answer: String,
    pub sources: Vec<Source>,
}

impl JudgeRequest {
    pub fn new(question: impl Into<String>, answer: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            sources,
        }
    }
}

/// A language-understanding capability that labels claims.
#[async_trait]
pub trait ClaimJudge: Send + Sync {
    /// Return the judge's raw verdict text.
    async fn judge(&self, request: &JudgeRequest) -> Result<String>;
}

/// Format sources as numbered blocks for the judge prompt.
pub fn format_sources(sources: &[Source]) -> String {
    if sources.is_empty() {
        return "No sources available.".to_string();
    }

    sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            format!(
                "[Source {}]\nTitle: {}\nURL: {}\nContent: {}\n",
                i + 1,
                source.title,
                source.url,
                source.snippet
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn user_prompt(request: &JudgeRequest) -> String {
    format!(
        "Original Question: {}\n\nAnswer to Verify:\n{}\n\nAvailable Sources:\n{}\n\nAnalyze the answer and return your verification results as valid JSON.",
        request.question,
        request.answer,
        format_sources(&request.sources)
    )
}

/// Judge backed by an LLM.
pub struct LlmJudge {
    client: Arc<dyn LLMClient>,
    model: Option<String>,
}

impl LlmJudge {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            client,
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

#[async_trait]
impl ClaimJudge for LlmJudge {
    #[instrument(skip(self, request), fields(sources = request.sources.len()))]
    async fn judge(&self, request: &JudgeRequest) -> Result<String> {
        let mut completion = CompletionRequest::new()
            .with_system(VERIFIER_SYSTEM_PROMPT)
            .with_message(ChatMessage::user(user_prompt(request)))
            .with_temperature(0.2)
            .with_max_tokens(2000)
            .with_json_response(self.client.provider().supports_json_mode());

        if let Some(model) = &self.model {
            completion = completion.with_model(model.clone());
        }

        let response = self.client.complete(completion).await?;
        debug!(
            model = %response.model,
            tokens = response.usage.total(),
            "Judge responded"
        );

        Ok(response.content.trim().to_string())
    }
}

/// Runs one judge call and normalizes the result.
#[derive(Clone)]
pub struct ClaimVerifier {
    judge: Arc<dyn ClaimJudge>,
}

impl ClaimVerifier {
    pub fn new(judge: Arc<dyn ClaimJudge>) -> Self {
        Self { judge }
    }

    /// Verify the claims in an answer.
    ///
    /// A failing judge call is an error. Unusable judge output is not: it
    /// becomes the sentinel verification.
    pub async fn verify(&self, request: &JudgeRequest) -> Result<Verification> {
        let raw = self
            .judge
            .judge(request)
            .await
            .map_err(|e| Error::Judge(e.to_string()))?;

        Ok(normalize_verification(&raw, &request.sources))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionResponse, Provider, StopReason, TokenUsage};
    use crate::verification::types::ClaimStatus;
    use chrono::Utc;
    use std::sync::Mutex;

    struct MockLLMClient {
        provider: Provider,
        response: String,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl MockLLMClient {
        fn new(provider: Provider, response: impl Into<String>) -> Self {
            Self {
                provider,
                response: response.into(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LLMClient for MockLLMClient {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
            self.requests.lock().unwrap().push(request);
            Ok(CompletionResponse {
                id: "test".to_string(),
                model: "test-model".to_string(),
                content: self.response.clone(),
                stop_reason: Some(StopReason::EndTurn),
                usage: TokenUsage::default(),
                citations: Vec::new(),
                timestamp: Utc::now(),
            })
        }

        fn provider(&self) -> Provider {
            self.provider
        }
    }

    struct FailingJudge;

    #[async_trait]
    impl ClaimJudge for FailingJudge {
        async fn judge(&self, _request: &JudgeRequest) -> Result<String> {
            Err(Error::llm_api("openai", "503 Service Unavailable"))
        }
    }

    fn request() -> JudgeRequest {
        JudgeRequest::new(
            "What year was X founded?",
            "X was founded in 1999.",
            vec![Source::new("About X", "X was founded in 2001.", "https://x.example")],
        )
    }

    #[test]
    fn test_format_sources() {
        let formatted = format_sources(&request().sources);
        assert_eq!(
            formatted,
            "[Source 1]\nTitle: About X\nURL: https://x.example\nContent: X was founded in 2001.\n"
        );
        assert_eq!(format_sources(&[]), "No sources available.");
    }

    #[tokio::test]
    async fn test_llm_judge_request_shape() {
        let client = Arc::new(MockLLMClient::new(Provider::OpenAI, "{\"claims\": []}"));
        let judge = LlmJudge::new(client.clone()).with_model("gpt-4o-mini");

        let raw = judge.judge(&request()).await.unwrap();
        assert_eq!(raw, "{\"claims\": []}");

        let requests = client.requests.lock().unwrap();
        let sent = &requests[0];
        assert_eq!(sent.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(sent.temperature, Some(0.2));
        assert_eq!(sent.max_tokens, Some(2000));
        assert!(sent.json_response);
        assert!(sent.messages[0].content.contains("[Source 1]"));
        assert!(sent.messages[0].content.contains("X was founded in 1999."));
    }

    #[tokio::test]
    async fn test_llm_judge_no_json_mode_for_perplexity() {
        let client = Arc::new(MockLLMClient::new(Provider::Perplexity, "{}"));
        let judge = LlmJudge::new(client.clone());
        judge.judge(&request()).await.unwrap();

        assert!(!client.requests.lock().unwrap()[0].json_response);
    }

    #[tokio::test]
    async fn test_verifier_normalizes_output() {
        let client = Arc::new(MockLLMClient::new(
            Provider::OpenAI,
            r#"```json
{"overall_confidence": 70, "claims": [{"text": "X was founded in 1999.", "status": "contradicted", "reason": "Source says 2001", "sources": [1]}]}
```"#,
        ));
        let verifier = ClaimVerifier::new(Arc::new(LlmJudge::new(client)));

        let verification = verifier.verify(&request()).await.unwrap();
        assert_eq!(verification.claims[0].status, ClaimStatus::Contradicted);
        assert_eq!(verification.claims[0].sources, vec![0]);
    }

    #[tokio::test]
    async fn test_verifier_degrades_on_garbage() {
        let client = Arc::new(MockLLMClient::new(Provider::OpenAI, "not json at all"));
        let verifier = ClaimVerifier::new(Arc::new(LlmJudge::new(client)));

        let verification = verifier.verify(&request()).await.unwrap();
        assert_eq!(verification, Verification::sentinel());
    }

    #[tokio::test]
    async fn test_verifier_judge_failure_is_error() {
        let verifier = ClaimVerifier::new(Arc::new(FailingJudge));
        let err = verifier.verify(&request()).await.unwrap_err();
        assert!(matches!(err, Error::Judge(_)));
    }
}
