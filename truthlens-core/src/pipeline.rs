//! Verification orchestration.
//!
//! [`VerificationPipeline`] ties the collaborators together for one request:
//!
//! ```text
//! question ─┬─> AnswerGenerator ──> answer ─┐
//!           └─> EvidenceRetriever ─> sources ┴─> ClaimVerifier ─> claims ─> assess_risk
//! ```
//!
//! Generation and retrieval run concurrently. Every external call is bounded
//! by [`PipelineConfig::call_timeout`]. A hard failure in any stage fails the
//! whole request; nothing partial is returned and nothing is retried.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::answer::AnswerGenerator;
use crate::error::{Error, Result, Stage};
use crate::search::{
    merge_sources, plan_queries, EvidenceRetriever, Source, DEFAULT_MAX_QUERIES,
    DEFAULT_MAX_RESULTS,
};
use crate::verification::{assess_risk, ClaimJudge, ClaimVerifier, JudgeRequest, VerificationResult};

/// Tunables for one pipeline instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Upper bound for each external call
    pub call_timeout: Duration,
    /// Results kept per search query
    pub max_results_per_query: usize,
    /// Search queries issued per request
    pub max_queries: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(30),
            max_results_per_query: DEFAULT_MAX_RESULTS,
            max_queries: DEFAULT_MAX_QUERIES,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_max_results_per_query(mut self, max: usize) -> Self {
        self.max_results_per_query = max;
        self
    }

    pub fn with_max_queries(mut self, max: usize) -> Self {
        self.max_queries = max;
        self
    }
}

/// One verification request. Without an answer, one is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl VerifyRequest {
    /// Generate an answer, then verify it.
    pub fn generate(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: None,
        }
    }

    /// Verify a caller-supplied answer.
    pub fn existing(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: Some(answer.into()),
        }
    }
}

/// The verification orchestrator.
pub struct VerificationPipeline {
    config: PipelineConfig,
    generator: Arc<dyn AnswerGenerator>,
    retriever: Arc<dyn EvidenceRetriever>,
    verifier: ClaimVerifier,
}

impl VerificationPipeline {
    pub fn new(
        config: PipelineConfig,
        generator: Arc<dyn AnswerGenerator>,
        retriever: Arc<dyn EvidenceRetriever>,
        judge: Arc<dyn ClaimJudge>,
    ) -> Self {
        Self {
            config,
            generator,
            retriever,
            verifier: ClaimVerifier::new(judge),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Name of the evidence provider in use.
    pub fn retriever_name(&self) -> &'static str {
        self.retriever.name()
    }

    /// Handle one request in whichever mode it asks for.
    pub async fn run(&self, request: VerifyRequest) -> Result<VerificationResult> {
        let request_id = Uuid::new_v4();
        let mode = if request.answer.is_some() {
            "verify_existing"
        } else {
            "generate_and_verify"
        };
        let span = info_span!("verify", %request_id, mode);

        async move {
            match request.answer {
                Some(answer) => self.verify_existing(&request.question, &answer).await,
                None => self.generate_and_verify(&request.question).await,
            }
        }
        .instrument(span)
        .await
    }

    /// Generate an answer for the question and verify it.
    pub async fn generate_and_verify(&self, question: &str) -> Result<VerificationResult> {
        let question = require_text(question, "question")?;
        let queries = plan_queries(question, None, self.config.max_queries);
        debug!(?queries, "Planned search queries");

        let generation = async {
            let answer = self
                .bounded(Stage::Answer, self.generator.generate(question))
                .await
                .map_err(answer_error)?;
            if answer.text.trim().is_empty() {
                return Err(Error::AnswerGeneration("generator returned an empty answer".into()));
            }
            Ok::<_, Error>(answer)
        };

        let (answer, sources) = tokio::try_join!(generation, self.gather_evidence(&queries))?;
        let sources = with_citation_fallback(sources, &answer.citations);

        self.judge_and_score(question, answer.text.trim(), sources, queries)
            .await
    }

    /// Verify an answer supplied by the caller.
    pub async fn verify_existing(&self, question: &str, answer: &str) -> Result<VerificationResult> {
        let question = require_text(question, "question")?;
        let answer = require_text(answer, "answer")?;
        let queries = plan_queries(question, Some(answer), self.config.max_queries);
        debug!(?queries, "Planned search queries");

        let sources = self.gather_evidence(&queries).await?;
        self.judge_and_score(question, answer, sources, queries).await
    }

    async fn judge_and_score(
        &self,
        question: &str,
        answer: &str,
        sources: Vec<Source>,
        queries: Vec<String>,
    ) -> Result<VerificationResult> {
        let request = JudgeRequest::new(question, answer, sources);
        let verification = self
            .bounded(Stage::Judge, self.verifier.verify(&request))
            .await?;
        let risk_data = assess_risk(&verification.claims);

        info!(
            claims = risk_data.total_claims,
            sources = request.sources.len(),
            confidence = risk_data.confidence,
            color = ?risk_data.risk_color,
            degraded = verification.degraded,
            "Verification complete"
        );

        Ok(VerificationResult {
            question: request.question,
            answer: request.answer,
            verification,
            sources: request.sources,
            search_queries: queries,
            risk_data,
        })
    }

    /// Run every query concurrently and merge what comes back.
    ///
    /// Individual query failures are skipped. The request fails only when
    /// every query fails. Sources without a snippet are dropped before the
    /// per-query limit applies.
    async fn gather_evidence(&self, queries: &[String]) -> Result<Vec<Source>> {
        let max_results = self.config.max_results_per_query;
        let searches = queries.iter().map(|query| async move {
            let result = self
                .bounded(Stage::Evidence, self.retriever.search(query, max_results))
                .await;
            (query, result)
        });

        let mut batches = Vec::with_capacity(queries.len());
        let mut failures = Vec::new();
        for (query, result) in join_all(searches).await {
            match result {
                Ok(mut sources) => {
                    sources.retain(Source::is_usable);
                    sources.truncate(max_results);
                    debug!(%query, results = sources.len(), "Search complete");
                    batches.push(sources);
                }
                Err(e) => {
                    warn!(%query, error = %e, "Search failed");
                    failures.push(e);
                }
            }
        }

        if !queries.is_empty() && failures.len() == queries.len() {
            let all_timed_out = failures.iter().all(|e| matches!(e, Error::Timeout { .. }));
            return Err(match failures.pop() {
                Some(timeout @ Error::Timeout { .. }) if all_timed_out => timeout,
                Some(e) => Error::EvidenceRetrieval(format!(
                    "all {} search queries failed; last error: {}",
                    queries.len(),
                    e
                )),
                None => Error::EvidenceRetrieval("no search queries".into()),
            });
        }

        let sources = merge_sources(batches);
        info!(
            sources = sources.len(),
            failed_queries = failures.len(),
            provider = self.retriever.name(),
            "Evidence gathered"
        );
        Ok(sources)
    }

    async fn bounded<T>(&self, stage: Stage, call: impl Future<Output = Result<T>>) -> Result<T> {
        let limit = self.config.call_timeout;
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(%stage, timeout_ms = limit.as_millis() as u64, "External call timed out");
                Err(Error::timeout(stage, limit.as_millis() as u64))
            }
        }
    }
}

fn require_text<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_input(format!("{} must not be empty", field)));
    }
    Ok(trimmed)
}

fn answer_error(error: Error) -> Error {
    match error {
        e @ (Error::Timeout { .. } | Error::AnswerGeneration(_)) => e,
        e => Error::AnswerGeneration(e.to_string()),
    }
}

/// Use the generator's citation URLs when retrieval produced nothing.
fn with_citation_fallback(sources: Vec<Source>, citations: &[String]) -> Vec<Source> {
    if !sources.is_empty() || citations.is_empty() {
        return sources;
    }

    info!(citations = citations.len(), "No search results, using answer citations");
    merge_sources([citations
        .iter()
        .enumerate()
        .map(|(i, url)| Source::from_citation(i, url.clone()))
        .collect::<Vec<_>>()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::GeneratedAnswer;
    use crate::verification::{ClaimStatus, RiskColor, SENTINEL_CLAIM_TEXT};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // =========================================================================
    // Fake collaborators
    // =========================================================================

    struct FakeGenerator {
        answer: GeneratedAnswer,
        delay: Option<Duration>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeGenerator {
        fn new(text: &str) -> Self {
            Self {
                answer: GeneratedAnswer::new(text),
                delay: None,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AnswerGenerator for FakeGenerator {
        async fn generate(&self, _question: &str) -> Result<GeneratedAnswer> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(Error::LLM("provider down".into()));
            }
            Ok(self.answer.clone())
        }
    }

    struct FakeRetriever {
        results: Vec<Source>,
        failing_queries: Vec<usize>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl FakeRetriever {
        fn new(results: Vec<Source>) -> Self {
            Self {
                results,
                failing_queries: Vec::new(),
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EvidenceRetriever for FakeRetriever {
        async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<Source>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.failing_queries.contains(&call) {
                return Err(Error::Search("HTTP 503".into()));
            }
            // deliberately ignores max_results
            Ok(self.results.clone())
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }

    struct FakeJudge {
        response: Option<String>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl FakeJudge {
        fn new(response: &str) -> Self {
            Self {
                response: Some(response.to_string()),
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                response: None,
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ClaimJudge for FakeJudge {
        async fn judge(&self, _request: &JudgeRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.response
                .clone()
                .ok_or_else(|| Error::llm_api("openai", "connection reset"))
        }
    }

    fn founding_source() -> Source {
        Source::new("About X", "X was founded in 2001.", "https://x.example/about")
    }

    fn pipeline(
        generator: Arc<FakeGenerator>,
        retriever: Arc<FakeRetriever>,
        judge: Arc<FakeJudge>,
    ) -> VerificationPipeline {
        VerificationPipeline::new(PipelineConfig::default(), generator, retriever, judge)
    }

    const CONTRADICTED: &str = r#"{"overall_confidence": 70, "claims": [
        {"text": "X was founded in 1999.", "status": "contradicted",
         "reason": "Source 1 states 2001", "sources": [1]}
    ]}"#;

    // =========================================================================
    // Scenarios
    // =========================================================================

    #[tokio::test]
    async fn test_contradicted_founding_year() {
        let pipeline = pipeline(
            Arc::new(FakeGenerator::new("X was founded in 1999.")),
            Arc::new(FakeRetriever::new(vec![founding_source()])),
            Arc::new(FakeJudge::new(CONTRADICTED)),
        );

        let result = pipeline
            .run(VerifyRequest::generate("What year was X founded?"))
            .await
            .unwrap();

        assert_eq!(result.answer, "X was founded in 1999.");
        assert_eq!(result.verification.claims.len(), 1);
        assert_eq!(result.verification.claims[0].status, ClaimStatus::Contradicted);
        assert_eq!(result.verification.claims[0].sources, vec![0]);
        assert_eq!(result.risk_data.confidence, 70);
        assert_eq!(result.risk_data.risk_color, RiskColor::Yellow);
        assert_eq!(result.sources, vec![founding_source()]);
        assert_eq!(result.search_queries.len(), 2);
    }

    #[tokio::test]
    async fn test_three_verified_claims() {
        let judge = r#"{"claims": [
            {"text": "a", "status": "verified", "reason": "", "sources": [1]},
            {"text": "b", "status": "verified", "reason": "", "sources": ["Source 1"]},
            {"text": "c", "status": "verified", "reason": "", "sources": ["https://x.example/about"]}
        ]}"#;
        let pipeline = pipeline(
            Arc::new(FakeGenerator::new("unused")),
            Arc::new(FakeRetriever::new(vec![founding_source()])),
            Arc::new(FakeJudge::new(judge)),
        );

        let result = pipeline
            .run(VerifyRequest::existing("Q?", "a. b. c."))
            .await
            .unwrap();

        assert_eq!(result.risk_data.confidence, 100);
        assert_eq!(result.risk_data.risk_color, RiskColor::Green);
        assert_eq!(result.risk_data.status_counts.verified, 3);
    }

    #[tokio::test]
    async fn test_malformed_judge_output_degrades() {
        let judge = Arc::new(FakeJudge::new("Sorry, I cannot produce JSON today."));
        let pipeline = pipeline(
            Arc::new(FakeGenerator::new("An answer.")),
            Arc::new(FakeRetriever::new(vec![founding_source()])),
            judge.clone(),
        );

        let result = pipeline.run(VerifyRequest::generate("Q?")).await.unwrap();

        assert!(result.verification.degraded);
        assert_eq!(result.verification.claims.len(), 1);
        assert_eq!(result.verification.claims[0].text, SENTINEL_CLAIM_TEXT);
        assert_eq!(result.verification.claims[0].status, ClaimStatus::Uncertain);
        assert_eq!(result.risk_data.confidence, 95);
        assert_eq!(judge.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_existing_mode_skips_generation() {
        let generator = Arc::new(FakeGenerator::new("unused"));
        let pipeline = pipeline(
            generator.clone(),
            Arc::new(FakeRetriever::new(vec![founding_source()])),
            Arc::new(FakeJudge::new(CONTRADICTED)),
        );

        let result = pipeline
            .verify_existing("What year was X founded?", "  X was founded in 1999. ")
            .await
            .unwrap();

        assert_eq!(result.answer, "X was founded in 1999.");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    // =========================================================================
    // Evidence handling
    // =========================================================================

    #[tokio::test]
    async fn test_results_truncated_and_deduplicated() {
        let results: Vec<Source> = (0..5)
            .map(|i| Source::new(format!("t{}", i), "s", format!("https://s{}.example", i)))
            .collect();
        let pipeline = pipeline(
            Arc::new(FakeGenerator::new("An answer.")),
            Arc::new(FakeRetriever::new(results.clone())),
            Arc::new(FakeJudge::new("{\"claims\": []}")),
        );

        let result = pipeline.run(VerifyRequest::generate("Q?")).await.unwrap();

        // two queries return the same URLs; only the first three survive
        assert_eq!(result.sources, results[..3].to_vec());
    }

    #[tokio::test]
    async fn test_empty_snippet_sources_excluded() {
        let blank = Source::new("Blank", "  ", "https://blank.example");
        let judge = Arc::new(FakeJudge::new(CONTRADICTED));
        let pipeline = pipeline(
            Arc::new(FakeGenerator::new("X was founded in 1999.")),
            Arc::new(FakeRetriever::new(vec![blank, founding_source()])),
            judge,
        );

        let result = pipeline.run(VerifyRequest::generate("Q?")).await.unwrap();

        assert_eq!(result.sources, vec![founding_source()]);
        // [Source 1] in the judge output now refers to the founding source
        assert_eq!(result.verification.claims[0].sources, vec![0]);
        assert_eq!(result.verification.claims[0].status, ClaimStatus::Contradicted);
    }

    #[tokio::test]
    async fn test_single_query_failure_is_tolerated() {
        let mut retriever = FakeRetriever::new(vec![founding_source()]);
        retriever.failing_queries = vec![0];
        let pipeline = pipeline(
            Arc::new(FakeGenerator::new("An answer.")),
            Arc::new(retriever),
            Arc::new(FakeJudge::new(CONTRADICTED)),
        );

        let result = pipeline.run(VerifyRequest::generate("Q?")).await.unwrap();
        assert_eq!(result.sources.len(), 1);
    }

    #[tokio::test]
    async fn test_all_queries_failing_is_error() {
        let mut retriever = FakeRetriever::new(vec![founding_source()]);
        retriever.failing_queries = vec![0, 1];
        let judge = Arc::new(FakeJudge::new(CONTRADICTED));
        let pipeline = pipeline(
            Arc::new(FakeGenerator::new("An answer.")),
            Arc::new(retriever),
            judge.clone(),
        );

        let err = pipeline.run(VerifyRequest::generate("Q?")).await.unwrap_err();
        assert!(matches!(err, Error::EvidenceRetrieval(_)));
        assert_eq!(err.stage(), Stage::Evidence);
        assert_eq!(judge.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_evidence_is_not_an_error() {
        let judge = r#"{"claims": [{"text": "a", "status": "verified", "sources": [1]}]}"#;
        let pipeline = pipeline(
            Arc::new(FakeGenerator::new("An answer.")),
            Arc::new(FakeRetriever::new(Vec::new())),
            Arc::new(FakeJudge::new(judge)),
        );

        let result = pipeline.run(VerifyRequest::generate("Q?")).await.unwrap();
        assert!(result.sources.is_empty());
        // nothing to cite, so the claim cannot stay verified
        assert_eq!(result.verification.claims[0].status, ClaimStatus::Unsupported);
        assert_eq!(result.risk_data.confidence, 80);
    }

    #[tokio::test]
    async fn test_citation_fallback() {
        let mut generator = FakeGenerator::new("An answer.");
        generator.answer = generator.answer.with_citations(vec![
            "https://cited.example/a".to_string(),
            "https://cited.example/a".to_string(),
            "https://cited.example/b".to_string(),
        ]);
        let pipeline = pipeline(
            Arc::new(generator),
            Arc::new(FakeRetriever::new(Vec::new())),
            Arc::new(FakeJudge::new("{\"claims\": []}")),
        );

        let result = pipeline.run(VerifyRequest::generate("Q?")).await.unwrap();
        let urls: Vec<_> = result.sources.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["https://cited.example/a", "https://cited.example/b"]);
        assert_eq!(result.sources[0].title, "Source 1");
    }

    // =========================================================================
    // Failures
    // =========================================================================

    #[tokio::test]
    async fn test_blank_input_rejected_before_any_call() {
        let generator = Arc::new(FakeGenerator::new("An answer."));
        let retriever = Arc::new(FakeRetriever::new(vec![founding_source()]));
        let judge = Arc::new(FakeJudge::new(CONTRADICTED));
        let pipeline = pipeline(generator.clone(), retriever.clone(), judge.clone());

        let err = pipeline.run(VerifyRequest::generate("   ")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = pipeline
            .run(VerifyRequest::existing("Q?", "\n"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(retriever.calls.load(Ordering::SeqCst), 0);
        assert_eq!(judge.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generator_failure() {
        let mut generator = FakeGenerator::new("unused");
        generator.fail = true;
        let pipeline = pipeline(
            Arc::new(generator),
            Arc::new(FakeRetriever::new(vec![founding_source()])),
            Arc::new(FakeJudge::new(CONTRADICTED)),
        );

        let err = pipeline.run(VerifyRequest::generate("Q?")).await.unwrap_err();
        assert!(matches!(err, Error::AnswerGeneration(_)));
    }

    #[tokio::test]
    async fn test_judge_failure_is_hard_error() {
        let pipeline = pipeline(
            Arc::new(FakeGenerator::new("An answer.")),
            Arc::new(FakeRetriever::new(vec![founding_source()])),
            Arc::new(FakeJudge::failing()),
        );

        let err = pipeline.run(VerifyRequest::generate("Q?")).await.unwrap_err();
        assert!(matches!(err, Error::Judge(_)));
        assert_eq!(err.stage(), Stage::Judge);
    }

    #[tokio::test(start_paused = true)]
    async fn test_judge_timeout() {
        let mut judge = FakeJudge::new(CONTRADICTED);
        judge.delay = Some(Duration::from_secs(120));
        let pipeline = pipeline(
            Arc::new(FakeGenerator::new("An answer.")),
            Arc::new(FakeRetriever::new(vec![founding_source()])),
            Arc::new(judge),
        );

        let err = pipeline.run(VerifyRequest::generate("Q?")).await.unwrap_err();
        match err {
            Error::Timeout { stage, duration_ms } => {
                assert_eq!(stage, Stage::Judge);
                assert_eq!(duration_ms, 30_000);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_generator_timeout() {
        let mut generator = FakeGenerator::new("An answer.");
        generator.delay = Some(Duration::from_secs(45));
        let judge = Arc::new(FakeJudge::new(CONTRADICTED));
        let pipeline = pipeline(
            Arc::new(generator),
            Arc::new(FakeRetriever::new(vec![founding_source()])),
            judge.clone(),
        );

        let err = pipeline.run(VerifyRequest::generate("Q?")).await.unwrap_err();
        assert!(matches!(err, Error::Timeout { stage: Stage::Answer, .. }));
        assert_eq!(judge.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_searches_timing_out() {
        let mut retriever = FakeRetriever::new(vec![founding_source()]);
        retriever.delay = Some(Duration::from_secs(60));
        let pipeline = pipeline(
            Arc::new(FakeGenerator::new("An answer.")),
            Arc::new(retriever),
            Arc::new(FakeJudge::new(CONTRADICTED)),
        );

        let err = pipeline
            .verify_existing("Q?", "An answer.")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { stage: Stage::Evidence, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_generation_and_retrieval_overlap() {
        // each stage fits its own limit, so overlap only shows in total time
        let mut generator = FakeGenerator::new("An answer.");
        generator.delay = Some(Duration::from_secs(20));
        let mut retriever = FakeRetriever::new(vec![founding_source()]);
        retriever.delay = Some(Duration::from_secs(20));
        let pipeline = pipeline(
            Arc::new(generator),
            Arc::new(retriever),
            Arc::new(FakeJudge::new(CONTRADICTED)),
        );

        let start = tokio::time::Instant::now();
        pipeline.run(VerifyRequest::generate("Q?")).await.unwrap();
        assert!(start.elapsed() < Duration::from_secs(30));
    }

    #[test]
    fn test_verify_request_deserializes_without_answer() {
        let request: VerifyRequest = serde_json::from_str(r#"{"question": "Q?"}"#).unwrap();
        assert_eq!(request, VerifyRequest::generate("Q?"));
    }
}
