//! # truthlens-core
//!
//! Answer verification: generate (or accept) an answer to a question, check
//! each factual claim in it against freshly retrieved web sources, and score
//! the result.
//!
//! ## Core Components
//!
//! - **Search**: evidence retrieval behind the [`EvidenceRetriever`] trait
//! - **Answer**: answer generation behind the [`AnswerGenerator`] trait
//! - **Verification**: claim judging, normalization of judge output, and the
//!   confidence aggregator
//! - **Pipeline**: the orchestrator tying the stages together
//!
//! ## Example
//!
//! ```rust,ignore
//! use truthlens_core::{Config, VerifyRequest};
//!
//! let config = Config::from_env()?;
//! let pipeline = config.build_pipeline()?;
//!
//! let result = pipeline
//!     .run(VerifyRequest::generate("What year was Rust 1.0 released?"))
//!     .await?;
//!
//! println!(
//!     "{} {}% ({} claims)",
//!     result.risk_data.risk_emoji, result.risk_data.confidence, result.risk_data.total_claims
//! );
//! ```

pub mod answer;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod search;
#[cfg(feature = "server")]
pub mod server;
pub mod verification;

// Re-exports for convenience
pub use answer::{AnswerGenerator, GeneratedAnswer, LlmAnswerGenerator};
pub use config::{Config, ConfigError};
pub use error::{Error, Result, Stage};
pub use llm::{
    client_for, AnthropicClient, ClientConfig, CompletionRequest, CompletionResponse, LLMClient,
    OpenAIClient, Provider,
};
pub use pipeline::{PipelineConfig, VerificationPipeline, VerifyRequest};
pub use search::{
    plan_queries, retriever_for, DuckDuckGoRetriever, EvidenceRetriever, SearchProvider,
    SerpApiRetriever, Source,
};
pub use verification::{
    assess_risk, normalize_verification, Claim, ClaimJudge, ClaimStatus, ClaimVerifier,
    JudgeRequest, LlmJudge, RiskColor, RiskData, RiskLevel, StatusCounts, Verification,
    VerificationResult,
};
