//! Error types for truthlens-core.

use thiserror::Error;

/// Result type alias using truthlens-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage an error originated from.
///
/// Callers use this to pick a retry strategy: a missing answer, missing
/// evidence and an unavailable verification engine each fail for different
/// reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Request validation before any external call
    Input,
    /// Answer generation
    Answer,
    /// Evidence retrieval
    Evidence,
    /// Claim judging
    Judge,
    /// Anything else (configuration, internal)
    Other,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Answer => write!(f, "answer_generation"),
            Self::Evidence => write!(f, "evidence_retrieval"),
            Self::Judge => write!(f, "verification"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Errors that can occur while verifying an answer.
#[derive(Error, Debug)]
pub enum Error {
    /// Request rejected before any external call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No answer available
    #[error("Answer generation failed: {0}")]
    AnswerGeneration(String),

    /// No evidence available
    #[error("Evidence retrieval failed: {0}")]
    EvidenceRetrieval(String),

    /// Verification engine unavailable
    #[error("Verification engine unavailable: {0}")]
    Judge(String),

    /// Timeout during an external call
    #[error("{stage} timed out after {duration_ms}ms")]
    Timeout { stage: Stage, duration_ms: u64 },

    /// LLM API error
    #[error("LLM API error: {provider} - {message}")]
    LlmApi { provider: String, message: String },

    /// LLM error (simple variant)
    #[error("LLM error: {0}")]
    LLM(String),

    /// Search provider error
    #[error("Search error: {0}")]
    Search(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an LLM API error.
    pub fn llm_api(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LlmApi {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error for a stage.
    pub fn timeout(stage: Stage, duration_ms: u64) -> Self {
        Self::Timeout { stage, duration_ms }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// The pipeline stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            Self::InvalidInput(_) => Stage::Input,
            Self::AnswerGeneration(_) => Stage::Answer,
            Self::EvidenceRetrieval(_) | Self::Search(_) => Stage::Evidence,
            Self::Judge(_) => Stage::Judge,
            Self::Timeout { stage, .. } => *stage,
            Self::LlmApi { .. }
            | Self::LLM(_)
            | Self::Config(_)
            | Self::Internal(_) => Stage::Other,
        }
    }

    /// Whether this error came from an upstream provider rather than the
    /// request itself or local code.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::AnswerGeneration(_)
                | Self::EvidenceRetrieval(_)
                | Self::Judge(_)
                | Self::LlmApi { .. }
                | Self::LLM(_)
                | Self::Search(_)
        )
    }
}
