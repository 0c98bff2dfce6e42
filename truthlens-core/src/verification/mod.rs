//! Claim verification and scoring.
//!
//! - [`judge`]: the [`ClaimJudge`] seam and its LLM-backed implementation
//! - [`normalize`]: turns untrusted judge text into a [`Verification`]
//! - [`risk`]: the pure confidence aggregator
//! - [`types`]: claims, statuses, risk data and the final report

pub mod judge;
pub mod normalize;
pub mod risk;
pub mod types;

mod proptest;

pub use judge::{format_sources, ClaimJudge, ClaimVerifier, JudgeRequest, LlmJudge};
pub use normalize::{extract_json_block, normalize_verification};
pub use risk::{assess_risk, GREEN_THRESHOLD, YELLOW_THRESHOLD};
pub use types::{
    Claim, ClaimStatus, RiskColor, RiskData, RiskLevel, StatusCounts, Verification,
    VerificationResult, SENTINEL_CLAIM_TEXT, SENTINEL_REASON,
};
