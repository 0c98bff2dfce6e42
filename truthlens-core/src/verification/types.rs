//! Verification data model.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::search::Source;

/// Text of the single claim in a sentinel verification.
pub const SENTINEL_CLAIM_TEXT: &str = "Unable to verify this answer";

/// Reason attached to the sentinel claim.
pub const SENTINEL_REASON: &str = "Verification system encountered an error";

/// Trust label for a single claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    /// Supported by at least one source
    Verified,
    /// Not clearly confirmed or denied
    Uncertain,
    /// True once, superseded by newer information
    Outdated,
    /// No source backs it
    Unsupported,
    /// A source states the opposite
    Contradicted,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 5] = [
        Self::Verified,
        Self::Uncertain,
        Self::Outdated,
        Self::Unsupported,
        Self::Contradicted,
    ];

    /// Points subtracted from the confidence score for one claim.
    pub fn penalty(&self) -> i64 {
        match self {
            Self::Verified => 0,
            Self::Uncertain => 5,
            Self::Outdated => 15,
            Self::Unsupported => 20,
            Self::Contradicted => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Uncertain => "uncertain",
            Self::Outdated => "outdated",
            Self::Unsupported => "unsupported",
            Self::Contradicted => "contradicted",
        }
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verified" => Ok(Self::Verified),
            "uncertain" => Ok(Self::Uncertain),
            "outdated" => Ok(Self::Outdated),
            "unsupported" => Ok(Self::Unsupported),
            "contradicted" => Ok(Self::Contradicted),
            other => Err(format!("unknown claim status: {}", other)),
        }
    }
}

/// An atomic factual assertion from the answer, with its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub text: String,
    pub status: ClaimStatus,
    pub reason: String,
    /// Zero-based positions into the request's source list.
    pub sources: Vec<usize>,
}

impl Claim {
    pub fn new(text: impl Into<String>, status: ClaimStatus) -> Self {
        Self {
            text: text.into(),
            status,
            reason: String::new(),
            sources: Vec::new(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_sources(mut self, sources: Vec<usize>) -> Self {
        self.sources = sources;
        self
    }
}

/// Claims produced for one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub claims: Vec<Claim>,
    /// The judge's own estimate. Advisory only; the reported score is
    /// always computed from the claims.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_confidence: Option<u8>,
    /// Set when the judge output could not be used.
    #[serde(default)]
    pub degraded: bool,
}

impl Verification {
    pub fn new(claims: Vec<Claim>) -> Self {
        Self {
            claims,
            overall_confidence: None,
            degraded: false,
        }
    }

    /// Fallback verification used when judge output is unusable.
    pub fn sentinel() -> Self {
        Self {
            claims: vec![Claim::new(SENTINEL_CLAIM_TEXT, ClaimStatus::Uncertain)
                .with_reason(SENTINEL_REASON)],
            overall_confidence: None,
            degraded: true,
        }
    }
}

/// Per-status claim counts. All five keys are always serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub verified: usize,
    pub uncertain: usize,
    pub outdated: usize,
    pub unsupported: usize,
    pub contradicted: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: ClaimStatus) {
        match status {
            ClaimStatus::Verified => self.verified += 1,
            ClaimStatus::Uncertain => self.uncertain += 1,
            ClaimStatus::Outdated => self.outdated += 1,
            ClaimStatus::Unsupported => self.unsupported += 1,
            ClaimStatus::Contradicted => self.contradicted += 1,
        }
    }

    pub fn get(&self, status: ClaimStatus) -> usize {
        match status {
            ClaimStatus::Verified => self.verified,
            ClaimStatus::Uncertain => self.uncertain,
            ClaimStatus::Outdated => self.outdated,
            ClaimStatus::Unsupported => self.unsupported,
            ClaimStatus::Contradicted => self.contradicted,
        }
    }

    pub fn total(&self) -> usize {
        ClaimStatus::ALL.iter().map(|s| self.get(*s)).sum()
    }
}

/// Risk tier color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskColor {
    Green,
    Yellow,
    Red,
}

/// Risk tier level. Low risk corresponds to green.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Aggregate score and tier for a verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskData {
    pub confidence: u8,
    pub status_counts: StatusCounts,
    pub total_claims: usize,
    pub risk_color: RiskColor,
    pub risk_level: RiskLevel,
    pub risk_message: String,
    pub risk_emoji: String,
}

/// Full report for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub question: String,
    pub answer: String,
    pub verification: Verification,
    pub sources: Vec<Source>,
    pub search_queries: Vec<String>,
    pub risk_data: RiskData,
}
