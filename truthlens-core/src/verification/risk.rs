//! Confidence aggregation.

use super::types::{Claim, RiskColor, RiskData, RiskLevel, StatusCounts};

/// Lowest score that is still green.
pub const GREEN_THRESHOLD: u8 = 80;

/// Lowest score that is still yellow.
pub const YELLOW_THRESHOLD: u8 = 50;

struct Tier {
    color: RiskColor,
    level: RiskLevel,
    emoji: &'static str,
    message: &'static str,
}

const TIERS: [Tier; 3] = [
    Tier {
        color: RiskColor::Green,
        level: RiskLevel::Low,
        emoji: "✅",
        message: "High confidence - Claims are well-supported",
    },
    Tier {
        color: RiskColor::Yellow,
        level: RiskLevel::Medium,
        emoji: "⚠️",
        message: "Medium confidence - Some claims need verification",
    },
    Tier {
        color: RiskColor::Red,
        level: RiskLevel::High,
        emoji: "❌",
        message: "Low confidence - Multiple unsupported claims",
    },
];

fn tier_for(confidence: u8) -> &'static Tier {
    if confidence >= GREEN_THRESHOLD {
        &TIERS[0]
    } else if confidence >= YELLOW_THRESHOLD {
        &TIERS[1]
    } else {
        &TIERS[2]
    }
}

/// Score a list of claims.
///
/// Starts at 100, subtracts each claim's penalty and clamps once at the end.
/// Pure: the same claims always give the same result, in any order.
pub fn assess_risk(claims: &[Claim]) -> RiskData {
    let mut counts = StatusCounts::default();
    let mut score: i64 = 100;

    for claim in claims {
        counts.record(claim.status);
        score = score.saturating_sub(claim.status.penalty());
    }

    let confidence = score.clamp(0, 100) as u8;
    let tier = tier_for(confidence);

    RiskData {
        confidence,
        status_counts: counts,
        total_claims: claims.len(),
        risk_color: tier.color,
        risk_level: tier.level,
        risk_message: tier.message.to_string(),
        risk_emoji: tier.emoji.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::types::ClaimStatus;
    use pretty_assertions::assert_eq;

    fn claims(statuses: &[ClaimStatus]) -> Vec<Claim> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, s)| Claim::new(format!("claim {}", i), *s))
            .collect()
    }

    #[test]
    fn test_zero_claims() {
        let risk = assess_risk(&[]);
        assert_eq!(risk.confidence, 100);
        assert_eq!(risk.risk_color, RiskColor::Green);
        assert_eq!(risk.risk_level, RiskLevel::Low);
        assert_eq!(risk.total_claims, 0);
    }

    #[test]
    fn test_green_boundary() {
        let risk = assess_risk(&claims(&[ClaimStatus::Unsupported]));
        assert_eq!(risk.confidence, 80);
        assert_eq!(risk.risk_color, RiskColor::Green);
    }

    #[test]
    fn test_just_below_green() {
        // 20 + 1 is not reachable with the fixed penalties; 5 + 15 + 5 = 25 is
        // the nearest combination below the boundary.
        let risk = assess_risk(&claims(&[
            ClaimStatus::Uncertain,
            ClaimStatus::Outdated,
            ClaimStatus::Uncertain,
        ]));
        assert_eq!(risk.confidence, 75);
        assert_eq!(risk.risk_color, RiskColor::Yellow);
        assert_eq!(tier_for(79).color, RiskColor::Yellow);
    }

    #[test]
    fn test_yellow_boundary() {
        assert_eq!(tier_for(50).color, RiskColor::Yellow);
        assert_eq!(tier_for(49).color, RiskColor::Red);
    }

    #[test]
    fn test_single_contradiction() {
        let risk = assess_risk(&claims(&[ClaimStatus::Contradicted]));
        assert_eq!(risk.confidence, 70);
        assert_eq!(risk.risk_color, RiskColor::Yellow);
        assert_eq!(risk.risk_emoji, "⚠️");
        assert_eq!(risk.risk_message, "Medium confidence - Some claims need verification");
    }

    #[test]
    fn test_floor_at_zero() {
        let risk = assess_risk(&claims(&[ClaimStatus::Contradicted; 10]));
        assert_eq!(risk.confidence, 0);
        assert_eq!(risk.risk_color, RiskColor::Red);
        assert_eq!(risk.risk_level, RiskLevel::High);
        assert_eq!(risk.status_counts.contradicted, 10);
    }

    #[test]
    fn test_mixed_counts() {
        let risk = assess_risk(&claims(&[
            ClaimStatus::Verified,
            ClaimStatus::Verified,
            ClaimStatus::Uncertain,
            ClaimStatus::Outdated,
        ]));
        assert_eq!(risk.confidence, 80);
        assert_eq!(
            risk.status_counts,
            StatusCounts {
                verified: 2,
                uncertain: 1,
                outdated: 1,
                unsupported: 0,
                contradicted: 0,
            }
        );
        assert_eq!(risk.total_claims, 4);
    }
}
