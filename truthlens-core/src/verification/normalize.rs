//! Normalization of raw judge output.
//!
//! Judge text is untrusted. It is parsed into a permissive intermediate where
//! every field is an optional [`Value`], then validated into [`Verification`].
//! Output that cannot be parsed or fails validation becomes
//! [`Verification::sentinel`].

use regex::Regex;
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, warn};

use super::types::{Claim, ClaimStatus, Verification};
use crate::search::Source;

/// Judge output as deserialized, before validation.
#[derive(Debug, Default, Deserialize)]
struct RawVerification {
    #[serde(default)]
    claims: Option<Value>,
    #[serde(default)]
    overall_confidence: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawClaim {
    #[serde(default)]
    text: Option<Value>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    reason: Option<Value>,
    #[serde(default)]
    sources: Option<Value>,
}

fn source_ref_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)^\[?\s*(?:source\s*)?#?\s*(\d+)\s*\]?$").ok())
        .as_ref()
}

/// Locate the JSON payload in free-form model output.
///
/// Checks a ```json fence, then any fence, then raw spans running from each
/// `{` or `[` to the last matching closer, in order of opening. The first span
/// that parses wins, so bracketed prose such as `[Source 1]` ahead of the
/// payload is skipped.
pub fn extract_json_block(response: &str) -> &str {
    if let Some(start) = response.find("```json") {
        let content_start = start + 7;
        if let Some(end) = response[content_start..].find("```") {
            return response[content_start..content_start + end].trim();
        }
    }

    if let Some(start) = response.find("```") {
        let content_start = start + 3;
        let content_start = response[content_start..]
            .find('\n')
            .map(|i| content_start + i + 1)
            .unwrap_or(content_start);
        if let Some(end) = response[content_start..].find("```") {
            return response[content_start..content_start + end].trim();
        }
    }

    let spans: Vec<&str> = response
        .char_indices()
        .filter_map(|(start, c)| match c {
            '{' => Some((start, '}')),
            '[' => Some((start, ']')),
            _ => None,
        })
        .filter_map(|(start, close)| {
            let end = response.rfind(close)?;
            (end > start).then(|| &response[start..=end])
        })
        .collect();

    spans
        .iter()
        .find(|span| serde_json::from_str::<IgnoredAny>(span).is_ok())
        .or_else(|| spans.first())
        .copied()
        .unwrap_or_else(|| response.trim())
}

/// Turn raw judge text into a validated [`Verification`].
///
/// Never fails: unusable output yields the sentinel.
pub fn normalize_verification(raw: &str, sources: &[Source]) -> Verification {
    match parse_verification(raw, sources) {
        Ok(verification) => {
            debug!(claims = verification.claims.len(), "Judge output normalized");
            verification
        }
        Err(reason) => {
            warn!(%reason, "Judge output unusable, using sentinel verification");
            Verification::sentinel()
        }
    }
}

fn parse_verification(raw: &str, sources: &[Source]) -> Result<Verification, String> {
    let payload = extract_json_block(raw);
    let value: Value =
        serde_json::from_str(payload).map_err(|e| format!("invalid JSON: {}", e))?;

    let raw = match value {
        Value::Array(claims) => RawVerification {
            claims: Some(Value::Array(claims)),
            overall_confidence: None,
        },
        Value::Object(_) => serde_json::from_value(value)
            .map_err(|e| format!("unexpected shape: {}", e))?,
        other => return Err(format!("expected object or array, got {}", other)),
    };

    let claims = match raw.claims {
        Some(Value::Array(claims)) => claims,
        Some(_) => return Err("claims is not an array".to_string()),
        None => return Err("claims missing".to_string()),
    };

    let claims = claims
        .into_iter()
        .enumerate()
        .map(|(i, value)| parse_claim(value, sources).map_err(|e| format!("claim {}: {}", i, e)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Verification {
        claims,
        overall_confidence: raw.overall_confidence.as_ref().and_then(parse_confidence),
        degraded: false,
    })
}

fn parse_claim(value: Value, sources: &[Source]) -> Result<Claim, String> {
    if !value.is_object() {
        return Err("not an object".to_string());
    }
    let raw: RawClaim = serde_json::from_value(value).map_err(|e| e.to_string())?;

    let text = match raw.text {
        Some(Value::String(text)) if !text.trim().is_empty() => text.trim().to_string(),
        _ => return Err("missing or empty text".to_string()),
    };

    let mut status = match raw.status {
        Some(Value::String(status)) => status.parse::<ClaimStatus>()?,
        _ => return Err("missing status".to_string()),
    };

    let reason = match raw.reason {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(reason)) => reason,
        Some(other) => other.to_string(),
    };

    let mut refs = resolve_sources(raw.sources.as_ref(), sources);

    match status {
        ClaimStatus::Verified if refs.is_empty() => {
            status = if sources.is_empty() {
                ClaimStatus::Unsupported
            } else {
                ClaimStatus::Uncertain
            };
        }
        ClaimStatus::Unsupported => refs.clear(),
        _ => {}
    }

    Ok(Claim {
        text,
        status,
        reason,
        sources: refs,
    })
}

/// Resolve judge source references to zero-based positions.
fn resolve_sources(value: Option<&Value>, sources: &[Source]) -> Vec<usize> {
    let items: Vec<&Value> = match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single) => vec![single],
    };

    let mut resolved: Vec<usize> = Vec::new();
    for item in items {
        if let Some(index) = resolve_one(item, sources) {
            if !resolved.contains(&index) {
                resolved.push(index);
            }
        }
    }
    resolved
}

fn resolve_one(value: &Value, sources: &[Source]) -> Option<usize> {
    let number = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => {
            let s = s.trim();
            match source_ref_pattern().and_then(|re| re.captures(s)) {
                Some(caps) => caps.get(1).and_then(|m| m.as_str().parse::<u64>().ok()),
                None => {
                    return sources.iter().position(|source| {
                        (!source.url.is_empty() && source.url == s)
                            || (!source.title.is_empty() && source.title == s)
                    })
                }
            }
        }
        _ => None,
    }?;

    let number = usize::try_from(number).ok()?;
    (1..=sources.len()).contains(&number).then(|| number - 1)
}

fn parse_confidence(value: &Value) -> Option<u8> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    }?;
    number
        .is_finite()
        .then(|| number.round().clamp(0.0, 100.0) as u8)
}
