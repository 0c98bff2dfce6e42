//! Property-based tests for claim scoring and normalization.
//!
//! - Status counts always sum to the claim total
//! - Confidence stays within [0, 100]
//! - Worsening any claim never raises the score
//! - Claim order does not matter
//! - Normalization never panics and always yields usable claims
