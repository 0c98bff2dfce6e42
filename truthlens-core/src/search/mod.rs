//! Evidence retrieval.
//!
//! An [`EvidenceRetriever`] turns one search query into a list of
//! [`Source`] snippets. Two web providers ship with the crate:
//! [`SerpApiRetriever`] and [`DuckDuckGoRetriever`]. The helpers here plan the
//! queries for a question and merge the per-query results.

mod duckduckgo;
mod serpapi;
#[cfg(test)]
mod stub;
mod types;

pub use duckduckgo::DuckDuckGoRetriever;
pub use serpapi::SerpApiRetriever;
pub use types::Source;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Default number of results kept per query.
pub const DEFAULT_MAX_RESULTS: usize = 3;

/// Default number of queries issued per question.
pub const DEFAULT_MAX_QUERIES: usize = 2;

/// Phrases stripped from a question to build the key-term query.
const FILLER_PHRASES: &[&str] = &["how to", "what is", "what are", "who is", "tell me about"];

/// A web search capability.
#[async_trait]
pub trait EvidenceRetriever: Send + Sync {
    /// Search for a query. An empty result is not an error.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Source>>;

    /// Short provider name for logs and health output.
    fn name(&self) -> &'static str;
}

/// Search provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProvider {
    DuckDuckGo,
    SerpApi,
}

impl std::fmt::Display for SearchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuckDuckGo => write!(f, "duckduckgo"),
            Self::SerpApi => write!(f, "serpapi"),
        }
    }
}

impl FromStr for SearchProvider {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "duckduckgo" | "ddg" => Ok(Self::DuckDuckGo),
            "serpapi" => Ok(Self::SerpApi),
            other => Err(Error::Config(format!("Unsupported search provider: {}", other))),
        }
    }
}

/// Build the retriever for a provider.
pub fn retriever_for(
    provider: SearchProvider,
    serpapi_key: Option<&str>,
    timeout_secs: u64,
) -> Result<Arc<dyn EvidenceRetriever>> {
    let retriever: Arc<dyn EvidenceRetriever> = match provider {
        SearchProvider::DuckDuckGo => Arc::new(DuckDuckGoRetriever::new(timeout_secs)?),
        SearchProvider::SerpApi => {
            let key = serpapi_key
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| Error::Config("SERPAPI_KEY is required when using SerpAPI".into()))?;
            Arc::new(SerpApiRetriever::new(key, timeout_secs)?)
        }
    };
    Ok(retriever)
}

/// Derive the search queries for a question.
///
/// The question itself comes first, then a recency variant with the previous
/// and current year appended, then a key-term variant with filler phrases
/// removed. The answer is accepted so callers can pass it when available; the
/// current planner keys only on the question.
pub fn plan_queries(question: &str, _answer: Option<&str>, max_queries: usize) -> Vec<String> {
    let question = question.trim();
    let year = Utc::now().year();

    let mut candidates = vec![
        question.to_string(),
        format!("{} {} {}", question, year - 1, year),
    ];

    let key_terms = key_terms(question);
    if key_terms.len() > 10 {
        candidates.push(key_terms);
    }

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|q| !q.is_empty() && seen.insert(q.to_lowercase()))
        .take(max_queries.max(1))
        .collect()
}

fn key_terms(question: &str) -> String {
    let mut text = question.replace('?', "").to_lowercase();
    for phrase in FILLER_PHRASES {
        text = text.replace(phrase, "");
    }
    text = text.replace("best practices", "guide");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Merge per-query results, keeping the first occurrence of each URL.
///
/// Sources without a URL are dropped since they cannot be displayed or
/// de-duplicated.
pub fn merge_sources(batches: impl IntoIterator<Item = Vec<Source>>) -> Vec<Source> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for source in batches.into_iter().flatten() {
        let url = source.url.trim();
        if url.is_empty() || !seen.insert(url.to_string()) {
            continue;
        }
        merged.push(source);
    }

    merged
}
