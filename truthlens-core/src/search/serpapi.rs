//! SerpAPI (Google results) retriever.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{EvidenceRetriever, Source};
use crate::error::{Error, Result};
use crate::llm::build_http_client;

/// Retriever backed by `https://serpapi.com/search`.
pub struct SerpApiRetriever {
    api_key: String,
    base_url: String,
    http: Client,
}

impl SerpApiRetriever {
    const DEFAULT_BASE_URL: &'static str = "https://serpapi.com";

    pub fn new(api_key: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            http: build_http_client(timeout_secs)?,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<SerpApiResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SerpApiResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
}

fn parse_response(body: &str, max_results: usize) -> Result<Vec<Source>> {
    let response: SerpApiResponse = serde_json::from_str(body)
        .map_err(|e| Error::Search(format!("Failed to parse SerpAPI response: {}", e)))?;

    // SerpAPI reports "no results" through the error field as well
    if let Some(error) = response.error {
        if response.organic_results.is_empty() && !error.contains("hasn't returned any results") {
            return Err(Error::Search(format!("SerpAPI error: {}", error)));
        }
    }

    Ok(response
        .organic_results
        .into_iter()
        .take(max_results)
        .map(|r| Source::new(r.title, r.snippet, r.link))
        .collect())
}

#[async_trait]
impl EvidenceRetriever for SerpApiRetriever {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Source>> {
        let url = format!("{}/search", self.base_url);
        let num = max_results.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Search(format!("SerpAPI request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Search(format!("Failed to read SerpAPI response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Search(format!("SerpAPI error ({}): {}", status, body)));
        }

        let sources = parse_response(&body, max_results)?;
        debug!(query, results = sources.len(), "SerpAPI search complete");
        Ok(sources)
    }

    fn name(&self) -> &'static str {
        "serpapi"
    }
}
