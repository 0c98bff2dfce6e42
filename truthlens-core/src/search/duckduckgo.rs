//! DuckDuckGo retriever.
//!
//! Web results come from the keyless HTML endpoint, parsed with `scraper`.
//! When that page yields nothing (no hits, or the bot check page) the Instant
//! Answer API is tried instead. Its abstract and related-topic tree are
//! flattened into sources.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::{debug, warn};

use super::{EvidenceRetriever, Source};
use crate::error::{Error, Result};
use crate::llm::build_http_client;

const USER_AGENT: &str = concat!("truthlens/", env!("CARGO_PKG_VERSION"));

/// Retriever backed by `html.duckduckgo.com` with an Instant Answer fallback.
pub struct DuckDuckGoRetriever {
    html_url: String,
    instant_url: String,
    http: Client,
}

impl DuckDuckGoRetriever {
    const DEFAULT_HTML_URL: &'static str = "https://html.duckduckgo.com/html/";
    const DEFAULT_INSTANT_URL: &'static str = "https://api.duckduckgo.com/";

    pub fn new(timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            html_url: Self::DEFAULT_HTML_URL.to_string(),
            instant_url: Self::DEFAULT_INSTANT_URL.to_string(),
            http: build_http_client(timeout_secs)?,
        })
    }

    pub fn with_html_url(mut self, url: impl Into<String>) -> Self {
        self.html_url = url.into();
        self
    }

    pub fn with_instant_url(mut self, url: impl Into<String>) -> Self {
        self.instant_url = url.into();
        self
    }

    async fn fetch(&self, request: RequestBuilder) -> Result<String> {
        let response = request
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| Error::Search(format!("DuckDuckGo request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Search(format!("Failed to read DuckDuckGo response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Search(format!("DuckDuckGo error ({}): {}", status, body)));
        }
        Ok(body)
    }

    async fn search_web(&self, query: &str, max_results: usize) -> Result<Vec<Source>> {
        let body = self
            .fetch(self.http.get(&self.html_url).query(&[("q", query)]))
            .await?;
        parse_html(&body, max_results)
    }

    async fn search_instant(&self, query: &str, max_results: usize) -> Result<Vec<Source>> {
        let body = self
            .fetch(self.http.get(&self.instant_url).query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ]))
            .await?;
        parse_instant_answer(&body, max_results)
    }
}

// =============================================================================
// HTML results page
// =============================================================================

struct ResultSelectors {
    result: Selector,
    title: Selector,
    snippet: Selector,
}

fn selectors() -> Result<&'static ResultSelectors> {
    static SELECTORS: OnceLock<Option<ResultSelectors>> = OnceLock::new();
    SELECTORS
        .get_or_init(|| {
            Some(ResultSelectors {
                result: Selector::parse("div.result:not(.result--ad)").ok()?,
                title: Selector::parse("a.result__a").ok()?,
                snippet: Selector::parse(".result__snippet").ok()?,
            })
        })
        .as_ref()
        .ok_or_else(|| Error::Internal("invalid DuckDuckGo result selectors".into()))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a result link. DuckDuckGo wraps targets in a `/l/?uddg=` redirect.
fn resolve_link(href: &str) -> Option<String> {
    let base = Url::parse("https://duckduckgo.com/").ok()?;
    let url = base.join(href).ok()?;

    let target = url
        .query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, value)| value.into_owned());

    Some(target.unwrap_or_else(|| url.into()))
}

fn parse_html(body: &str, max_results: usize) -> Result<Vec<Source>> {
    let selectors = selectors()?;
    let document = Html::parse_document(body);

    let sources = document
        .select(&selectors.result)
        .filter_map(|result| {
            let link = result.select(&selectors.title).next()?;
            let url = resolve_link(link.value().attr("href")?)?;
            let snippet = result
                .select(&selectors.snippet)
                .next()
                .map(element_text)
                .unwrap_or_default();
            Some(Source::new(element_text(link), snippet, url))
        })
        .take(max_results)
        .collect();

    Ok(sources)
}

// =============================================================================
// Instant Answer API
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswer {
    #[serde(default)]
    heading: String,
    #[serde(default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(default)]
    related_topics: Vec<RelatedTopic>,
}

/// A related topic or a named group of them. `Group` is tried first and
/// requires `Topics`, since every `Topic` field is optional.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<RelatedTopic>,
    },
    Topic {
        #[serde(rename = "Text", default)]
        text: String,
        #[serde(rename = "FirstURL", default)]
        first_url: String,
    },
}

fn flatten_topics(topics: Vec<RelatedTopic>, out: &mut Vec<Source>) {
    for topic in topics {
        match topic {
            RelatedTopic::Topic { text, first_url } => {
                if text.trim().is_empty() {
                    continue;
                }
                let title = text
                    .split(" - ")
                    .next()
                    .unwrap_or(text.as_str())
                    .trim()
                    .to_string();
                out.push(Source::new(title, text, first_url));
            }
            RelatedTopic::Group { topics } => flatten_topics(topics, out),
        }
    }
}

fn parse_instant_answer(body: &str, max_results: usize) -> Result<Vec<Source>> {
    let answer: InstantAnswer = serde_json::from_str(body)
        .map_err(|e| Error::Search(format!("Failed to parse DuckDuckGo response: {}", e)))?;

    let mut sources = Vec::new();
    if !answer.abstract_text.trim().is_empty() {
        sources.push(Source::new(
            answer.heading,
            answer.abstract_text,
            answer.abstract_url,
        ));
    }
    flatten_topics(answer.related_topics, &mut sources);
    sources.truncate(max_results);

    Ok(sources)
}

#[async_trait]
impl EvidenceRetriever for DuckDuckGoRetriever {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Source>> {
        let web = match self.search_web(query, max_results).await {
            Ok(sources) if !sources.is_empty() => {
                debug!(query, results = sources.len(), "DuckDuckGo web search complete");
                return Ok(sources);
            }
            Ok(sources) => {
                debug!(query, "No DuckDuckGo web results, trying Instant Answer");
                Ok(sources)
            }
            Err(e) => {
                warn!(query, error = %e, "DuckDuckGo web search failed, trying Instant Answer");
                Err(e)
            }
        };

        match self.search_instant(query, max_results).await {
            Ok(sources) => {
                debug!(query, results = sources.len(), "DuckDuckGo Instant Answer complete");
                Ok(sources)
            }
            // the web search error is the more useful one to report
            Err(e) => match web {
                Ok(empty) => {
                    warn!(query, error = %e, "DuckDuckGo Instant Answer failed");
                    Ok(empty)
                }
                Err(web_error) => Err(web_error),
            },
        }
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }
}
