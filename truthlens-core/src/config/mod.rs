//! Environment-backed configuration.
//!
//! Provider selection and API keys use the conventional names
//! (`LLM_PROVIDER`, `OPENAI_API_KEY`, `SEARCH_PROVIDER`, ...). Everything
//! else is a `TRUTHLENS_*` override on top of defaults.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use crate::answer::{AnswerGenerator, LlmAnswerGenerator};
use crate::llm::{client_for, ClientConfig, Provider};
use crate::pipeline::{PipelineConfig, VerificationPipeline};
use crate::search::{retriever_for, SearchProvider, DEFAULT_MAX_QUERIES, DEFAULT_MAX_RESULTS};
use crate::verification::{ClaimJudge, LlmJudge};

/// Service configuration.
///
/// Use [`Config::from_env`] to read overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// LLM provider for generation and judging. Default: `openai`.
    pub llm_provider: Provider,

    pub openai_api_key: Option<String>,
    pub grok_api_key: Option<String>,
    pub perplexity_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,

    /// Search provider. Default: `duckduckgo`.
    pub search_provider: SearchProvider,

    pub serpapi_key: Option<String>,

    /// Model for answer generation. Default: the provider's main model.
    pub main_model: String,

    /// Model for claim judging. Default: the provider's verifier model.
    pub verifier_model: String,

    /// Results kept per search query. Default: `3`.
    pub max_search_results: usize,

    /// Search queries per request. Default: `2`.
    pub max_queries: usize,

    /// Upper bound for each external call, in seconds. Default: `30`.
    pub call_timeout_secs: u64,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// HTTP server port. Default: `8000`.
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        let provider = Provider::OpenAI;
        Self {
            llm_provider: provider,
            openai_api_key: None,
            grok_api_key: None,
            perplexity_api_key: None,
            anthropic_api_key: None,
            search_provider: SearchProvider::DuckDuckGo,
            serpapi_key: None,
            main_model: provider.default_main_model().to_string(),
            verifier_model: provider.default_verifier_model().to_string(),
            max_search_results: DEFAULT_MAX_RESULTS,
            max_queries: DEFAULT_MAX_QUERIES,
            call_timeout_secs: 30,
            bind_addr: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 8000,
        }
    }
}

impl Config {
    const ENV_LLM_PROVIDER: &'static str = "LLM_PROVIDER";
    const ENV_SEARCH_PROVIDER: &'static str = "SEARCH_PROVIDER";
    const ENV_SERPAPI_KEY: &'static str = "SERPAPI_KEY";
    const ENV_MAIN_MODEL: &'static str = "TRUTHLENS_MAIN_MODEL";
    const ENV_VERIFIER_MODEL: &'static str = "TRUTHLENS_VERIFIER_MODEL";
    const ENV_MAX_SEARCH_RESULTS: &'static str = "TRUTHLENS_MAX_SEARCH_RESULTS";
    const ENV_MAX_QUERIES: &'static str = "TRUTHLENS_MAX_QUERIES";
    const ENV_CALL_TIMEOUT_SECS: &'static str = "TRUTHLENS_CALL_TIMEOUT_SECS";
    const ENV_BIND_ADDR: &'static str = "TRUTHLENS_BIND_ADDR";
    const ENV_PORT: &'static str = "TRUTHLENS_PORT";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration from an arbitrary variable source.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let llm_provider = match get(Self::ENV_LLM_PROVIDER) {
            Some(value) => value.parse::<Provider>().map_err(|_| ConfigError::UnknownProvider {
                name: Self::ENV_LLM_PROVIDER,
                value,
            })?,
            None => defaults.llm_provider,
        };

        let search_provider = match get(Self::ENV_SEARCH_PROVIDER) {
            Some(value) => {
                value
                    .parse::<SearchProvider>()
                    .map_err(|_| ConfigError::UnknownProvider {
                        name: Self::ENV_SEARCH_PROVIDER,
                        value,
                    })?
            }
            None => defaults.search_provider,
        };

        Ok(Self {
            llm_provider,
            openai_api_key: get(Provider::OpenAI.api_key_env()),
            grok_api_key: get(Provider::Grok.api_key_env()),
            perplexity_api_key: get(Provider::Perplexity.api_key_env()),
            anthropic_api_key: get(Provider::Anthropic.api_key_env()),
            search_provider,
            serpapi_key: get(Self::ENV_SERPAPI_KEY),
            main_model: get(Self::ENV_MAIN_MODEL)
                .unwrap_or_else(|| llm_provider.default_main_model().to_string()),
            verifier_model: get(Self::ENV_VERIFIER_MODEL)
                .unwrap_or_else(|| llm_provider.default_verifier_model().to_string()),
            max_search_results: Self::parse_positive(
                Self::ENV_MAX_SEARCH_RESULTS,
                get(Self::ENV_MAX_SEARCH_RESULTS),
                defaults.max_search_results as u64,
            )? as usize,
            max_queries: Self::parse_positive(
                Self::ENV_MAX_QUERIES,
                get(Self::ENV_MAX_QUERIES),
                defaults.max_queries as u64,
            )? as usize,
            call_timeout_secs: Self::parse_positive(
                Self::ENV_CALL_TIMEOUT_SECS,
                get(Self::ENV_CALL_TIMEOUT_SECS),
                defaults.call_timeout_secs,
            )?,
            bind_addr: Self::parse_bind_addr(get(Self::ENV_BIND_ADDR), defaults.bind_addr)?,
            port: Self::parse_port(get(Self::ENV_PORT), defaults.port)?,
        })
    }

    /// Checks that the selected providers have the keys they need.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key().is_none() {
            return Err(ConfigError::MissingEnvVar {
                name: self.llm_provider.api_key_env(),
            });
        }

        if self.search_provider == SearchProvider::SerpApi && self.serpapi_key.is_none() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_SERPAPI_KEY,
            });
        }

        Ok(())
    }

    /// API key for the selected LLM provider.
    pub fn api_key(&self) -> Option<&str> {
        match self.llm_provider {
            Provider::OpenAI => self.openai_api_key.as_deref(),
            Provider::Grok => self.grok_api_key.as_deref(),
            Provider::Perplexity => self.perplexity_api_key.as_deref(),
            Provider::Anthropic => self.anthropic_api_key.as_deref(),
        }
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Orchestrator settings derived from this configuration.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .with_call_timeout(self.call_timeout())
            .with_max_results_per_query(self.max_search_results)
            .with_max_queries(self.max_queries)
    }

    /// Wire up the production collaborators.
    pub fn build_pipeline(&self) -> crate::error::Result<VerificationPipeline> {
        self.validate()?;

        let api_key = self.api_key().unwrap_or_default();
        let client = client_for(
            self.llm_provider,
            ClientConfig::new(api_key)
                .with_default_model(self.main_model.clone())
                .with_timeout(self.call_timeout_secs),
        )?;

        let generator: Arc<dyn AnswerGenerator> =
            Arc::new(LlmAnswerGenerator::new(client.clone()).with_model(self.main_model.clone()));
        let judge: Arc<dyn ClaimJudge> =
            Arc::new(LlmJudge::new(client).with_model(self.verifier_model.clone()));
        let retriever = retriever_for(
            self.search_provider,
            self.serpapi_key.as_deref(),
            self.call_timeout_secs,
        )?;

        Ok(VerificationPipeline::new(
            self.pipeline_config(),
            generator,
            retriever,
            judge,
        ))
    }

    /// Address to bind the HTTP server to. IPv6 addresses display bracketed.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Human-readable summary with API keys masked.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        let key = |value: &Option<String>| match value {
            Some(k) => format!("{} (configured)", mask_key(k)),
            None => "NOT SET".to_string(),
        };

        let mut lines = vec![
            ("LLM provider", self.llm_provider.to_string()),
            ("API key", key(&self.api_key().map(str::to_string))),
            ("Main model", self.main_model.clone()),
            ("Verifier model", self.verifier_model.clone()),
            ("Search provider", self.search_provider.to_string()),
        ];
        if self.search_provider == SearchProvider::SerpApi {
            lines.push(("SerpAPI key", key(&self.serpapi_key)));
        }
        lines.extend([
            ("Max search results", self.max_search_results.to_string()),
            ("Max queries", self.max_queries.to_string()),
            ("Call timeout", format!("{}s", self.call_timeout_secs)),
            ("Listen address", self.socket_addr().to_string()),
        ]);
        lines
    }

    fn parse_port(value: Option<String>, default: u16) -> Result<u16, ConfigError> {
        match value {
            Some(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            None => Ok(default),
        }
    }

    fn parse_bind_addr(value: Option<String>, default: IpAddr) -> Result<IpAddr, ConfigError> {
        match value {
            Some(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            None => Ok(default),
        }
    }

    fn parse_positive(
        name: &'static str,
        value: Option<String>,
        default: u64,
    ) -> Result<u64, ConfigError> {
        match value {
            Some(value) => match value.parse::<u64>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(ConfigError::InvalidNumber { name, value }),
            },
            None => Ok(default),
        }
    }
}

/// Mask an API key for display, keeping a short prefix and suffix.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() < 16 {
        return "*".repeat(chars.len().max(4));
    }
    let prefix: String = chars[..6].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", prefix, suffix)
}
