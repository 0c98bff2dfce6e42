use serde::Serialize;
use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::VerificationPipeline;

/// Provider and model selection reported by `/health` and `/api/config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceConfig {
    pub llm_provider: String,
    pub main_model: String,
    pub verifier_model: String,
    pub search_provider: String,
}

impl From<&Config> for ServiceConfig {
    fn from(config: &Config) -> Self {
        Self {
            llm_provider: config.llm_provider.to_string(),
            main_model: config.main_model.clone(),
            verifier_model: config.verifier_model.clone(),
            search_provider: config.search_provider.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<VerificationPipeline>,

    pub service_config: ServiceConfig,
}

impl AppState {
    pub fn new(pipeline: Arc<VerificationPipeline>, service_config: ServiceConfig) -> Self {
        Self {
            pipeline,
            service_config,
        }
    }
}
