//! HTTP surface (Axum) for the verification pipeline.
//!
//! Used by the `truthlens` binary; enabled with the `server` feature.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    extract::State,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ErrorResponse};
pub use handler::{verify_existing_handler, verify_handler};
pub use state::{AppState, ServiceConfig};

/// Origins of the local development front-ends.
pub const DEV_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:5173"];

pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = DEV_ORIGINS.into_iter().map(HeaderValue::from_static).collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/config", get(config_handler))
        .route("/api/verify", post(verify_handler))
        .route("/api/verify-existing", post(verify_existing_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
pub struct RootResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub config: ServiceConfig,
}

#[tracing::instrument]
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        name: "TruthLens API",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
    })
}

#[tracing::instrument(skip_all)]
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        config: state.service_config,
    })
}

#[tracing::instrument(skip_all)]
pub async fn config_handler(State(state): State<AppState>) -> Json<ServiceConfig> {
    Json(state.service_config)
}
