use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use super::error::ApiError;
use super::state::AppState;
use crate::pipeline::VerifyRequest;
use crate::verification::VerificationResult;

#[derive(Debug, Deserialize)]
pub struct VerifyPayload {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyExistingPayload {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

#[tracing::instrument(skip_all)]
pub async fn verify_handler(
    State(state): State<AppState>,
    payload: Result<Json<VerifyPayload>, JsonRejection>,
) -> Result<Json<VerificationResult>, ApiError> {
    let Json(payload) = payload?;
    let result = state
        .pipeline
        .run(VerifyRequest::generate(payload.question))
        .await?;
    Ok(Json(result))
}

#[tracing::instrument(skip_all)]
pub async fn verify_existing_handler(
    State(state): State<AppState>,
    payload: Result<Json<VerifyExistingPayload>, JsonRejection>,
) -> Result<Json<VerificationResult>, ApiError> {
    let Json(payload) = payload?;
    let result = state
        .pipeline
        .run(VerifyRequest::existing(payload.question, payload.answer))
        .await?;
    Ok(Json(result))
}
