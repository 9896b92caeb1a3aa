//! Axum route handlers for the Optimize API.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::optimize::OptimizeResponse;
use crate::state::AppState;

/// POST {base}/optimize
///
/// Takes the raw body so malformed JSON, an oversized body and a missing
/// `resumeText` get the same envelope as every other deployment shape.
pub async fn handle_optimize(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<OptimizeResponse>, AppError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge {
                limit: state.optimizer.max_body_bytes(),
            }
        } else {
            AppError::invalid_body(rejection.body_text())
        }
    })?;
    let response = state.optimizer.handle(&body).await?;
    Ok(Json(response))
}
