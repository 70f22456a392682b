//! Route handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;
use tracing::info;

use super::AppState;
use super::error::ApiError;
use crate::pipeline::{ResultEnvelope, ScrapeRequest};

#[derive(Debug, Serialize)]
pub struct RootResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

/// Liveness message
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "siteprofile API is running",
    })
}

/// Health check for the scraper service
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "scraper",
    })
}

/// Crawl a website and extract its business profile.
///
/// Crawl and extraction failures still answer 200 with `success: false`;
/// only invalid input (400) and configuration or internal faults (500) are
/// HTTP errors.
pub async fn crawl_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ResultEnvelope>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    info!(url = %request.url, "Received crawl request");

    let envelope = state.pipeline.run_guarded(&request).await?;
    Ok(Json(envelope))
}
