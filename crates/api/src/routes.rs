use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use pipeline::Pipeline;
use prometheus::Encoder;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::dto::WrappedResponse;
use crate::error::{ApiError, ApiResult};

pub struct ApiState {
    pub pipeline: Arc<Pipeline>,
    pub metrics_path: &'static str,
}

pub fn build_router(state: Arc<ApiState>) -> Router {
    let metrics_path: &'static str = state.metrics_path;
    Router::new()
        .route("/healthz", get(healthz))
        .route("/wrapped", post(generate_wrapped))
        .route("/wrapped/:username", get(get_wrapped))
        .route(metrics_path, get(metrics))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct WrappedRequest {
    // Absence is handled by pipeline validation, not a 422 from the
    // extractor.
    #[serde(default)]
    username: String,
}

#[instrument(skip(state, request), fields(username = %request.username))]
async fn generate_wrapped(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<WrappedRequest>,
) -> ApiResult<Json<WrappedResponse>> {
    let outcome = state.pipeline.run(&request.username).await?;
    Ok(Json(WrappedResponse::from_outcome(outcome)))
}

#[instrument(skip(state))]
async fn get_wrapped(
    State(state): State<Arc<ApiState>>,
    Path(username): Path<String>,
) -> ApiResult<Json<WrappedResponse>> {
    let bundle = state
        .pipeline
        .lookup(&username)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("no wrapped stats for {username}")))?;
    Ok(Json(WrappedResponse::from_bundle(bundle, true)))
}

async fn metrics() -> ApiResult<impl IntoResponse> {
    let encoder = prometheus::TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    let content_type = encoder.format_type().to_string();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    Ok((
        axum::http::StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, content_type)],
        buffer,
    ))
}
