//! HTTP route handlers for Axum.

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::{
    api::types::{AnalyzeRequest, AnalyzeResponse, HealthDto},
    matching,
};

use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

/// Matching scans the whole key universe and may call the encoder, so it
/// runs on the blocking pool rather than a runtime worker.
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<AnalyzeResponse> {
    let chars = request.ocr_text.chars().count();
    let index = state.index.clone();
    let results = tokio::task::spawn_blocking(move || matching::analyze(&index, &request.ocr_text))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    info!(chars, results = results.len(), "analyzed ocr text");
    Ok(Json(AnalyzeResponse { results }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok",
        semantic: state.index.encoder().is_some(),
        index: state.index.stats(),
    })
}
