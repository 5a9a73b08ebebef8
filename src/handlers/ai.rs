use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middlewares::BackendToken;
use crate::models::{AnomalyDetectionInput, AnomalyReport, ApiDiscoveryInput, DiscoveryReport};
use crate::services::AiService;
use crate::state::AppState;

/// Ask the model for anomalies in an API's traffic
#[utoipa::path(
    post,
    path = "/api/ai/anomalies",
    request_body = AnomalyDetectionInput,
    responses(
        (status = 200, description = "Anomaly report", body = AnomalyReport),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Model failure or invalid model output")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "AI"
)]
pub async fn detect_anomalies(
    _token: BackendToken,
    State(state): State<AppState>,
    Json(payload): Json<AnomalyDetectionInput>,
) -> AppResult<Json<AnomalyReport>> {
    let report = AiService::detect_anomalies(state.model.as_ref(), &payload).await?;
    Ok(Json(report))
}

/// Ask the model which APIs appear in a traffic sample
#[utoipa::path(
    post,
    path = "/api/ai/discovery",
    request_body = ApiDiscoveryInput,
    responses(
        (status = 200, description = "Discovered APIs", body = DiscoveryReport),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Model failure or invalid model output")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "AI"
)]
pub async fn discover_apis(
    _token: BackendToken,
    State(state): State<AppState>,
    Json(payload): Json<ApiDiscoveryInput>,
) -> AppResult<Json<DiscoveryReport>> {
    let report = AiService::discover_apis(state.model.as_ref(), &payload).await?;
    Ok(Json(report))
}
