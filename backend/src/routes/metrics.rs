//! Health metric API routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::MetricService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use vitatrack_shared::models::HealthMetric;
use vitatrack_shared::types::{LogMetricRequest, MetricsListQuery};

/// Create health metric routes
pub fn metrics_routes() -> Router<AppState> {
    Router::new().route("/", post(log_metric).get(list_metrics))
}

/// POST /api/v1/metrics - Record a metric reading
async fn log_metric(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<LogMetricRequest>,
) -> ApiResult<(StatusCode, Json<HealthMetric>)> {
    let metric = MetricService::log(state.db(), auth.user_id, req).await?;

    Ok((StatusCode::CREATED, Json(metric)))
}

/// GET /api/v1/metrics - List metric readings
async fn list_metrics(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MetricsListQuery>,
) -> ApiResult<Json<Vec<HealthMetric>>> {
    let metrics = MetricService::list(state.db(), auth.user_id, query).await?;

    Ok(Json(metrics))
}
