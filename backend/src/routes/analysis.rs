//! Health analysis API routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::MetricService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use vitatrack_shared::types::{
    AnalysisQuery, BloodPressureAnalysisResponse, HealthAnalysisResponse,
};

/// Create health analysis routes
pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health_analysis))
        .route("/blood-pressure", get(blood_pressure_analysis))
}

/// GET /api/v1/analysis - Aggregate analysis of the latest readings
async fn health_analysis(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AnalysisQuery>,
) -> ApiResult<Json<HealthAnalysisResponse>> {
    let response = MetricService::analyze(state.db(), auth.user_id, query).await?;

    Ok(Json(response))
}

/// GET /api/v1/analysis/blood-pressure - Latest reading plus trend
async fn blood_pressure_analysis(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AnalysisQuery>,
) -> ApiResult<Json<BloodPressureAnalysisResponse>> {
    let response = MetricService::blood_pressure(state.db(), auth.user_id, query).await?;

    Ok(Json(response))
}
