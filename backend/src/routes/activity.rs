//! Exercise and meal log API routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::ActivityService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use vitatrack_shared::types::{
    ActivityListQuery, ExerciseLog, LogActivityResponse, LogExerciseRequest, LogMealRequest,
    MealLog,
};

/// Create activity log routes
pub fn activity_routes() -> Router<AppState> {
    Router::new()
        .route("/exercises", post(log_exercise).get(list_exercises))
        .route("/meals", post(log_meal).get(list_meals))
}

/// POST /api/v1/activity/exercises - Log an exercise session
async fn log_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<LogExerciseRequest>,
) -> ApiResult<(StatusCode, Json<LogActivityResponse<ExerciseLog>>)> {
    let response = ActivityService::log_exercise(state.db(), auth.user_id, req).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/activity/exercises - List exercise logs
async fn list_exercises(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ActivityListQuery>,
) -> ApiResult<Json<Vec<ExerciseLog>>> {
    let logs = ActivityService::list_exercises(state.db(), auth.user_id, query).await?;

    Ok(Json(logs))
}

/// POST /api/v1/activity/meals - Log a meal
async fn log_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<LogMealRequest>,
) -> ApiResult<(StatusCode, Json<LogActivityResponse<MealLog>>)> {
    let response = ActivityService::log_meal(state.db(), auth.user_id, req).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/activity/meals - List meal logs
async fn list_meals(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ActivityListQuery>,
) -> ApiResult<Json<Vec<MealLog>>> {
    let logs = ActivityService::list_meals(state.db(), auth.user_id, query).await?;

    Ok(Json(logs))
}
