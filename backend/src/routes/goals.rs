//! Goals API routes
//!
//! The progress-update handler is where the cross-entity side effects
//! live: an update to an active goal advances the user's streak, which
//! can earn streak badges, and a completion earns the per-goal badge.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::{AchievementService, GoalService, StreakService};
use crate::services::streaks;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;
use vitatrack_shared::models::{Goal, GoalStatus};
use vitatrack_shared::types::{
    AddMilestoneRequest, CreateGoalRequest, DashboardResponse, GoalsListQuery, GoalsListResponse,
    ProgressHistoryResponse, ProgressUpdateResponse, UpdateGoalStatusRequest,
    UpdateProgressRequest,
};

/// Create goals routes
pub fn goals_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_goal).get(list_goals))
        .route("/dashboard", get(dashboard))
        .route("/:id", get(get_goal).delete(delete_goal))
        .route("/:id/progress", put(update_progress))
        .route("/:id/history", get(progress_history))
        .route("/:id/milestones", post(add_milestone))
        .route("/:id/status", put(update_status))
}

/// POST /api/v1/goals - Create a new goal
async fn create_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateGoalRequest>,
) -> ApiResult<(StatusCode, Json<Goal>)> {
    let goal = GoalService::create(state.db(), auth.user_id, req).await?;

    Ok((StatusCode::CREATED, Json(goal)))
}

/// GET /api/v1/goals - List goals with per-status stats
async fn list_goals(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<GoalsListQuery>,
) -> ApiResult<Json<GoalsListResponse>> {
    let response = GoalService::list(state.db(), auth.user_id, query).await?;

    Ok(Json(response))
}

/// GET /api/v1/goals/dashboard - Summary dashboard
async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DashboardResponse>> {
    let response = GoalService::dashboard(state.db(), auth.user_id).await?;

    Ok(Json(response))
}

/// GET /api/v1/goals/:id - Fetch a single goal
async fn get_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Goal>> {
    let goal = GoalService::load_owned(state.db(), auth.user_id, id).await?;

    Ok(Json(goal))
}

/// PUT /api/v1/goals/:id/progress - Record a progress update
async fn update_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProgressRequest>,
) -> ApiResult<Json<ProgressUpdateResponse>> {
    let (goal, outcome) =
        GoalService::update_progress(state.db(), auth.user_id, id, req.current_value, req.note)
            .await?;

    let mut new_badges = Vec::new();
    let mut streak_result = None;

    // Active goals count as today's activity for the streak
    if goal.status == GoalStatus::Active {
        let (_, result) = StreakService::check_and_update(state.db(), auth.user_id).await?;

        let milestones = streaks::streak_milestones(result.current_streak);
        if !milestones.is_empty() {
            new_badges
                .extend(AchievementService::award_streak_badges(state.db(), auth.user_id, &milestones).await?);
        }

        streak_result = Some(result);
    }

    // Completion badge fires on the update that crossed 100%; the award
    // is idempotent, so a replayed request cannot double-award it.
    if outcome.just_completed {
        new_badges
            .extend(AchievementService::award_goal_completion(state.db(), auth.user_id, &goal).await?);
    }

    Ok(Json(ProgressUpdateResponse {
        goal,
        streak: streak_result,
        new_badges,
    }))
}

/// GET /api/v1/goals/:id/history - Progress history
async fn progress_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProgressHistoryResponse>> {
    let response = GoalService::progress_history(state.db(), auth.user_id, id).await?;

    Ok(Json(response))
}

/// POST /api/v1/goals/:id/milestones - Add a milestone
async fn add_milestone(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AddMilestoneRequest>,
) -> ApiResult<Json<Goal>> {
    let goal =
        GoalService::add_milestone(state.db(), auth.user_id, id, req.title, req.target_value)
            .await?;

    Ok(Json(goal))
}

/// PUT /api/v1/goals/:id/status - Pause, resume, or abandon
async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateGoalStatusRequest>,
) -> ApiResult<Json<Goal>> {
    let goal = GoalService::update_status(state.db(), auth.user_id, id, req.status).await?;

    Ok(Json(goal))
}

/// DELETE /api/v1/goals/:id - Hard delete
async fn delete_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    GoalService::delete(state.db(), auth.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
