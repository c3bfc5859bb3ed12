//! Achievements and streak API routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::{AchievementService, StreakService};
use crate::services::streaks;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use uuid::Uuid;
use vitatrack_shared::models::Streak;
use vitatrack_shared::types::{
    AchievementStatsResponse, AchievementsListQuery, AchievementsListResponse,
    AvailableBadgesResponse, BadgeCheckResponse, StreakUpdateResponse,
};

/// Create achievements routes
pub fn achievements_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_achievements))
        .route("/stats", get(achievement_stats))
        .route("/available", get(available_badges))
        .route("/check", post(check_badges))
        .route("/streak", get(get_streak))
        .route("/streak/update", post(update_streak))
        .route("/:id", delete(delete_achievement))
}

/// GET /api/v1/achievements - Earned badges
async fn list_achievements(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AchievementsListQuery>,
) -> ApiResult<Json<AchievementsListResponse>> {
    let response = AchievementService::list(state.db(), auth.user_id, query).await?;

    Ok(Json(response))
}

/// GET /api/v1/achievements/stats - Totals by type and tier
async fn achievement_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<AchievementStatsResponse>> {
    let response = AchievementService::stats(state.db(), auth.user_id).await?;

    Ok(Json(response))
}

/// GET /api/v1/achievements/available - Badge catalog with earned flags
async fn available_badges(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<AvailableBadgesResponse>> {
    let response = AchievementService::available_badges(state.db(), auth.user_id).await?;

    Ok(Json(response))
}

/// POST /api/v1/achievements/check - Sweep the cumulative criteria
async fn check_badges(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<BadgeCheckResponse>> {
    let new_badges = AchievementService::check_and_award(state.db(), auth.user_id).await?;

    Ok(Json(BadgeCheckResponse {
        count: new_badges.len(),
        new_badges,
    }))
}

/// GET /api/v1/achievements/streak - Current streak record
async fn get_streak(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Streak>> {
    let streak = StreakService::get(state.db(), auth.user_id).await?;

    Ok(Json(streak))
}

/// POST /api/v1/achievements/streak/update - Run the continuity check
async fn update_streak(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<StreakUpdateResponse>> {
    let (streak, result) = StreakService::check_and_update(state.db(), auth.user_id).await?;

    let milestones = streaks::streak_milestones(result.current_streak);
    let new_badges = if milestones.is_empty() {
        Vec::new()
    } else {
        AchievementService::award_streak_badges(state.db(), auth.user_id, &milestones).await?
    };

    Ok(Json(StreakUpdateResponse {
        streak,
        result,
        new_badges,
    }))
}

/// DELETE /api/v1/achievements/:id - Remove an award (owner only)
async fn delete_achievement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    AchievementService::delete(state.db(), auth.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
