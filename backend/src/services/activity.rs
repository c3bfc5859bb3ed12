//! Exercise and meal logging
//!
//! Each new log entry re-checks the cumulative count badges, so a badge
//! fires on the exact request that lands on its milestone.

use crate::error::ApiError;
use crate::repositories::{
    CreateExercise, CreateMeal, ExerciseRepository, MealRepository,
};
use crate::services::achievements::AchievementService;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use vitatrack_shared::types::{
    ActivityListQuery, ExerciseLog, LogActivityResponse, LogExerciseRequest, LogMealRequest,
    MealLog,
};

const LIST_LIMIT: i64 = 100;

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn day_end(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
        .and_utc()
}

/// Activity logging service
pub struct ActivityService;

impl ActivityService {
    /// Record an exercise session and check count badges
    pub async fn log_exercise(
        pool: &PgPool,
        user_id: Uuid,
        req: LogExerciseRequest,
    ) -> Result<LogActivityResponse<ExerciseLog>, ApiError> {
        let name = req
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ApiError::Validation("Please provide an exercise name".to_string()))?;

        if let Some(minutes) = req.duration_minutes {
            if minutes <= 0 {
                return Err(ApiError::Validation(
                    "Duration must be a positive number of minutes".to_string(),
                ));
            }
        }

        let record = ExerciseRepository::create(
            pool,
            CreateExercise {
                user_id,
                name: name.trim().to_string(),
                duration_minutes: req.duration_minutes,
                calories_burned: req.calories_burned,
                performed_at: req.performed_at.unwrap_or_else(Utc::now),
                notes: req.notes,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        let total = ExerciseRepository::count_for_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        let new_badges = AchievementService::award_exercise_milestone(pool, user_id, total)
            .await?
            .into_iter()
            .collect();

        Ok(LogActivityResponse {
            entry: record.into_log(),
            new_badges,
        })
    }

    /// List exercise logs, newest first, within an optional date window
    pub async fn list_exercises(
        pool: &PgPool,
        user_id: Uuid,
        query: ActivityListQuery,
    ) -> Result<Vec<ExerciseLog>, ApiError> {
        let records = ExerciseRepository::get_by_user(
            pool,
            user_id,
            query.start_date.map(day_start),
            query.end_date.map(day_end),
            LIST_LIMIT,
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(|r| r.into_log()).collect())
    }

    /// Record a meal and check count badges
    pub async fn log_meal(
        pool: &PgPool,
        user_id: Uuid,
        req: LogMealRequest,
    ) -> Result<LogActivityResponse<MealLog>, ApiError> {
        let name = req
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ApiError::Validation("Please provide a meal name".to_string()))?;

        let record = MealRepository::create(
            pool,
            CreateMeal {
                user_id,
                name: name.trim().to_string(),
                meal_type: req.meal_type,
                calories: req.calories,
                consumed_at: req.consumed_at.unwrap_or_else(Utc::now),
                notes: req.notes,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        let total = MealRepository::count_for_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        let new_badges = AchievementService::award_meal_milestone(pool, user_id, total)
            .await?
            .into_iter()
            .collect();

        Ok(LogActivityResponse {
            entry: record.into_log(),
            new_badges,
        })
    }

    /// List meal logs, newest first, within an optional date window
    pub async fn list_meals(
        pool: &PgPool,
        user_id: Uuid,
        query: ActivityListQuery,
    ) -> Result<Vec<MealLog>, ApiError> {
        let records = MealRepository::get_by_user(
            pool,
            user_id,
            query.start_date.map(day_start),
            query.end_date.map(day_end),
            LIST_LIMIT,
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(|r| r.into_log()).collect())
    }
}
