//! Streak repository for database operations
//!
//! One row per user, created lazily the first time a continuity check
//! runs. The whole record is written back in a single UPDATE.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use vitatrack_shared::models::{ActivityStreak, CurrentStreak, LongestStreak, Streak};

/// Streak record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StreakRecord {
    pub user_id: Uuid,
    pub current_count: i32,
    pub current_start: Option<NaiveDate>,
    pub last_activity_date: Option<NaiveDate>,
    pub longest_count: i32,
    pub longest_start: Option<NaiveDate>,
    pub longest_end: Option<NaiveDate>,
    pub total_active_days: i32,
    pub exercise_current: i32,
    pub exercise_longest: i32,
    pub exercise_last_date: Option<NaiveDate>,
    pub meal_current: i32,
    pub meal_longest: i32,
    pub meal_last_date: Option<NaiveDate>,
    pub goal_progress_current: i32,
    pub goal_progress_longest: i32,
    pub goal_progress_last_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StreakRecord {
    /// Convert to the domain model
    pub fn into_streak(self) -> Streak {
        Streak {
            user_id: self.user_id,
            current_streak: CurrentStreak {
                count: self.current_count,
                start_date: self.current_start,
                last_activity_date: self.last_activity_date,
            },
            longest_streak: LongestStreak {
                count: self.longest_count,
                start_date: self.longest_start,
                end_date: self.longest_end,
            },
            total_active_days: self.total_active_days,
            exercise_streak: ActivityStreak {
                current: self.exercise_current,
                longest: self.exercise_longest,
                last_date: self.exercise_last_date,
            },
            meal_logging_streak: ActivityStreak {
                current: self.meal_current,
                longest: self.meal_longest,
                last_date: self.meal_last_date,
            },
            goal_progress_streak: ActivityStreak {
                current: self.goal_progress_current,
                longest: self.goal_progress_longest,
                last_date: self.goal_progress_last_date,
            },
            updated_at: self.updated_at,
        }
    }
}

const STREAK_COLUMNS: &str = "user_id, current_count, current_start, last_activity_date, \
     longest_count, longest_start, longest_end, total_active_days, \
     exercise_current, exercise_longest, exercise_last_date, \
     meal_current, meal_longest, meal_last_date, \
     goal_progress_current, goal_progress_longest, goal_progress_last_date, \
     created_at, updated_at";

/// Streak repository
pub struct StreakRepository;

impl StreakRepository {
    /// Load the user's streak record, creating an all-zero one if absent
    pub async fn get_or_create(pool: &PgPool, user_id: Uuid) -> Result<StreakRecord> {
        sqlx::query(r#"INSERT INTO streaks (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING"#)
            .bind(user_id)
            .execute(pool)
            .await?;

        let record = sqlx::query_as::<_, StreakRecord>(&format!(
            r#"SELECT {STREAK_COLUMNS} FROM streaks WHERE user_id = $1"#
        ))
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Load a streak record if it exists
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<Option<StreakRecord>> {
        let record = sqlx::query_as::<_, StreakRecord>(&format!(
            r#"SELECT {STREAK_COLUMNS} FROM streaks WHERE user_id = $1"#
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Persist the whole streak record in a single row write
    pub async fn save(pool: &PgPool, streak: &Streak) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE streaks SET
                current_count = $2,
                current_start = $3,
                last_activity_date = $4,
                longest_count = $5,
                longest_start = $6,
                longest_end = $7,
                total_active_days = $8,
                exercise_current = $9,
                exercise_longest = $10,
                exercise_last_date = $11,
                meal_current = $12,
                meal_longest = $13,
                meal_last_date = $14,
                goal_progress_current = $15,
                goal_progress_longest = $16,
                goal_progress_last_date = $17,
                updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(streak.user_id)
        .bind(streak.current_streak.count)
        .bind(streak.current_streak.start_date)
        .bind(streak.current_streak.last_activity_date)
        .bind(streak.longest_streak.count)
        .bind(streak.longest_streak.start_date)
        .bind(streak.longest_streak.end_date)
        .bind(streak.total_active_days)
        .bind(streak.exercise_streak.current)
        .bind(streak.exercise_streak.longest)
        .bind(streak.exercise_streak.last_date)
        .bind(streak.meal_logging_streak.current)
        .bind(streak.meal_logging_streak.longest)
        .bind(streak.meal_logging_streak.last_date)
        .bind(streak.goal_progress_streak.current)
        .bind(streak.goal_progress_streak.longest)
        .bind(streak.goal_progress_streak.last_date)
        .execute(pool)
        .await?;

        Ok(())
    }
}
