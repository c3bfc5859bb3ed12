//! Exercise and meal log repositories
//!
//! Activity rows feed both the history endpoints and the badge counters,
//! so each table exposes a total count alongside the listing queries.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use vitatrack_shared::types::{ExerciseLog, MealLog};

/// Exercise record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub duration_minutes: Option<i32>,
    pub calories_burned: Option<f64>,
    pub performed_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ExerciseRecord {
    pub fn into_log(self) -> ExerciseLog {
        ExerciseLog {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            duration_minutes: self.duration_minutes,
            calories_burned: self.calories_burned,
            performed_at: self.performed_at,
            notes: self.notes,
        }
    }
}

/// Meal record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MealRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub meal_type: Option<String>,
    pub calories: Option<f64>,
    pub consumed_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MealRecord {
    pub fn into_log(self) -> MealLog {
        MealLog {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            meal_type: self.meal_type,
            calories: self.calories,
            consumed_at: self.consumed_at,
            notes: self.notes,
        }
    }
}

/// Input for creating an exercise log
#[derive(Debug, Clone)]
pub struct CreateExercise {
    pub user_id: Uuid,
    pub name: String,
    pub duration_minutes: Option<i32>,
    pub calories_burned: Option<f64>,
    pub performed_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Input for creating a meal log
#[derive(Debug, Clone)]
pub struct CreateMeal {
    pub user_id: Uuid,
    pub name: String,
    pub meal_type: Option<String>,
    pub calories: Option<f64>,
    pub consumed_at: DateTime<Utc>,
    pub notes: Option<String>,
}

const EXERCISE_COLUMNS: &str =
    "id, user_id, name, duration_minutes, calories_burned, performed_at, notes, created_at";

const MEAL_COLUMNS: &str =
    "id, user_id, name, meal_type, calories, consumed_at, notes, created_at";

/// Exercise repository
pub struct ExerciseRepository;

impl ExerciseRepository {
    pub async fn create(pool: &PgPool, input: CreateExercise) -> Result<ExerciseRecord> {
        let record = sqlx::query_as::<_, ExerciseRecord>(&format!(
            r#"
            INSERT INTO exercises (user_id, name, duration_minutes, calories_burned, performed_at, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {EXERCISE_COLUMNS}
            "#
        ))
        .bind(input.user_id)
        .bind(&input.name)
        .bind(input.duration_minutes)
        .bind(input.calories_burned)
        .bind(input.performed_at)
        .bind(&input.notes)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// List logs newest first, optionally bounded to a date window
    pub async fn get_by_user(
        pool: &PgPool,
        user_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<ExerciseRecord>> {
        let records = sqlx::query_as::<_, ExerciseRecord>(&format!(
            r#"
            SELECT {EXERCISE_COLUMNS} FROM exercises
            WHERE user_id = $1
              AND ($2::TIMESTAMPTZ IS NULL OR performed_at >= $2)
              AND ($3::TIMESTAMPTZ IS NULL OR performed_at <= $3)
            ORDER BY performed_at DESC
            LIMIT $4
            "#
        ))
        .bind(user_id)
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn count_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM exercises WHERE user_id = $1"#)
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Count of workouts logged before 08:00 on the given day
    pub async fn count_early_morning(pool: &PgPool, user_id: Uuid, day: NaiveDate) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM exercises
            WHERE user_id = $1
              AND performed_at::DATE = $2
              AND EXTRACT(HOUR FROM performed_at) < 8
            "#,
        )
        .bind(user_id)
        .bind(day)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}

/// Meal repository
pub struct MealRepository;

impl MealRepository {
    pub async fn create(pool: &PgPool, input: CreateMeal) -> Result<MealRecord> {
        let record = sqlx::query_as::<_, MealRecord>(&format!(
            r#"
            INSERT INTO meals (user_id, name, meal_type, calories, consumed_at, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {MEAL_COLUMNS}
            "#
        ))
        .bind(input.user_id)
        .bind(&input.name)
        .bind(&input.meal_type)
        .bind(input.calories)
        .bind(input.consumed_at)
        .bind(&input.notes)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    pub async fn get_by_user(
        pool: &PgPool,
        user_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<MealRecord>> {
        let records = sqlx::query_as::<_, MealRecord>(&format!(
            r#"
            SELECT {MEAL_COLUMNS} FROM meals
            WHERE user_id = $1
              AND ($2::TIMESTAMPTZ IS NULL OR consumed_at >= $2)
              AND ($3::TIMESTAMPTZ IS NULL OR consumed_at <= $3)
            ORDER BY consumed_at DESC
            LIMIT $4
            "#
        ))
        .bind(user_id)
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn count_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM meals WHERE user_id = $1"#)
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}
