//! Goal repository for database operations
//!
//! Milestones and progress history are embedded in the goal row as JSONB,
//! so goal state is always read and written as a single record. Derived
//! state (progress percentage, status, completion date) is computed by
//! the service layer and persisted here in one UPDATE.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;
use vitatrack_shared::models::{Goal, GoalStatus, GoalType, Milestone, ProgressEntry};

/// Goal record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GoalRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_type: String,
    pub title: String,
    pub description: Option<String>,
    pub target_value: f64,
    pub start_value: f64,
    pub current_value: f64,
    pub unit: String,
    pub start_date: DateTime<Utc>,
    pub target_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub status: String,
    pub progress_percentage: f64,
    pub milestones: Json<Vec<Milestone>>,
    pub progress_history: Json<Vec<ProgressEntry>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GoalRecord {
    /// Convert to the domain model
    pub fn into_goal(self) -> Result<Goal> {
        Ok(Goal {
            id: self.id,
            user_id: self.user_id,
            goal_type: self
                .goal_type
                .parse::<GoalType>()
                .map_err(|_| anyhow::anyhow!("Unknown goal type: {}", self.goal_type))?,
            title: self.title,
            description: self.description,
            target_value: self.target_value,
            start_value: self.start_value,
            current_value: self.current_value,
            unit: self.unit,
            start_date: self.start_date,
            target_date: self.target_date,
            completed_date: self.completed_date,
            status: self
                .status
                .parse::<GoalStatus>()
                .map_err(|_| anyhow::anyhow!("Unknown goal status: {}", self.status))?,
            progress_percentage: self.progress_percentage,
            milestones: self.milestones.0,
            progress_history: self.progress_history.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Input for creating a goal
#[derive(Debug, Clone)]
pub struct CreateGoal {
    pub user_id: Uuid,
    pub goal_type: String,
    pub title: String,
    pub description: Option<String>,
    pub target_value: f64,
    pub start_value: f64,
    pub current_value: f64,
    pub unit: String,
    pub target_date: DateTime<Utc>,
    pub status: String,
    pub progress_percentage: f64,
    pub completed_date: Option<DateTime<Utc>>,
}

const GOAL_COLUMNS: &str = "id, user_id, goal_type, title, description, target_value, \
     start_value, current_value, unit, start_date, target_date, completed_date, \
     status, progress_percentage, milestones, progress_history, created_at, updated_at";

/// Goal repository
pub struct GoalRepository;

impl GoalRepository {
    /// Create a new goal
    pub async fn create(pool: &PgPool, input: CreateGoal) -> Result<GoalRecord> {
        let record = sqlx::query_as::<_, GoalRecord>(&format!(
            r#"
            INSERT INTO goals (
                user_id, goal_type, title, description, target_value,
                start_value, current_value, unit, target_date, status,
                progress_percentage, completed_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {GOAL_COLUMNS}
            "#
        ))
        .bind(input.user_id)
        .bind(&input.goal_type)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.target_value)
        .bind(input.start_value)
        .bind(input.current_value)
        .bind(&input.unit)
        .bind(input.target_date)
        .bind(&input.status)
        .bind(input.progress_percentage)
        .bind(input.completed_date)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Get a goal by id, without an ownership filter. The service layer
    /// compares the owning user to the caller so a mismatch surfaces as
    /// Forbidden rather than NotFound.
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<GoalRecord>> {
        let record = sqlx::query_as::<_, GoalRecord>(&format!(
            r#"SELECT {GOAL_COLUMNS} FROM goals WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Get all goals for a user with optional status/type filters
    pub async fn get_by_user(
        pool: &PgPool,
        user_id: Uuid,
        status: Option<&str>,
        goal_type: Option<&str>,
    ) -> Result<Vec<GoalRecord>> {
        let records = sqlx::query_as::<_, GoalRecord>(&format!(
            r#"
            SELECT {GOAL_COLUMNS}
            FROM goals
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR status = $2)
              AND ($3::TEXT IS NULL OR goal_type = $3)
            ORDER BY target_date ASC, created_at DESC
            "#
        ))
        .bind(user_id)
        .bind(status)
        .bind(goal_type)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Persist the mutable state of a goal in a single row write
    pub async fn save(pool: &PgPool, goal: &Goal) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE goals SET
                title = $2,
                description = $3,
                target_value = $4,
                start_value = $5,
                current_value = $6,
                unit = $7,
                target_date = $8,
                completed_date = $9,
                status = $10,
                progress_percentage = $11,
                milestones = $12,
                progress_history = $13,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(goal.id)
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(goal.target_value)
        .bind(goal.start_value)
        .bind(goal.current_value)
        .bind(&goal.unit)
        .bind(goal.target_date)
        .bind(goal.completed_date)
        .bind(goal.status.as_str())
        .bind(goal.progress_percentage)
        .bind(Json(&goal.milestones))
        .bind(Json(&goal.progress_history))
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Delete a goal
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM goals WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count a user's goals with a given status
    pub async fn count_by_status(pool: &PgPool, user_id: Uuid, status: &str) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as(r#"SELECT COUNT(*) FROM goals WHERE user_id = $1 AND status = $2"#)
                .bind(user_id)
                .bind(status)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}
