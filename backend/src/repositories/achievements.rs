//! Achievement repository for database operations
//!
//! Awards rely on the UNIQUE (user_id, badge_id) constraint: inserts use
//! ON CONFLICT DO NOTHING so concurrent checks for the same badge produce
//! exactly one row, with losers reported as "already awarded".

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;
use vitatrack_shared::models::{Achievement, BadgeTier, BadgeType};

/// Achievement record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AchievementRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub badge_id: String,
    pub badge_type: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: String,
    pub tier: String,
    pub criteria_value: f64,
    pub earned_at: DateTime<Utc>,
    pub related_goal_id: Option<Uuid>,
    pub related_data: Option<Json<serde_json::Value>>,
    pub is_visible: bool,
    pub is_featured: bool,
}

impl AchievementRecord {
    pub fn into_achievement(self) -> Result<Achievement> {
        Ok(Achievement {
            id: self.id,
            user_id: self.user_id,
            badge_id: self.badge_id,
            badge_type: self
                .badge_type
                .parse::<BadgeType>()
                .map_err(|_| anyhow::anyhow!("Unknown badge type: {}", self.badge_type))?,
            name: self.name,
            description: self.description,
            icon: self.icon,
            tier: self
                .tier
                .parse::<BadgeTier>()
                .map_err(|_| anyhow::anyhow!("Unknown badge tier: {}", self.tier))?,
            criteria_value: self.criteria_value,
            earned_at: self.earned_at,
            related_goal_id: self.related_goal_id,
            related_data: self.related_data.map(|j| j.0),
            is_visible: self.is_visible,
            is_featured: self.is_featured,
        })
    }
}

/// Input for awarding a badge
#[derive(Debug, Clone)]
pub struct NewAchievement {
    pub user_id: Uuid,
    pub badge_id: String,
    pub badge_type: BadgeType,
    pub name: String,
    pub description: Option<String>,
    pub icon: String,
    pub tier: BadgeTier,
    pub criteria_value: f64,
    pub related_goal_id: Option<Uuid>,
    pub related_data: Option<serde_json::Value>,
}

const ACHIEVEMENT_COLUMNS: &str = "id, user_id, badge_id, badge_type, name, description, icon, \
     tier, criteria_value, earned_at, related_goal_id, related_data, is_visible, is_featured";

/// Achievement repository
pub struct AchievementRepository;

impl AchievementRepository {
    /// Insert an award unless the user already holds that badge.
    /// Returns the new row, or None when the badge was already earned.
    pub async fn insert_if_absent(
        pool: &PgPool,
        input: NewAchievement,
    ) -> Result<Option<AchievementRecord>> {
        let record = sqlx::query_as::<_, AchievementRecord>(&format!(
            r#"
            INSERT INTO achievements
                (user_id, badge_id, badge_type, name, description, icon, tier,
                 criteria_value, related_goal_id, related_data)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id, badge_id) DO NOTHING
            RETURNING {ACHIEVEMENT_COLUMNS}
            "#
        ))
        .bind(input.user_id)
        .bind(&input.badge_id)
        .bind(input.badge_type.as_str())
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.icon)
        .bind(input.tier.as_str())
        .bind(input.criteria_value)
        .bind(input.related_goal_id)
        .bind(input.related_data.map(Json))
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// List a user's achievements, newest first, with optional filters
    pub async fn get_by_user(
        pool: &PgPool,
        user_id: Uuid,
        badge_type: Option<BadgeType>,
        tier: Option<BadgeTier>,
    ) -> Result<Vec<AchievementRecord>> {
        let records = sqlx::query_as::<_, AchievementRecord>(&format!(
            r#"
            SELECT {ACHIEVEMENT_COLUMNS} FROM achievements
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR badge_type = $2)
              AND ($3::TEXT IS NULL OR tier = $3)
            ORDER BY earned_at DESC
            "#
        ))
        .bind(user_id)
        .bind(badge_type.map(|b| b.as_str()))
        .bind(tier.map(|t| t.as_str()))
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Fetch one achievement by id (no user filter, ownership checked by caller)
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<AchievementRecord>> {
        let record = sqlx::query_as::<_, AchievementRecord>(&format!(
            r#"SELECT {ACHIEVEMENT_COLUMNS} FROM achievements WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Badge ids the user already holds
    pub async fn earned_badge_ids(pool: &PgPool, user_id: Uuid) -> Result<Vec<String>> {
        let ids =
            sqlx::query_scalar::<_, String>(r#"SELECT badge_id FROM achievements WHERE user_id = $1"#)
                .bind(user_id)
                .fetch_all(pool)
                .await?;

        Ok(ids)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM achievements WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
