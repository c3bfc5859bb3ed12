//! Health metric repository
//!
//! Metric readings are stored with the measurement payload as JSONB so
//! each metric type keeps its own shape without a table per type.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;
use vitatrack_shared::models::{HealthMetric, MetricValue};

/// Health metric record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MetricRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub metric_type: String,
    pub value: Json<serde_json::Value>,
    pub note: Option<String>,
    pub measured_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl MetricRecord {
    /// Convert to the domain model, re-tagging the stored payload
    pub fn into_metric(self) -> Result<HealthMetric> {
        let tagged = serde_json::json!({
            "metric_type": self.metric_type,
            "value": self.value.0,
        });
        let value: MetricValue = serde_json::from_value(tagged)?;

        Ok(HealthMetric {
            id: self.id,
            user_id: self.user_id,
            value,
            note: self.note,
            measured_at: self.measured_at,
        })
    }
}

/// Input for recording a metric
#[derive(Debug, Clone)]
pub struct CreateMetric {
    pub user_id: Uuid,
    pub metric_type: String,
    pub value: serde_json::Value,
    pub note: Option<String>,
    pub measured_at: DateTime<Utc>,
}

const METRIC_COLUMNS: &str = "id, user_id, metric_type, value, note, measured_at, created_at";

/// Health metric repository
pub struct MetricRepository;

impl MetricRepository {
    pub async fn create(pool: &PgPool, input: CreateMetric) -> Result<MetricRecord> {
        let record = sqlx::query_as::<_, MetricRecord>(&format!(
            r#"
            INSERT INTO health_metrics (user_id, metric_type, value, note, measured_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {METRIC_COLUMNS}
            "#
        ))
        .bind(input.user_id)
        .bind(&input.metric_type)
        .bind(Json(&input.value))
        .bind(&input.note)
        .bind(input.measured_at)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// List readings newest first, optionally filtered by type and window
    pub async fn get_by_user(
        pool: &PgPool,
        user_id: Uuid,
        metric_type: Option<&str>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<MetricRecord>> {
        let records = sqlx::query_as::<_, MetricRecord>(&format!(
            r#"
            SELECT {METRIC_COLUMNS} FROM health_metrics
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR metric_type = $2)
              AND ($3::TIMESTAMPTZ IS NULL OR measured_at >= $3)
              AND ($4::TIMESTAMPTZ IS NULL OR measured_at <= $4)
            ORDER BY measured_at DESC
            LIMIT $5
            "#
        ))
        .bind(user_id)
        .bind(metric_type)
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Most recent reading of a given type
    pub async fn latest(
        pool: &PgPool,
        user_id: Uuid,
        metric_type: &str,
    ) -> Result<Option<MetricRecord>> {
        let record = sqlx::query_as::<_, MetricRecord>(&format!(
            r#"
            SELECT {METRIC_COLUMNS} FROM health_metrics
            WHERE user_id = $1 AND metric_type = $2
            ORDER BY measured_at DESC
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .bind(metric_type)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Readings of one type since a cutoff, oldest first for trend math
    pub async fn history_since(
        pool: &PgPool,
        user_id: Uuid,
        metric_type: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MetricRecord>> {
        let records = sqlx::query_as::<_, MetricRecord>(&format!(
            r#"
            SELECT {METRIC_COLUMNS} FROM health_metrics
            WHERE user_id = $1 AND metric_type = $2 AND measured_at >= $3
            ORDER BY measured_at ASC
            "#
        ))
        .bind(user_id)
        .bind(metric_type)
        .bind(since)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}
