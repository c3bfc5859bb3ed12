//! Health metric recording and analysis
//!
//! The interpreters in the shared crate are pure; this service feeds them
//! the latest persisted reading per metric type and combines their
//! verdicts into an overall status.

use crate::error::ApiError;
use crate::repositories::{CreateMetric, MetricRecord, MetricRepository};
use crate::services::users::UserService;
use chrono::{Duration, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use vitatrack_shared::health_analysis::{
    analyze_blood_pressure, analyze_blood_sugar, analyze_bmi, analyze_body_fat,
    analyze_heart_rate, MetricStatus,
};
use vitatrack_shared::models::{HealthMetric, MetricValue};
use vitatrack_shared::types::{
    AnalysisMetrics, AnalysisPeriod, AnalysisQuery, BloodPressureAnalysisResponse,
    BloodPressureReading, BloodPressureTrend, HealthAnalysisResponse, LogMetricRequest,
    MetricReport, MetricsListQuery, TrendStats,
};

const DEFAULT_ANALYSIS_DAYS: i64 = 30;
const LIST_LIMIT: i64 = 200;

/// Health metric service
pub struct MetricService;

impl MetricService {
    /// Record a metric reading. The payload shape is validated by the
    /// tagged deserialization of the request body.
    pub async fn log(
        pool: &PgPool,
        user_id: Uuid,
        req: LogMetricRequest,
    ) -> Result<HealthMetric, ApiError> {
        let tagged = serde_json::to_value(&req.value).map_err(|e| ApiError::Internal(e.into()))?;
        let payload = tagged
            .get("value")
            .cloned()
            .ok_or_else(|| ApiError::Validation("Invalid metric payload".to_string()))?;

        let record = MetricRepository::create(
            pool,
            CreateMetric {
                user_id,
                metric_type: req.value.metric_type().to_string(),
                value: payload,
                note: req.note,
                measured_at: req.measured_at.unwrap_or_else(Utc::now),
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        record.into_metric().map_err(ApiError::Internal)
    }

    /// List readings, newest first, with optional type and window filters
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        query: MetricsListQuery,
    ) -> Result<Vec<HealthMetric>, ApiError> {
        let from = query
            .start_date
            .map(|d| d.and_time(NaiveTime::MIN).and_utc());
        let to = query.end_date.and_then(|d| {
            d.and_hms_opt(23, 59, 59).map(|t| t.and_utc())
        });

        let records = MetricRepository::get_by_user(
            pool,
            user_id,
            query.metric_type.as_deref(),
            from,
            to,
            LIST_LIMIT,
        )
        .await
        .map_err(ApiError::Internal)?;

        records
            .into_iter()
            .map(|r| r.into_metric())
            .collect::<Result<Vec<_>, _>>()
            .map_err(ApiError::Internal)
    }

    /// Aggregate analysis over the latest reading of each supported type
    pub async fn analyze(
        pool: &PgPool,
        user_id: Uuid,
        query: AnalysisQuery,
    ) -> Result<HealthAnalysisResponse, ApiError> {
        let days = query.days.unwrap_or(DEFAULT_ANALYSIS_DAYS).max(1);
        let now = Utc::now();
        let gender = UserService::gender(pool, user_id).await?;

        let mut metrics = AnalysisMetrics::default();
        let mut warning_count = 0usize;
        let mut danger_count = 0usize;

        let mut tally = |report: &MetricReport| match report.analysis.status {
            MetricStatus::Warning => warning_count += 1,
            MetricStatus::Danger => danger_count += 1,
            MetricStatus::Normal => {}
        };

        if let Some(metric) = Self::latest(pool, user_id, "blood_pressure").await? {
            if let MetricValue::BloodPressure { systolic, diastolic } = metric.value {
                let report = MetricReport {
                    latest: metric.value.clone(),
                    measured_at: metric.measured_at,
                    analysis: analyze_blood_pressure(systolic, diastolic),
                };
                tally(&report);
                metrics.blood_pressure = Some(report);
            }
        }

        if let Some(metric) = Self::latest(pool, user_id, "blood_sugar").await? {
            if let MetricValue::BloodSugar { mg_dl } = metric.value {
                // Readings carry no fasting flag; treated as fasting
                let report = MetricReport {
                    latest: metric.value.clone(),
                    measured_at: metric.measured_at,
                    analysis: analyze_blood_sugar(mg_dl, true),
                };
                tally(&report);
                metrics.blood_sugar = Some(report);
            }
        }

        if let Some(metric) = Self::latest(pool, user_id, "bmi").await? {
            if let MetricValue::Bmi { value } = metric.value {
                let report = MetricReport {
                    latest: metric.value.clone(),
                    measured_at: metric.measured_at,
                    analysis: analyze_bmi(value),
                };
                tally(&report);
                metrics.bmi = Some(report);
            }
        }

        if let Some(metric) = Self::latest(pool, user_id, "heart_rate").await? {
            if let MetricValue::HeartRate { bpm } = metric.value {
                let report = MetricReport {
                    latest: metric.value.clone(),
                    measured_at: metric.measured_at,
                    analysis: analyze_heart_rate(bpm),
                };
                tally(&report);
                metrics.heart_rate = Some(report);
            }
        }

        // Body fat analysis is gender-specific, so it is skipped for
        // accounts that never recorded a gender.
        if let Some(gender) = gender {
            if let Some(metric) = Self::latest(pool, user_id, "body_fat_percentage").await? {
                if let MetricValue::BodyFatPercentage { percentage } = metric.value {
                    let report = MetricReport {
                        latest: metric.value.clone(),
                        measured_at: metric.measured_at,
                        analysis: analyze_body_fat(percentage, gender),
                    };
                    tally(&report);
                    metrics.body_fat = Some(report);
                }
            }
        }

        let (overall_status, summary) = if danger_count > 0 {
            (
                MetricStatus::Danger,
                format!(
                    "{danger_count} critical metric{} need immediate attention. Please consult a healthcare provider.",
                    if danger_count > 1 { "s" } else { "" }
                ),
            )
        } else if warning_count > 0 {
            (
                MetricStatus::Warning,
                format!(
                    "{warning_count} metric{} need attention. Consider lifestyle modifications.",
                    if warning_count > 1 { "s" } else { "" }
                ),
            )
        } else {
            (
                MetricStatus::Normal,
                "All monitored metrics are in healthy ranges. Keep up the good work!".to_string(),
            )
        };

        Ok(HealthAnalysisResponse {
            analyzed_at: now,
            period: AnalysisPeriod {
                days,
                start: (now - Duration::days(days)).date_naive(),
                end: now.date_naive(),
            },
            metrics,
            overall_status,
            summary,
        })
    }

    /// Blood pressure detail: latest reading plus an optional trend over
    /// the requested window
    pub async fn blood_pressure(
        pool: &PgPool,
        user_id: Uuid,
        query: AnalysisQuery,
    ) -> Result<BloodPressureAnalysisResponse, ApiError> {
        let days = query.days.unwrap_or(DEFAULT_ANALYSIS_DAYS).max(1);

        let latest = Self::latest(pool, user_id, "blood_pressure")
            .await?
            .ok_or_else(|| ApiError::NotFound("No blood pressure data found".to_string()))?;

        let MetricValue::BloodPressure { systolic, diastolic } = latest.value else {
            return Err(ApiError::Internal(anyhow::anyhow!(
                "Stored blood pressure reading has the wrong shape"
            )));
        };

        let analysis = analyze_blood_pressure(systolic, diastolic);

        let trend = if query.include_history.unwrap_or(false) {
            let since = Utc::now() - Duration::days(days);
            let history = MetricRepository::history_since(pool, user_id, "blood_pressure", since)
                .await
                .map_err(ApiError::Internal)?
                .into_iter()
                .map(|r| r.into_metric())
                .collect::<Result<Vec<_>, _>>()
                .map_err(ApiError::Internal)?;

            let readings: Vec<(f64, f64)> = history
                .iter()
                .filter_map(|m| match m.value {
                    MetricValue::BloodPressure { systolic, diastolic } => {
                        Some((systolic, diastolic))
                    }
                    _ => None,
                })
                .collect();

            if readings.is_empty() {
                None
            } else {
                Some(BloodPressureTrend {
                    readings: readings.len(),
                    systolic: trend_stats(readings.iter().map(|(s, _)| *s)),
                    diastolic: trend_stats(readings.iter().map(|(_, d)| *d)),
                })
            }
        } else {
            None
        };

        Ok(BloodPressureAnalysisResponse {
            latest_reading: BloodPressureReading {
                systolic,
                diastolic,
                measured_at: latest.measured_at,
            },
            analysis,
            trend,
        })
    }

    async fn latest(
        pool: &PgPool,
        user_id: Uuid,
        metric_type: &str,
    ) -> Result<Option<HealthMetric>, ApiError> {
        let record: Option<MetricRecord> = MetricRepository::latest(pool, user_id, metric_type)
            .await
            .map_err(ApiError::Internal)?;

        record
            .map(|r| r.into_metric())
            .transpose()
            .map_err(ApiError::Internal)
    }
}

fn trend_stats(values: impl Iterator<Item = f64>) -> TrendStats {
    let collected: Vec<f64> = values.collect();
    let sum: f64 = collected.iter().sum();
    TrendStats {
        average: (sum / collected.len() as f64).round(),
        highest: collected.iter().cloned().fold(f64::MIN, f64::max),
        lowest: collected.iter().cloned().fold(f64::MAX, f64::min),
    }
}
