//! API request and response types

use crate::health_analysis::{MetricAnalysis, MetricStatus};
use crate::models::{
    Achievement, BadgeTier, BadgeType, Goal, MetricValue, ProgressEntry, Streak,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Auth
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub gender: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Authenticated user profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Goals
// ============================================================================

/// Request to create a goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGoalRequest {
    pub goal_type: String,
    pub title: String,
    pub description: Option<String>,
    pub target_value: Option<f64>,
    pub start_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub target_date: Option<DateTime<Utc>>,
}

/// Request to record a goal progress update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProgressRequest {
    pub current_value: Option<f64>,
    pub note: Option<String>,
}

/// Request to add a milestone to a goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMilestoneRequest {
    pub title: Option<String>,
    pub target_value: Option<f64>,
}

/// Request to change a goal's status directly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateGoalStatusRequest {
    pub status: Option<String>,
}

/// Query parameters for listing goals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalsListQuery {
    pub status: Option<String>,
    pub goal_type: Option<String>,
}

/// Per-status goal counts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub paused: usize,
    pub abandoned: usize,
}

/// Goals list response with summary statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalsListResponse {
    pub count: usize,
    pub stats: GoalStats,
    pub goals: Vec<Goal>,
}

/// Result of a progress update, including side effects triggered by it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdateResponse {
    pub goal: Goal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak: Option<StreakUpdateResult>,
    pub new_badges: Vec<Achievement>,
}

/// Progress history for a goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressHistoryResponse {
    pub goal_id: String,
    pub title: String,
    pub progress_history: Vec<ProgressEntry>,
    pub current_progress: f64,
}

/// Milestone still ahead of the current value, surfaced on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingMilestone {
    pub goal_id: String,
    pub goal_title: String,
    pub milestone_title: String,
    pub target_value: f64,
    pub current_value: f64,
}

/// Aggregate statistics for the goals dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_goals: usize,
    pub active_goals: usize,
    pub completed_goals: usize,
    pub paused_goals: usize,
    pub abandoned_goals: usize,
    pub average_progress: f64,
    pub goals_near_completion: usize,
    pub overdue_goals: usize,
}

/// Condensed streak numbers for dashboard display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub total_active_days: i32,
}

/// Goals dashboard response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub active_goals: Vec<Goal>,
    pub recently_completed: Vec<Goal>,
    pub upcoming_milestones: Vec<UpcomingMilestone>,
    pub streak: Option<StreakSummary>,
}

// ============================================================================
// Streaks and achievements
// ============================================================================

/// Outcome of a streak continuity check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakUpdateResult {
    pub streak_updated: bool,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub total_active_days: i32,
}

/// Streak update response, bundling any badges the update earned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakUpdateResponse {
    pub streak: Streak,
    pub result: StreakUpdateResult,
    pub new_badges: Vec<Achievement>,
}

/// Query parameters for listing achievements
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AchievementsListQuery {
    pub badge_type: Option<String>,
    pub tier: Option<String>,
}

/// Achievements list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementsListResponse {
    pub count: usize,
    pub achievements: Vec<Achievement>,
}

/// Badge counts per tier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TierCounts {
    pub bronze: usize,
    pub silver: usize,
    pub gold: usize,
    pub platinum: usize,
    pub diamond: usize,
}

/// Achievement statistics response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementStatsResponse {
    pub total: usize,
    pub by_type: std::collections::BTreeMap<String, usize>,
    pub by_tier: TierCounts,
    pub recent: Vec<Achievement>,
}

/// Badges awarded by a sweep of the cumulative criteria
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeCheckResponse {
    pub new_badges: Vec<Achievement>,
    pub count: usize,
}

/// One entry in the catalog of obtainable badges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableBadge {
    pub badge_id: String,
    pub badge_type: BadgeType,
    pub name: String,
    pub icon: String,
    pub tier: BadgeTier,
    pub criteria_value: f64,
    pub earned: bool,
}

/// Catalog of all obtainable badges with earned flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableBadgesResponse {
    pub total: usize,
    pub earned: usize,
    pub remaining: usize,
    pub badges: Vec<AvailableBadge>,
}

// ============================================================================
// Activity logs
// ============================================================================

/// Logged exercise session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub duration_minutes: Option<i32>,
    pub calories_burned: Option<f64>,
    pub performed_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Logged meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub meal_type: Option<String>,
    pub calories: Option<f64>,
    pub consumed_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Request to log an exercise session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogExerciseRequest {
    pub name: Option<String>,
    pub duration_minutes: Option<i32>,
    pub calories_burned: Option<f64>,
    pub performed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Request to log a meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogMealRequest {
    pub name: Option<String>,
    pub meal_type: Option<String>,
    pub calories: Option<f64>,
    pub consumed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Response to an activity log, bundling any count-milestone badges the
/// new entry earned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogActivityResponse<T> {
    pub entry: T,
    pub new_badges: Vec<Achievement>,
}

/// Query parameters filtering activity logs by date range
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityListQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// ============================================================================
// Health metrics and analysis
// ============================================================================

/// Request to record a health metric reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogMetricRequest {
    #[serde(flatten)]
    pub value: MetricValue,
    pub note: Option<String>,
    pub measured_at: Option<DateTime<Utc>>,
}

/// Query parameters for listing metric readings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsListQuery {
    pub metric_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Query parameters for the analysis endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisQuery {
    pub days: Option<i64>,
    pub include_history: Option<bool>,
}

/// Date window an analysis covers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisPeriod {
    pub days: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Interpretation of the latest reading for one metric type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricReport {
    pub latest: MetricValue,
    pub measured_at: DateTime<Utc>,
    #[serde(flatten)]
    pub analysis: MetricAnalysis,
}

/// Per-metric reports included in the aggregate analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<MetricReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_sugar: Option<MetricReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<MetricReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<MetricReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat: Option<MetricReport>,
}

/// Aggregate health analysis response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthAnalysisResponse {
    pub analyzed_at: DateTime<Utc>,
    pub period: AnalysisPeriod,
    pub metrics: AnalysisMetrics,
    pub overall_status: MetricStatus,
    pub summary: String,
}

/// Min/avg/max over a series of readings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendStats {
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
}

/// Blood pressure trend over the requested window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodPressureTrend {
    pub readings: usize,
    pub systolic: TrendStats,
    pub diastolic: TrendStats,
}

/// Latest blood pressure reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodPressureReading {
    pub systolic: f64,
    pub diastolic: f64,
    pub measured_at: DateTime<Utc>,
}

/// Blood pressure detail response with optional trend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodPressureAnalysisResponse {
    pub latest_reading: BloodPressureReading,
    #[serde(flatten)]
    pub analysis: MetricAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<BloodPressureTrend>,
}
