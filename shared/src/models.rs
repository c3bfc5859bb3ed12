//! Data models for the VitaTrack application

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub gender: Option<Gender>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Gender, used only for gender-specific health analysis (body fat tables)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(()),
        }
    }
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

// ============================================================================
// Goals
// ============================================================================

/// Goal category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    WeightLoss,
    WeightGain,
    MuscleGain,
    BodyFatReduction,
    DistanceRunning,
    ExerciseDuration,
    ExerciseFrequency,
    StepsDaily,
    WaterIntake,
    SleepHours,
    CalorieIntake,
    StrengthMilestone,
    Custom,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::WeightLoss => "weight_loss",
            GoalType::WeightGain => "weight_gain",
            GoalType::MuscleGain => "muscle_gain",
            GoalType::BodyFatReduction => "body_fat_reduction",
            GoalType::DistanceRunning => "distance_running",
            GoalType::ExerciseDuration => "exercise_duration",
            GoalType::ExerciseFrequency => "exercise_frequency",
            GoalType::StepsDaily => "steps_daily",
            GoalType::WaterIntake => "water_intake",
            GoalType::SleepHours => "sleep_hours",
            GoalType::CalorieIntake => "calorie_intake",
            GoalType::StrengthMilestone => "strength_milestone",
            GoalType::Custom => "custom",
        }
    }
}

impl FromStr for GoalType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weight_loss" => Ok(GoalType::WeightLoss),
            "weight_gain" => Ok(GoalType::WeightGain),
            "muscle_gain" => Ok(GoalType::MuscleGain),
            "body_fat_reduction" => Ok(GoalType::BodyFatReduction),
            "distance_running" => Ok(GoalType::DistanceRunning),
            "exercise_duration" => Ok(GoalType::ExerciseDuration),
            "exercise_frequency" => Ok(GoalType::ExerciseFrequency),
            "steps_daily" => Ok(GoalType::StepsDaily),
            "water_intake" => Ok(GoalType::WaterIntake),
            "sleep_hours" => Ok(GoalType::SleepHours),
            "calorie_intake" => Ok(GoalType::CalorieIntake),
            "strength_milestone" => Ok(GoalType::StrengthMilestone),
            "custom" => Ok(GoalType::Custom),
            _ => Err(()),
        }
    }
}

/// Goal lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Paused,
    Abandoned,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
            GoalStatus::Paused => "paused",
            GoalStatus::Abandoned => "abandoned",
        }
    }
}

impl FromStr for GoalStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(GoalStatus::Active),
            "completed" => Ok(GoalStatus::Completed),
            "paused" => Ok(GoalStatus::Paused),
            "abandoned" => Ok(GoalStatus::Abandoned),
            _ => Err(()),
        }
    }
}

/// Sub-target within a goal's progress range, embedded in the goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    pub target_value: f64,
    pub achieved: bool,
    pub achieved_date: Option<DateTime<Utc>>,
}

/// Snapshot of a progress update, embedded in the goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Fitness goal with embedded milestones and progress history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_type: GoalType,
    pub title: String,
    pub description: Option<String>,
    pub target_value: f64,
    pub start_value: f64,
    pub current_value: f64,
    pub unit: String,
    pub start_date: DateTime<Utc>,
    pub target_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub status: GoalStatus,
    pub progress_percentage: f64,
    pub milestones: Vec<Milestone>,
    pub progress_history: Vec<ProgressEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Streaks
// ============================================================================

/// Running streak window (count plus the dates that bound it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CurrentStreak {
    pub count: i32,
    pub start_date: Option<NaiveDate>,
    pub last_activity_date: Option<NaiveDate>,
}

/// Best historical streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LongestStreak {
    pub count: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Per-activity streak counters, stored but not driven by the core
/// continuity check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivityStreak {
    pub current: i32,
    pub longest: i32,
    pub last_date: Option<NaiveDate>,
}

/// Per-user activity streak record, created lazily on first activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Streak {
    pub user_id: Uuid,
    pub current_streak: CurrentStreak,
    pub longest_streak: LongestStreak,
    pub total_active_days: i32,
    pub exercise_streak: ActivityStreak,
    pub meal_logging_streak: ActivityStreak,
    pub goal_progress_streak: ActivityStreak,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Achievements
// ============================================================================

/// Badge rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl BadgeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeTier::Bronze => "bronze",
            BadgeTier::Silver => "silver",
            BadgeTier::Gold => "gold",
            BadgeTier::Platinum => "platinum",
            BadgeTier::Diamond => "diamond",
        }
    }
}

impl FromStr for BadgeTier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bronze" => Ok(BadgeTier::Bronze),
            "silver" => Ok(BadgeTier::Silver),
            "gold" => Ok(BadgeTier::Gold),
            "platinum" => Ok(BadgeTier::Platinum),
            "diamond" => Ok(BadgeTier::Diamond),
            _ => Err(()),
        }
    }
}

/// Badge category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeType {
    StreakMilestone,
    GoalCompletion,
    ExerciseMilestone,
    MealMilestone,
    EarlyBird,
    FirstAchievement,
    Perfectionist,
    Custom,
}

impl BadgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeType::StreakMilestone => "streak_milestone",
            BadgeType::GoalCompletion => "goal_completion",
            BadgeType::ExerciseMilestone => "exercise_milestone",
            BadgeType::MealMilestone => "meal_milestone",
            BadgeType::EarlyBird => "early_bird",
            BadgeType::FirstAchievement => "first_achievement",
            BadgeType::Perfectionist => "perfectionist",
            BadgeType::Custom => "custom",
        }
    }
}

impl FromStr for BadgeType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "streak_milestone" => Ok(BadgeType::StreakMilestone),
            "goal_completion" => Ok(BadgeType::GoalCompletion),
            "exercise_milestone" => Ok(BadgeType::ExerciseMilestone),
            "meal_milestone" => Ok(BadgeType::MealMilestone),
            "early_bird" => Ok(BadgeType::EarlyBird),
            "first_achievement" => Ok(BadgeType::FirstAchievement),
            "perfectionist" => Ok(BadgeType::Perfectionist),
            "custom" => Ok(BadgeType::Custom),
            _ => Err(()),
        }
    }
}

/// One-time badge award. Unique per (user, badge_id); never mutated after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: Uuid,
    pub user_id: Uuid,
    pub badge_id: String,
    pub badge_type: BadgeType,
    pub name: String,
    pub description: Option<String>,
    pub icon: String,
    pub tier: BadgeTier,
    pub criteria_value: f64,
    pub earned_at: DateTime<Utc>,
    pub related_goal_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_data: Option<serde_json::Value>,
    pub is_visible: bool,
    pub is_featured: bool,
}

// ============================================================================
// Health metrics
// ============================================================================

/// Measured health metric value, tagged by metric type. Each variant
/// carries its own required numeric fields, so shape is validated at
/// deserialization rather than checked at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "metric_type", content = "value", rename_all = "snake_case")]
pub enum MetricValue {
    BloodPressure {
        systolic: f64,
        diastolic: f64,
    },
    HeartRate {
        bpm: f64,
    },
    Weight {
        kg: f64,
    },
    BloodSugar {
        #[serde(rename = "mg_dL")]
        mg_dl: f64,
    },
    Steps {
        count: f64,
    },
    SleepHours {
        hours: f64,
    },
    WaterIntake {
        glasses: f64,
    },
    BodyFatPercentage {
        percentage: f64,
    },
    MuscleMass {
        kg: f64,
    },
    Bmi {
        value: f64,
    },
}

impl MetricValue {
    /// Storage key for this metric type
    pub fn metric_type(&self) -> &'static str {
        match self {
            MetricValue::BloodPressure { .. } => "blood_pressure",
            MetricValue::HeartRate { .. } => "heart_rate",
            MetricValue::Weight { .. } => "weight",
            MetricValue::BloodSugar { .. } => "blood_sugar",
            MetricValue::Steps { .. } => "steps",
            MetricValue::SleepHours { .. } => "sleep_hours",
            MetricValue::WaterIntake { .. } => "water_intake",
            MetricValue::BodyFatPercentage { .. } => "body_fat_percentage",
            MetricValue::MuscleMass { .. } => "muscle_mass",
            MetricValue::Bmi { .. } => "bmi",
        }
    }
}

/// Persisted health metric reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMetric {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub value: MetricValue,
    pub note: Option<String>,
    pub measured_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_value_round_trips_with_tagged_shape() {
        let json = serde_json::json!({
            "metric_type": "blood_pressure",
            "value": { "systolic": 120.0, "diastolic": 80.0 }
        });
        let value: MetricValue = serde_json::from_value(json).unwrap();
        assert_eq!(
            value,
            MetricValue::BloodPressure { systolic: 120.0, diastolic: 80.0 }
        );
        assert_eq!(value.metric_type(), "blood_pressure");
    }

    #[test]
    fn metric_value_rejects_missing_fields() {
        let json = serde_json::json!({
            "metric_type": "blood_pressure",
            "value": { "systolic": 120.0 }
        });
        assert!(serde_json::from_value::<MetricValue>(json).is_err());
    }

    #[test]
    fn blood_sugar_uses_mg_dl_field_name() {
        let json = serde_json::json!({
            "metric_type": "blood_sugar",
            "value": { "mg_dL": 95.0 }
        });
        let value: MetricValue = serde_json::from_value(json).unwrap();
        assert_eq!(value, MetricValue::BloodSugar { mg_dl: 95.0 });
    }

    #[test]
    fn goal_status_parses_all_variants() {
        for status in ["active", "completed", "paused", "abandoned"] {
            assert_eq!(status.parse::<GoalStatus>().unwrap().as_str(), status);
        }
        assert!("finished".parse::<GoalStatus>().is_err());
    }

    #[test]
    fn badge_tier_ordering_matches_prestige() {
        assert!(BadgeTier::Bronze < BadgeTier::Silver);
        assert!(BadgeTier::Platinum < BadgeTier::Diamond);
    }
}
