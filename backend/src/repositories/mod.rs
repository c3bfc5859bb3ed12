//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod achievements;
pub mod activity;
pub mod goals;
pub mod metrics;
pub mod streaks;
pub mod users;

pub use achievements::{AchievementRecord, AchievementRepository, NewAchievement};
pub use activity::{
    CreateExercise, CreateMeal, ExerciseRecord, ExerciseRepository, MealRecord, MealRepository,
};
pub use goals::{CreateGoal, GoalRecord, GoalRepository};
pub use metrics::{CreateMetric, MetricRecord, MetricRepository};
pub use streaks::{StreakRecord, StreakRepository};
pub use users::{UserRecord, UserRepository};
