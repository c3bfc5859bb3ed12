//! VitaTrack Shared Library
//!
//! This crate contains the data models, API types, and pure health-metric
//! interpreters shared between the backend and its clients.

pub mod health_analysis;
pub mod models;
pub mod types;

// Re-export commonly used items
pub use health_analysis::{MetricAnalysis, MetricStatus};
pub use models::{
    Achievement, BadgeTier, BadgeType, Gender, Goal, GoalStatus, GoalType, HealthMetric,
    MetricValue, Milestone, ProgressEntry, Streak, User,
};
