//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the pure domain functions.

pub mod achievements;
pub mod activity;
pub mod analysis;
pub mod goals;
pub mod streaks;
pub mod users;

pub use achievements::AchievementService;
pub use activity::ActivityService;
pub use analysis::MetricService;
pub use goals::GoalService;
pub use streaks::StreakService;
pub use users::UserService;
