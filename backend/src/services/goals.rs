//! Goal service: creation, progress tracking, milestones, auto-completion
//!
//! Derived state (progress percentage, completion) is computed by pure
//! functions invoked from the mutation operations, then the whole goal is
//! persisted as one record. Side effects of a progress update (streaks,
//! badges) belong to the caller, not to this service.

use crate::error::ApiError;
use crate::repositories::{CreateGoal, GoalRepository, StreakRepository};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use vitatrack_shared::models::{Goal, GoalStatus, GoalType, Milestone, ProgressEntry};
use vitatrack_shared::types::{
    CreateGoalRequest, DashboardResponse, DashboardStats, GoalStats, GoalsListQuery,
    GoalsListResponse, ProgressHistoryResponse, StreakSummary, UpcomingMilestone,
};

/// Outcome of applying a progress update to a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressOutcome {
    /// Status flipped from active to completed during this update
    pub just_completed: bool,
}

/// Progress percentage for the given range, clamped to 0..=100.
/// Returns None when target equals start, leaving the stored value alone.
pub fn compute_progress(start_value: f64, target_value: f64, current_value: f64) -> Option<f64> {
    let total = target_value - start_value;
    if total == 0.0 {
        return None;
    }
    let pct = (current_value - start_value) / total * 100.0;
    Some(pct.clamp(0.0, 100.0))
}

/// Recompute derived goal state after a mutation of current/start/target.
/// Completion fires at most once: only an active goal can transition, and
/// the completed date is never overwritten afterwards.
pub fn recompute_derived_state(goal: &mut Goal, now: DateTime<Utc>) -> ProgressOutcome {
    if let Some(pct) = compute_progress(goal.start_value, goal.target_value, goal.current_value) {
        goal.progress_percentage = pct;
    }

    if goal.progress_percentage >= 100.0 && goal.status == GoalStatus::Active {
        goal.status = GoalStatus::Completed;
        goal.completed_date = Some(now);
        return ProgressOutcome { just_completed: true };
    }

    ProgressOutcome { just_completed: false }
}

/// Apply a progress update: record the history entry, move the current
/// value, sweep milestones, and recompute derived state.
pub fn apply_progress(
    goal: &mut Goal,
    new_value: f64,
    note: Option<String>,
    now: DateTime<Utc>,
) -> ProgressOutcome {
    goal.current_value = new_value;
    goal.progress_history.push(ProgressEntry {
        value: new_value,
        recorded_at: now,
        note,
    });

    // One-directional milestone sweep: achieved milestones stay achieved
    // even if the value later drops below their target.
    for milestone in goal.milestones.iter_mut() {
        if !milestone.achieved && goal.current_value >= milestone.target_value {
            milestone.achieved = true;
            milestone.achieved_date = Some(now);
        }
    }

    recompute_derived_state(goal, now)
}

/// Goal service
pub struct GoalService;

impl GoalService {
    /// Create a new goal
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        req: CreateGoalRequest,
    ) -> Result<Goal, ApiError> {
        let goal_type = req
            .goal_type
            .parse::<GoalType>()
            .map_err(|_| ApiError::Validation("Please specify a valid goal type".to_string()))?;

        if req.title.trim().is_empty() {
            return Err(ApiError::Validation("Please provide a goal title".to_string()));
        }

        let target_value = req
            .target_value
            .ok_or_else(|| ApiError::Validation("Please specify target value".to_string()))?;

        let unit = req
            .unit
            .ok_or_else(|| ApiError::Validation("Please specify unit".to_string()))?;

        let now = Utc::now();
        let target_date = req
            .target_date
            .ok_or_else(|| ApiError::Validation("Please specify target date".to_string()))?;
        if target_date <= now {
            return Err(ApiError::Validation(
                "Target date must be in the future".to_string(),
            ));
        }

        let current_value = req.current_value.unwrap_or(0.0);
        let start_value = req.start_value.unwrap_or(current_value);

        // Derived state is computed up front so the insert carries it;
        // a goal created already at target completes immediately.
        let mut status = GoalStatus::Active;
        let mut completed_date = None;
        let mut progress_percentage = 0.0;
        if let Some(pct) = compute_progress(start_value, target_value, current_value) {
            progress_percentage = pct;
            if pct >= 100.0 {
                status = GoalStatus::Completed;
                completed_date = Some(now);
            }
        }

        let record = GoalRepository::create(
            pool,
            CreateGoal {
                user_id,
                goal_type: goal_type.as_str().to_string(),
                title: req.title.trim().to_string(),
                description: req.description,
                target_value,
                start_value,
                current_value,
                unit,
                target_date,
                status: status.as_str().to_string(),
                progress_percentage,
                completed_date,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        record.into_goal().map_err(ApiError::Internal)
    }

    /// Load a goal and verify the caller owns it. A mismatched owner is
    /// Forbidden, not NotFound, and is checked before any body validation.
    pub async fn load_owned(pool: &PgPool, user_id: Uuid, goal_id: Uuid) -> Result<Goal, ApiError> {
        let record = GoalRepository::get_by_id(pool, goal_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Goal not found".to_string()))?;

        if record.user_id != user_id {
            return Err(ApiError::Forbidden(
                "Not authorized to access this goal".to_string(),
            ));
        }

        record.into_goal().map_err(ApiError::Internal)
    }

    /// List goals with optional status/type filters plus per-status stats
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        query: GoalsListQuery,
    ) -> Result<GoalsListResponse, ApiError> {
        if let Some(ref status) = query.status {
            status
                .parse::<GoalStatus>()
                .map_err(|_| ApiError::Validation("Invalid status filter".to_string()))?;
        }
        if let Some(ref goal_type) = query.goal_type {
            goal_type
                .parse::<GoalType>()
                .map_err(|_| ApiError::Validation("Invalid goal type filter".to_string()))?;
        }

        let records = GoalRepository::get_by_user(
            pool,
            user_id,
            query.status.as_deref(),
            query.goal_type.as_deref(),
        )
        .await
        .map_err(ApiError::Internal)?;

        let goals = records
            .into_iter()
            .map(|r| r.into_goal())
            .collect::<Result<Vec<_>, _>>()
            .map_err(ApiError::Internal)?;

        let stats = GoalStats {
            total: goals.len(),
            active: goals.iter().filter(|g| g.status == GoalStatus::Active).count(),
            completed: goals.iter().filter(|g| g.status == GoalStatus::Completed).count(),
            paused: goals.iter().filter(|g| g.status == GoalStatus::Paused).count(),
            abandoned: goals.iter().filter(|g| g.status == GoalStatus::Abandoned).count(),
        };

        Ok(GoalsListResponse {
            count: goals.len(),
            stats,
            goals,
        })
    }

    /// Record a progress update. Returns the updated goal plus whether
    /// this update completed it, for the caller's side-effect pass.
    pub async fn update_progress(
        pool: &PgPool,
        user_id: Uuid,
        goal_id: Uuid,
        current_value: Option<f64>,
        note: Option<String>,
    ) -> Result<(Goal, ProgressOutcome), ApiError> {
        let mut goal = Self::load_owned(pool, user_id, goal_id).await?;

        let new_value = current_value
            .ok_or_else(|| ApiError::Validation("Please provide current value".to_string()))?;

        let outcome = apply_progress(&mut goal, new_value, note, Utc::now());

        GoalRepository::save(pool, &goal)
            .await
            .map_err(ApiError::Internal)?;

        Ok((goal, outcome))
    }

    /// Append a milestone, pre-achieved if the current value already meets it
    pub async fn add_milestone(
        pool: &PgPool,
        user_id: Uuid,
        goal_id: Uuid,
        title: Option<String>,
        target_value: Option<f64>,
    ) -> Result<Goal, ApiError> {
        let mut goal = Self::load_owned(pool, user_id, goal_id).await?;

        let title = title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::Validation("Please provide title and target value".to_string()))?;
        let target_value = target_value
            .ok_or_else(|| ApiError::Validation("Please provide title and target value".to_string()))?;

        let achieved = goal.current_value >= target_value;
        goal.milestones.push(Milestone {
            title: title.trim().to_string(),
            target_value,
            achieved,
            achieved_date: achieved.then(Utc::now),
        });

        GoalRepository::save(pool, &goal)
            .await
            .map_err(ApiError::Internal)?;

        Ok(goal)
    }

    /// Direct status change, limited to active/paused/abandoned. Completion
    /// is only reachable through progress crossing 100%.
    pub async fn update_status(
        pool: &PgPool,
        user_id: Uuid,
        goal_id: Uuid,
        status: Option<String>,
    ) -> Result<Goal, ApiError> {
        let mut goal = Self::load_owned(pool, user_id, goal_id).await?;

        let status = status
            .as_deref()
            .and_then(|s| s.parse::<GoalStatus>().ok())
            .filter(|s| *s != GoalStatus::Completed)
            .ok_or_else(|| {
                ApiError::Validation(
                    "Please provide valid status (active, paused, abandoned)".to_string(),
                )
            })?;

        goal.status = status;

        GoalRepository::save(pool, &goal)
            .await
            .map_err(ApiError::Internal)?;

        Ok(goal)
    }

    /// Hard delete, owner only
    pub async fn delete(pool: &PgPool, user_id: Uuid, goal_id: Uuid) -> Result<(), ApiError> {
        Self::load_owned(pool, user_id, goal_id).await?;

        GoalRepository::delete(pool, goal_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(())
    }

    /// Progress history for one goal
    pub async fn progress_history(
        pool: &PgPool,
        user_id: Uuid,
        goal_id: Uuid,
    ) -> Result<ProgressHistoryResponse, ApiError> {
        let goal = Self::load_owned(pool, user_id, goal_id).await?;

        Ok(ProgressHistoryResponse {
            goal_id: goal.id.to_string(),
            title: goal.title,
            progress_history: goal.progress_history,
            current_progress: goal.progress_percentage,
        })
    }

    /// Dashboard summary: stats, top goals, upcoming milestones, streak
    pub async fn dashboard(pool: &PgPool, user_id: Uuid) -> Result<DashboardResponse, ApiError> {
        let records = GoalRepository::get_by_user(pool, user_id, None, None)
            .await
            .map_err(ApiError::Internal)?;

        let goals = records
            .into_iter()
            .map(|r| r.into_goal())
            .collect::<Result<Vec<_>, _>>()
            .map_err(ApiError::Internal)?;

        let now = Utc::now();
        let active: Vec<&Goal> = goals.iter().filter(|g| g.status == GoalStatus::Active).collect();
        let mut completed: Vec<&Goal> = goals
            .iter()
            .filter(|g| g.status == GoalStatus::Completed)
            .collect();
        completed.sort_by(|a, b| b.completed_date.cmp(&a.completed_date));

        let average_progress = if active.is_empty() {
            0.0
        } else {
            active.iter().map(|g| g.progress_percentage).sum::<f64>() / active.len() as f64
        };

        let stats = DashboardStats {
            total_goals: goals.len(),
            active_goals: active.len(),
            completed_goals: completed.len(),
            paused_goals: goals.iter().filter(|g| g.status == GoalStatus::Paused).count(),
            abandoned_goals: goals.iter().filter(|g| g.status == GoalStatus::Abandoned).count(),
            average_progress,
            goals_near_completion: active.iter().filter(|g| g.progress_percentage >= 80.0).count(),
            overdue_goals: active.iter().filter(|g| g.target_date < now).count(),
        };

        let mut upcoming_milestones = Vec::new();
        for goal in &active {
            for milestone in goal.milestones.iter().filter(|m| !m.achieved) {
                upcoming_milestones.push(UpcomingMilestone {
                    goal_id: goal.id.to_string(),
                    goal_title: goal.title.clone(),
                    milestone_title: milestone.title.clone(),
                    target_value: milestone.target_value,
                    current_value: goal.current_value,
                });
            }
        }
        upcoming_milestones.truncate(5);

        let streak = StreakRepository::get(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .map(|r| r.into_streak())
            .map(|s| StreakSummary {
                current_streak: s.current_streak.count,
                longest_streak: s.longest_streak.count,
                total_active_days: s.total_active_days,
            });

        Ok(DashboardResponse {
            stats,
            active_goals: active.iter().take(5).map(|g| (*g).clone()).collect(),
            recently_completed: completed.iter().take(3).map(|g| (*g).clone()).collect(),
            upcoming_milestones,
            streak,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn sample_goal(start: f64, target: f64, current: f64) -> Goal {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            goal_type: GoalType::WeightLoss,
            title: "Lose weight".to_string(),
            description: None,
            target_value: target,
            start_value: start,
            current_value: current,
            unit: "kg".to_string(),
            start_date: now,
            target_date: now + chrono::Duration::days(30),
            completed_date: None,
            status: GoalStatus::Active,
            progress_percentage: 0.0,
            milestones: Vec::new(),
            progress_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn progress_is_linear_between_start_and_target() {
        assert_eq!(compute_progress(0.0, 100.0, 50.0), Some(50.0));
        assert_eq!(compute_progress(0.0, 10.0, 10.0), Some(100.0));
        assert_eq!(compute_progress(80.0, 70.0, 75.0), Some(50.0));
    }

    #[test]
    fn progress_clamps_outside_the_range() {
        assert_eq!(compute_progress(0.0, 100.0, 150.0), Some(100.0));
        assert_eq!(compute_progress(0.0, 100.0, -10.0), Some(0.0));
    }

    #[test]
    fn progress_undefined_when_target_equals_start() {
        assert_eq!(compute_progress(5.0, 5.0, 7.0), None);
    }

    #[test]
    fn update_to_fifty_percent_keeps_goal_active() {
        let mut goal = sample_goal(0.0, 100.0, 0.0);
        let now = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap();

        let outcome = apply_progress(&mut goal, 50.0, None, now);

        assert!(!outcome.just_completed);
        assert_eq!(goal.progress_percentage, 50.0);
        assert_eq!(goal.status, GoalStatus::Active);
        assert_eq!(goal.progress_history.len(), 1);
        assert_eq!(goal.progress_history[0].value, 50.0);
    }

    #[test]
    fn reaching_target_completes_exactly_once() {
        let mut goal = sample_goal(0.0, 10.0, 0.0);
        let first = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();

        let outcome = apply_progress(&mut goal, 10.0, None, first);
        assert!(outcome.just_completed);
        assert_eq!(goal.status, GoalStatus::Completed);
        assert_eq!(goal.completed_date, Some(first));

        let outcome = apply_progress(&mut goal, 12.0, None, second);
        assert!(!outcome.just_completed);
        assert_eq!(goal.status, GoalStatus::Completed);
        assert_eq!(goal.completed_date, Some(first));
    }

    #[test]
    fn milestones_achieve_once_and_never_unachieve() {
        let mut goal = sample_goal(0.0, 100.0, 0.0);
        goal.milestones.push(Milestone {
            title: "Halfway".to_string(),
            target_value: 50.0,
            achieved: false,
            achieved_date: None,
        });
        let day1 = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();

        apply_progress(&mut goal, 60.0, None, day1);
        assert!(goal.milestones[0].achieved);
        assert_eq!(goal.milestones[0].achieved_date, Some(day1));

        // Regressing below the milestone target does not un-achieve it
        apply_progress(&mut goal, 40.0, None, day2);
        assert!(goal.milestones[0].achieved);
        assert_eq!(goal.milestones[0].achieved_date, Some(day1));
    }

    proptest! {
        #[test]
        fn progress_matches_clamped_linear_formula(
            start in -1000.0f64..1000.0,
            target in -1000.0f64..1000.0,
            current in -1000.0f64..1000.0,
        ) {
            prop_assume!((target - start).abs() > 1e-9);
            let pct = compute_progress(start, target, current).unwrap();
            let expected = (100.0 * (current - start) / (target - start)).clamp(0.0, 100.0);
            prop_assert!((pct - expected).abs() < 1e-9);
            prop_assert!((0.0..=100.0).contains(&pct));
        }
    }
}
