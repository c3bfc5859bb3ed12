//! Streak tracking: day-level continuity of user activity
//!
//! The continuity rule works on calendar days: a second activity on the
//! same day is a no-op, the next day extends the streak by one, and any
//! larger gap resets the current streak to one. The longest streak is a
//! high-water mark that a reset never lowers.

use crate::error::ApiError;
use crate::repositories::StreakRepository;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use vitatrack_shared::models::Streak;
use vitatrack_shared::types::StreakUpdateResult;

/// Day counts that earn a streak badge
pub const STREAK_MILESTONES: &[i32] = &[7, 14, 30, 60, 100, 180, 365];

/// Advance the streak state for an activity on `today`. Pure so that day
/// boundaries are testable without a clock.
pub fn advance(streak: &mut Streak, today: NaiveDate) -> StreakUpdateResult {
    match streak.current_streak.last_activity_date {
        None => {
            // First ever activity
            streak.current_streak.count = 1;
            streak.current_streak.start_date = Some(today);
            streak.current_streak.last_activity_date = Some(today);
            streak.total_active_days = 1;

            if streak.longest_streak.count == 0 {
                streak.longest_streak.count = 1;
                streak.longest_streak.start_date = Some(today);
                streak.longest_streak.end_date = Some(today);
            }

            result(streak, true)
        }
        Some(last) => {
            let day_gap = (today - last).num_days();

            if day_gap == 0 {
                // Already counted today
                result(streak, false)
            } else if day_gap == 1 {
                streak.current_streak.count += 1;
                streak.current_streak.last_activity_date = Some(today);
                streak.total_active_days += 1;

                if streak.current_streak.count > streak.longest_streak.count {
                    streak.longest_streak.count = streak.current_streak.count;
                    streak.longest_streak.start_date = streak.current_streak.start_date;
                    streak.longest_streak.end_date = Some(today);
                }

                result(streak, true)
            } else {
                // Streak broken; the longest streak keeps its record
                streak.current_streak.count = 1;
                streak.current_streak.start_date = Some(today);
                streak.current_streak.last_activity_date = Some(today);
                streak.total_active_days += 1;

                result(streak, true)
            }
        }
    }
}

fn result(streak: &Streak, updated: bool) -> StreakUpdateResult {
    StreakUpdateResult {
        streak_updated: updated,
        current_streak: streak.current_streak.count,
        longest_streak: streak.longest_streak.count,
        total_active_days: streak.total_active_days,
    }
}

/// The subset of badge-earning day counts equal to `streak_count`. At most
/// one element since the count is a single integer.
pub fn streak_milestones(streak_count: i32) -> Vec<i32> {
    STREAK_MILESTONES
        .iter()
        .copied()
        .filter(|m| *m == streak_count)
        .collect()
}

/// Streak service
pub struct StreakService;

impl StreakService {
    /// Load the user's streak, creating an empty one if absent
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<Streak, ApiError> {
        let record = StreakRepository::get_or_create(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(record.into_streak())
    }

    /// Run the continuity check for today and persist the outcome
    pub async fn check_and_update(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<(Streak, StreakUpdateResult), ApiError> {
        let mut streak = Self::get(pool, user_id).await?;

        let today = Utc::now().date_naive();
        let result = advance(&mut streak, today);

        if result.streak_updated {
            StreakRepository::save(pool, &streak)
                .await
                .map_err(ApiError::Internal)?;
        }

        Ok((streak, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use vitatrack_shared::models::{ActivityStreak, CurrentStreak, LongestStreak};

    fn empty_streak() -> Streak {
        Streak {
            user_id: Uuid::new_v4(),
            current_streak: CurrentStreak::default(),
            longest_streak: LongestStreak::default(),
            total_active_days: 0,
            exercise_streak: ActivityStreak::default(),
            meal_logging_streak: ActivityStreak::default(),
            goal_progress_streak: ActivityStreak::default(),
            updated_at: Utc::now(),
        }
    }

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(n)
    }

    #[test]
    fn first_activity_starts_the_streak() {
        let mut streak = empty_streak();

        let result = advance(&mut streak, day(0));

        assert!(result.streak_updated);
        assert_eq!(result.current_streak, 1);
        assert_eq!(result.longest_streak, 1);
        assert_eq!(result.total_active_days, 1);
        assert_eq!(streak.current_streak.start_date, Some(day(0)));
    }

    #[test]
    fn same_day_activity_is_idempotent() {
        let mut streak = empty_streak();
        advance(&mut streak, day(0));

        let result = advance(&mut streak, day(0));

        assert!(!result.streak_updated);
        assert_eq!(result.current_streak, 1);
        assert_eq!(result.total_active_days, 1);
    }

    #[test]
    fn consecutive_days_extend_the_streak() {
        let mut streak = empty_streak();
        advance(&mut streak, day(0));

        let result = advance(&mut streak, day(1));

        assert!(result.streak_updated);
        assert_eq!(result.current_streak, 2);
        assert_eq!(result.longest_streak, 2);
        assert_eq!(streak.longest_streak.start_date, Some(day(0)));
        assert_eq!(streak.longest_streak.end_date, Some(day(1)));
    }

    #[test]
    fn skipped_day_resets_current_but_keeps_longest() {
        let mut streak = empty_streak();
        advance(&mut streak, day(0));
        advance(&mut streak, day(1));

        // Day 2 skipped
        let result = advance(&mut streak, day(3));

        assert!(result.streak_updated);
        assert_eq!(result.current_streak, 1);
        assert_eq!(result.longest_streak, 2);
        assert_eq!(result.total_active_days, 3);
        assert_eq!(streak.current_streak.start_date, Some(day(3)));
    }

    #[test]
    fn milestone_match_is_exact_equality() {
        assert_eq!(streak_milestones(7), vec![7]);
        assert_eq!(streak_milestones(365), vec![365]);
        assert!(streak_milestones(8).is_empty());
        assert!(streak_milestones(0).is_empty());
    }

    proptest! {
        #[test]
        fn longest_streak_never_decreases(gaps in prop::collection::vec(0i64..4, 1..60)) {
            let mut streak = empty_streak();
            let mut current = day(0);
            let mut previous_longest = 0;

            for gap in gaps {
                current += chrono::Duration::days(gap);
                advance(&mut streak, current);
                prop_assert!(streak.longest_streak.count >= previous_longest);
                prop_assert!(streak.longest_streak.count >= streak.current_streak.count);
                previous_longest = streak.longest_streak.count;
            }
        }
    }
}
