//! Property-based tests for goal progress and streak continuity
//!
//! These exercise the pure transition functions behind the progress
//! endpoint: the clamped progress formula, one-shot auto-completion, and
//! the day-gap streak rules that the update handler chains together.

#[cfg(test)]
mod tests {
    use crate::services::goals::{apply_progress, compute_progress};
    use crate::services::streaks::{advance, streak_milestones};
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use proptest::prelude::*;
    use uuid::Uuid;
    use vitatrack_shared::models::{
        ActivityStreak, CurrentStreak, Goal, GoalStatus, GoalType, LongestStreak, Streak,
    };

    fn goal(start: f64, target: f64) -> Goal {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            goal_type: GoalType::DistanceRunning,
            title: "Run 100km".to_string(),
            description: None,
            target_value: target,
            start_value: start,
            current_value: start,
            unit: "km".to_string(),
            start_date: now,
            target_date: now + Duration::days(30),
            completed_date: None,
            status: GoalStatus::Active,
            progress_percentage: 0.0,
            milestones: Vec::new(),
            progress_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn streak() -> Streak {
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

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn fifty_then_hundred_completes_with_date() {
        let mut g = goal(0.0, 100.0);

        let outcome = apply_progress(&mut g, 50.0, None, at(2));
        assert!(!outcome.just_completed);
        assert_eq!(g.progress_percentage, 50.0);
        assert_eq!(g.status, GoalStatus::Active);

        let outcome = apply_progress(&mut g, 100.0, None, at(3));
        assert!(outcome.just_completed);
        assert_eq!(g.progress_percentage, 100.0);
        assert_eq!(g.status, GoalStatus::Completed);
        assert_eq!(g.completed_date, Some(at(3)));
    }

    #[test]
    fn history_records_every_update_in_order() {
        let mut g = goal(0.0, 10.0);
        apply_progress(&mut g, 2.0, Some("warmup".to_string()), at(2));
        apply_progress(&mut g, 5.0, None, at(3));
        apply_progress(&mut g, 9.0, None, at(4));

        let values: Vec<f64> = g.progress_history.iter().map(|e| e.value).collect();
        assert_eq!(values, vec![2.0, 5.0, 9.0]);
        assert_eq!(g.progress_history[0].note.as_deref(), Some("warmup"));
    }

    #[test]
    fn streak_day_scenario_matches_gap_rules() {
        let mut s = streak();
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        assert_eq!(advance(&mut s, d).current_streak, 1);
        assert_eq!(advance(&mut s, d + Duration::days(1)).current_streak, 2);

        // Day 3 skipped: reset to 1, record of 2 survives
        let after_gap = advance(&mut s, d + Duration::days(3));
        assert_eq!(after_gap.current_streak, 1);
        assert_eq!(after_gap.longest_streak, 2);
    }

    #[test]
    fn week_long_streak_lands_on_the_first_badge_milestone() {
        let mut s = streak();
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let mut last = advance(&mut s, d);
        for i in 1..7 {
            last = advance(&mut s, d + Duration::days(i));
        }

        assert_eq!(last.current_streak, 7);
        assert_eq!(streak_milestones(last.current_streak), vec![7]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Progress stays within 0..=100 for any update sequence
        #[test]
        fn prop_progress_always_clamped(
            updates in prop::collection::vec(-500.0f64..500.0, 1..20)
        ) {
            let mut g = goal(0.0, 100.0);
            for (i, value) in updates.into_iter().enumerate() {
                apply_progress(&mut g, value, None, at(2) + Duration::hours(i as i64));
                prop_assert!((0.0..=100.0).contains(&g.progress_percentage));
            }
        }

        /// Once completed, the completion date never moves
        #[test]
        fn prop_completion_date_is_stable(
            tail in prop::collection::vec(-500.0f64..500.0, 1..10)
        ) {
            let mut g = goal(0.0, 100.0);
            apply_progress(&mut g, 150.0, None, at(2));
            prop_assert_eq!(g.status, GoalStatus::Completed);
            let completed = g.completed_date;

            for (i, value) in tail.into_iter().enumerate() {
                apply_progress(&mut g, value, None, at(3) + Duration::hours(i as i64));
                prop_assert_eq!(g.status, GoalStatus::Completed);
                prop_assert_eq!(g.completed_date, completed);
            }
        }

        /// The linear formula holds wherever it is defined
        #[test]
        fn prop_progress_formula(
            start in -100.0f64..100.0,
            delta in 0.5f64..100.0,
            current in -100.0f64..300.0,
        ) {
            let target = start + delta;
            let pct = compute_progress(start, target, current).unwrap();
            let expected = (100.0 * (current - start) / delta).clamp(0.0, 100.0);
            prop_assert!((pct - expected).abs() < 1e-9);
        }
    }
}
