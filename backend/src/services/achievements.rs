//! Achievement issuing: badge catalog, criteria evaluation, idempotent awards
//!
//! Every award path goes through the insert-ignore-duplicate repository
//! call, so the (user, badge id) uniqueness holds even under concurrent
//! checks.

use crate::error::ApiError;
use crate::repositories::{
    AchievementRepository, ExerciseRepository, GoalRepository, MealRepository, NewAchievement,
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;
use vitatrack_shared::models::{Achievement, BadgeTier, BadgeType, Goal, GoalStatus};
use vitatrack_shared::types::{
    AchievementStatsResponse, AchievementsListQuery, AchievementsListResponse, AvailableBadge,
    AvailableBadgesResponse, TierCounts,
};

/// Cumulative exercise counts that earn a badge
pub const EXERCISE_MILESTONES: &[i64] = &[10, 50, 100, 250, 500];

/// Cumulative meal counts that earn a badge
pub const MEAL_MILESTONES: &[i64] = &[50, 100, 250, 500, 1000];

struct StreakBadgeDef {
    days: i32,
    name: &'static str,
    tier: BadgeTier,
    icon: &'static str,
}

const STREAK_BADGES: &[StreakBadgeDef] = &[
    StreakBadgeDef { days: 7, name: "Week Warrior", tier: BadgeTier::Bronze, icon: "🔥" },
    StreakBadgeDef { days: 14, name: "Two Week Champion", tier: BadgeTier::Silver, icon: "🌟" },
    StreakBadgeDef { days: 30, name: "Monthly Master", tier: BadgeTier::Gold, icon: "🏆" },
    StreakBadgeDef { days: 60, name: "Two Month Hero", tier: BadgeTier::Gold, icon: "💎" },
    StreakBadgeDef { days: 100, name: "Century Club", tier: BadgeTier::Platinum, icon: "👑" },
    StreakBadgeDef { days: 180, name: "Half Year Legend", tier: BadgeTier::Platinum, icon: "🎖️" },
    StreakBadgeDef { days: 365, name: "Year Long Champion", tier: BadgeTier::Diamond, icon: "🌠" },
];

/// Tier for a cumulative count milestone
pub fn tier_for_count(count: i64) -> BadgeTier {
    if count >= 500 {
        BadgeTier::Diamond
    } else if count >= 250 {
        BadgeTier::Platinum
    } else if count >= 100 {
        BadgeTier::Gold
    } else if count >= 50 {
        BadgeTier::Silver
    } else {
        BadgeTier::Bronze
    }
}

/// Whether every goal in the set is at or above its time-linear expected
/// progress (elapsed/total days × 100). Requires at least one goal.
pub fn all_on_track(goals: &[Goal], now: DateTime<Utc>) -> bool {
    !goals.is_empty()
        && goals.iter().all(|goal| {
            let elapsed = (now - goal.start_date).num_seconds() as f64 / 86_400.0;
            let total = (goal.target_date - goal.start_date).num_seconds() as f64 / 86_400.0;
            if total <= 0.0 {
                return false;
            }
            let expected = elapsed / total * 100.0;
            goal.progress_percentage >= expected
        })
}

/// Achievement service
pub struct AchievementService;

impl AchievementService {
    /// List the user's earned achievements with optional filters
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        query: AchievementsListQuery,
    ) -> Result<AchievementsListResponse, ApiError> {
        let badge_type = match query.badge_type.as_deref() {
            Some(s) => Some(
                s.parse::<BadgeType>()
                    .map_err(|_| ApiError::Validation("Invalid badge type filter".to_string()))?,
            ),
            None => None,
        };
        let tier = match query.tier.as_deref() {
            Some(s) => Some(
                s.parse::<BadgeTier>()
                    .map_err(|_| ApiError::Validation("Invalid tier filter".to_string()))?,
            ),
            None => None,
        };

        let achievements = AchievementRepository::get_by_user(pool, user_id, badge_type, tier)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(|r| r.into_achievement())
            .collect::<Result<Vec<_>, _>>()
            .map_err(ApiError::Internal)?;

        Ok(AchievementsListResponse {
            count: achievements.len(),
            achievements,
        })
    }

    /// Totals by type and tier plus the five most recent awards
    pub async fn stats(pool: &PgPool, user_id: Uuid) -> Result<AchievementStatsResponse, ApiError> {
        let achievements = AchievementRepository::get_by_user(pool, user_id, None, None)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(|r| r.into_achievement())
            .collect::<Result<Vec<_>, _>>()
            .map_err(ApiError::Internal)?;

        let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_tier = TierCounts::default();
        for achievement in &achievements {
            *by_type
                .entry(achievement.badge_type.as_str().to_string())
                .or_default() += 1;
            match achievement.tier {
                BadgeTier::Bronze => by_tier.bronze += 1,
                BadgeTier::Silver => by_tier.silver += 1,
                BadgeTier::Gold => by_tier.gold += 1,
                BadgeTier::Platinum => by_tier.platinum += 1,
                BadgeTier::Diamond => by_tier.diamond += 1,
            }
        }

        // Listing is already newest first
        let recent = achievements.iter().take(5).cloned().collect();

        Ok(AchievementStatsResponse {
            total: achievements.len(),
            by_type,
            by_tier,
            recent,
        })
    }

    /// Delete an achievement, owner only
    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let record = AchievementRepository::get_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Achievement not found".to_string()))?;

        if record.user_id != user_id {
            return Err(ApiError::Forbidden(
                "Not authorized to delete this achievement".to_string(),
            ));
        }

        AchievementRepository::delete(pool, id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(())
    }

    /// Award the badge for a freshly reached streak day count, if any.
    /// Re-awards are silent no-ops.
    pub async fn award_streak_badges(
        pool: &PgPool,
        user_id: Uuid,
        milestones: &[i32],
    ) -> Result<Vec<Achievement>, ApiError> {
        let mut new_badges = Vec::new();

        for milestone in milestones {
            let Some(def) = STREAK_BADGES.iter().find(|d| d.days == *milestone) else {
                continue;
            };

            let awarded = Self::award_if_absent(
                pool,
                NewAchievement {
                    user_id,
                    badge_id: format!("streak_{}", def.days),
                    badge_type: BadgeType::StreakMilestone,
                    name: def.name.to_string(),
                    description: Some(format!("Maintained a {}-day activity streak", def.days)),
                    icon: def.icon.to_string(),
                    tier: def.tier,
                    criteria_value: def.days as f64,
                    related_goal_id: None,
                    related_data: None,
                },
            )
            .await?;

            if let Some(badge) = awarded {
                new_badges.push(badge);
            }
        }

        Ok(new_badges)
    }

    /// Award the one-per-goal completion badge. Safe to call twice for the
    /// same completion; the second call finds the badge present.
    pub async fn award_goal_completion(
        pool: &PgPool,
        user_id: Uuid,
        goal: &Goal,
    ) -> Result<Option<Achievement>, ApiError> {
        Self::award_if_absent(
            pool,
            NewAchievement {
                user_id,
                badge_id: format!("goal_completed_{}", goal.id),
                badge_type: BadgeType::GoalCompletion,
                name: format!("{} - Completed!", goal.title),
                description: Some(format!("Successfully completed the goal: {}", goal.title)),
                icon: "🎯".to_string(),
                tier: BadgeTier::Gold,
                criteria_value: goal.target_value,
                related_goal_id: Some(goal.id),
                related_data: None,
            },
        )
        .await
    }

    /// Exercise count badge for a total that just landed exactly on a
    /// milestone. Counts that jump past a milestone never earn it.
    pub async fn award_exercise_milestone(
        pool: &PgPool,
        user_id: Uuid,
        total: i64,
    ) -> Result<Option<Achievement>, ApiError> {
        if !EXERCISE_MILESTONES.contains(&total) {
            return Ok(None);
        }

        Self::award_if_absent(
            pool,
            NewAchievement {
                user_id,
                badge_id: format!("exercise_{total}"),
                badge_type: BadgeType::ExerciseMilestone,
                name: format!("{total} Workouts"),
                description: Some(format!("Logged {total} exercise sessions")),
                icon: "💪".to_string(),
                tier: tier_for_count(total),
                criteria_value: total as f64,
                related_goal_id: None,
                related_data: None,
            },
        )
        .await
    }

    /// Meal count badge, same exact-equality rule as exercises
    pub async fn award_meal_milestone(
        pool: &PgPool,
        user_id: Uuid,
        total: i64,
    ) -> Result<Option<Achievement>, ApiError> {
        if !MEAL_MILESTONES.contains(&total) {
            return Ok(None);
        }

        Self::award_if_absent(
            pool,
            NewAchievement {
                user_id,
                badge_id: format!("meal_{total}"),
                badge_type: BadgeType::MealMilestone,
                name: format!("{total} Meals Logged"),
                description: Some(format!("Tracked {total} meals")),
                icon: "🍽️".to_string(),
                tier: tier_for_count(total),
                criteria_value: total as f64,
                related_goal_id: None,
                related_data: None,
            },
        )
        .await
    }

    /// Full sweep of the cumulative and special badge criteria
    pub async fn check_and_award(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<Achievement>, ApiError> {
        let mut new_badges = Vec::new();

        // First completed goal
        let completed = GoalRepository::count_by_status(pool, user_id, GoalStatus::Completed.as_str())
            .await
            .map_err(ApiError::Internal)?;
        if completed == 1 {
            let badge = Self::award_if_absent(
                pool,
                NewAchievement {
                    user_id,
                    badge_id: "first_goal".to_string(),
                    badge_type: BadgeType::FirstAchievement,
                    name: "First Goal Achieved".to_string(),
                    description: Some("Completed your first fitness goal".to_string()),
                    icon: "🎉".to_string(),
                    tier: BadgeTier::Bronze,
                    criteria_value: 1.0,
                    related_goal_id: None,
                    related_data: None,
                },
            )
            .await?;
            new_badges.extend(badge);
        }

        // Exercise and meal count milestones, exact equality
        let total_exercises = ExerciseRepository::count_for_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        new_badges.extend(Self::award_exercise_milestone(pool, user_id, total_exercises).await?);

        let total_meals = MealRepository::count_for_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        new_badges.extend(Self::award_meal_milestone(pool, user_id, total_meals).await?);

        // Early bird: seven workouts before 8 AM today
        let today = Utc::now().date_naive();
        let early = ExerciseRepository::count_early_morning(pool, user_id, today)
            .await
            .map_err(ApiError::Internal)?;
        if early >= 7 {
            let badge = Self::award_if_absent(
                pool,
                NewAchievement {
                    user_id,
                    badge_id: "early_bird".to_string(),
                    badge_type: BadgeType::EarlyBird,
                    name: "Early Bird".to_string(),
                    description: Some("Exercised before 8 AM for 7 days".to_string()),
                    icon: "🌅".to_string(),
                    tier: BadgeTier::Silver,
                    criteria_value: 7.0,
                    related_goal_id: None,
                    related_data: None,
                },
            )
            .await?;
            new_badges.extend(badge);
        }

        // Perfectionist: three or more active goals, all on schedule
        let active_goals = GoalRepository::get_by_user(
            pool,
            user_id,
            Some(GoalStatus::Active.as_str()),
            None,
        )
        .await
        .map_err(ApiError::Internal)?
        .into_iter()
        .map(|r| r.into_goal())
        .collect::<Result<Vec<_>, _>>()
        .map_err(ApiError::Internal)?;

        if active_goals.len() >= 3 && all_on_track(&active_goals, Utc::now()) {
            let badge = Self::award_if_absent(
                pool,
                NewAchievement {
                    user_id,
                    badge_id: "perfectionist".to_string(),
                    badge_type: BadgeType::Perfectionist,
                    name: "Perfectionist".to_string(),
                    description: Some("All goals on track or ahead".to_string()),
                    icon: "✨".to_string(),
                    tier: BadgeTier::Gold,
                    criteria_value: active_goals.len() as f64,
                    related_goal_id: None,
                    related_data: None,
                },
            )
            .await?;
            new_badges.extend(badge);
        }

        Ok(new_badges)
    }

    /// The full catalog of obtainable badges with per-user earned flags
    pub async fn available_badges(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<AvailableBadgesResponse, ApiError> {
        let mut catalog = Vec::new();

        for def in STREAK_BADGES {
            catalog.push(AvailableBadge {
                badge_id: format!("streak_{}", def.days),
                badge_type: BadgeType::StreakMilestone,
                name: def.name.to_string(),
                icon: def.icon.to_string(),
                tier: def.tier,
                criteria_value: def.days as f64,
                earned: false,
            });
        }
        for milestone in EXERCISE_MILESTONES {
            catalog.push(AvailableBadge {
                badge_id: format!("exercise_{milestone}"),
                badge_type: BadgeType::ExerciseMilestone,
                name: format!("{milestone} Workouts"),
                icon: "💪".to_string(),
                tier: tier_for_count(*milestone),
                criteria_value: *milestone as f64,
                earned: false,
            });
        }
        for milestone in MEAL_MILESTONES {
            catalog.push(AvailableBadge {
                badge_id: format!("meal_{milestone}"),
                badge_type: BadgeType::MealMilestone,
                name: format!("{milestone} Meals Logged"),
                icon: "🍽️".to_string(),
                tier: tier_for_count(*milestone),
                criteria_value: *milestone as f64,
                earned: false,
            });
        }
        catalog.push(AvailableBadge {
            badge_id: "first_goal".to_string(),
            badge_type: BadgeType::FirstAchievement,
            name: "First Goal Achieved".to_string(),
            icon: "🎉".to_string(),
            tier: BadgeTier::Bronze,
            criteria_value: 1.0,
            earned: false,
        });
        catalog.push(AvailableBadge {
            badge_id: "early_bird".to_string(),
            badge_type: BadgeType::EarlyBird,
            name: "Early Bird".to_string(),
            icon: "🌅".to_string(),
            tier: BadgeTier::Silver,
            criteria_value: 7.0,
            earned: false,
        });
        catalog.push(AvailableBadge {
            badge_id: "perfectionist".to_string(),
            badge_type: BadgeType::Perfectionist,
            name: "Perfectionist".to_string(),
            icon: "✨".to_string(),
            tier: BadgeTier::Gold,
            criteria_value: 3.0,
            earned: false,
        });

        let earned_ids: HashSet<String> = AchievementRepository::earned_badge_ids(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .collect();

        let mut earned = 0;
        for badge in catalog.iter_mut() {
            badge.earned = earned_ids.contains(&badge.badge_id);
            if badge.earned {
                earned += 1;
            }
        }

        Ok(AvailableBadgesResponse {
            total: catalog.len(),
            earned,
            remaining: catalog.len() - earned,
            badges: catalog,
        })
    }

    async fn award_if_absent(
        pool: &PgPool,
        input: NewAchievement,
    ) -> Result<Option<Achievement>, ApiError> {
        let record = AchievementRepository::insert_if_absent(pool, input)
            .await
            .map_err(ApiError::Internal)?;

        record
            .map(|r| r.into_achievement())
            .transpose()
            .map_err(ApiError::Internal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use vitatrack_shared::models::GoalType;

    #[rstest]
    #[case(10, BadgeTier::Bronze)]
    #[case(50, BadgeTier::Silver)]
    #[case(100, BadgeTier::Gold)]
    #[case(250, BadgeTier::Platinum)]
    #[case(500, BadgeTier::Diamond)]
    #[case(1000, BadgeTier::Diamond)]
    fn count_milestones_map_to_tiers(#[case] count: i64, #[case] expected: BadgeTier) {
        assert_eq!(tier_for_count(count), expected);
    }

    #[rstest]
    #[case(EXERCISE_MILESTONES, 50, true)]
    #[case(EXERCISE_MILESTONES, 49, false)]
    #[case(EXERCISE_MILESTONES, 51, false)]
    #[case(EXERCISE_MILESTONES, 500, true)]
    #[case(MEAL_MILESTONES, 100, true)]
    #[case(MEAL_MILESTONES, 101, false)]
    #[case(MEAL_MILESTONES, 10, false)]
    fn count_badge_fires_only_on_the_exact_milestone(
        #[case] milestones: &[i64],
        #[case] total: i64,
        #[case] lands: bool,
    ) {
        // The 50th workout earns exercise_50; the 51st earns nothing.
        assert_eq!(milestones.contains(&total), lands);
    }

    #[test]
    fn every_streak_milestone_has_a_badge_definition() {
        for milestone in crate::services::streaks::STREAK_MILESTONES {
            assert!(
                STREAK_BADGES.iter().any(|d| d.days == *milestone),
                "no badge for {milestone}-day streak"
            );
        }
    }

    fn goal_with_schedule(
        start_days_ago: i64,
        total_days: i64,
        progress: f64,
        now: DateTime<Utc>,
    ) -> Goal {
        let start = now - chrono::Duration::days(start_days_ago);
        Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            goal_type: GoalType::Custom,
            title: "goal".to_string(),
            description: None,
            target_value: 100.0,
            start_value: 0.0,
            current_value: progress,
            unit: "times".to_string(),
            start_date: start,
            target_date: start + chrono::Duration::days(total_days),
            completed_date: None,
            status: GoalStatus::Active,
            progress_percentage: progress,
            milestones: Vec::new(),
            progress_history: Vec::new(),
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn on_track_requires_every_goal_at_expected_progress() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();

        // Halfway through a 10-day goal, expected progress is 50%
        let ahead = goal_with_schedule(5, 10, 60.0, now);
        let behind = goal_with_schedule(5, 10, 30.0, now);

        assert!(all_on_track(&[ahead.clone()], now));
        assert!(!all_on_track(&[ahead, behind], now));
        assert!(!all_on_track(&[], now));
    }
}
