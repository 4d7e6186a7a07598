//! Default seed collection
//!
//! The fixed set of habits used for onboarding and for `reset`. Completion
//! histories are laid out relative to the given "today" so a fresh install
//! shows live streaks rather than an empty dashboard.

use std::collections::BTreeSet;

use chrono::{Days, Duration, NaiveDate, Utc};

use crate::types::Habit;

/// Build the default habit collection anchored at `today`.
pub fn seed_habits(today: NaiveDate) -> Vec<Habit> {
    let now = Utc::now();

    vec![
        Habit {
            id: "morning-stretch".to_string(),
            title: "Morning stretch".to_string(),
            color: "#8b5cf6".to_string(),
            completed_dates: recent_days(today, &[5, 4, 3, 2, 1, 0]),
            created_at: now - Duration::days(6),
        },
        Habit {
            id: "drink-water".to_string(),
            title: "Drink water".to_string(),
            color: "#06b6d4".to_string(),
            completed_dates: recent_days(today, &[3, 2, 1]),
            created_at: now - Duration::days(4),
        },
        Habit {
            id: "read-10-minutes".to_string(),
            title: "Read 10 minutes".to_string(),
            color: "#f59e0b".to_string(),
            completed_dates: recent_days(today, &[8, 7, 6, 5, 4]),
            created_at: now - Duration::days(12),
        },
        Habit {
            id: "evening-review".to_string(),
            title: "Evening review".to_string(),
            color: "#3b82f6".to_string(),
            completed_dates: recent_days(today, &[6, 5, 4, 3, 2, 1, 0]),
            created_at: now - Duration::days(9),
        },
    ]
}

fn recent_days(today: NaiveDate, offsets_back: &[u64]) -> BTreeSet<NaiveDate> {
    offsets_back
        .iter()
        .filter_map(|&back| today.checked_sub_days(Days::new(back)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{progress, streak};
    use pretty_assertions::assert_eq;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_seed_ids_are_unique_and_stable() {
        let habits = seed_habits(anchor());
        let ids: Vec<&str> = habits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "morning-stretch",
                "drink-water",
                "read-10-minutes",
                "evening-review"
            ]
        );
    }

    #[test]
    fn test_seed_streaks_are_live() {
        let habits = seed_habits(anchor());

        // morning-stretch: completed every day including today -> streak 6.
        assert_eq!(streak::current_streak(&habits[0].completed_dates, anchor()), 6);
        // drink-water: last completion was yesterday -> streak 0 today.
        assert_eq!(streak::current_streak(&habits[1].completed_dates, anchor()), 0);
        // evening-review: full week ending today.
        assert_eq!(streak::current_streak(&habits[3].completed_dates, anchor()), 7);
    }

    #[test]
    fn test_seed_progress_today() {
        let habits = seed_habits(anchor());
        let progress = progress::daily_progress(&habits, anchor());

        assert_eq!(progress.completed, 2);
        assert_eq!(progress.total, 4);
        assert_eq!(progress.percent, 0.5);
    }
}
