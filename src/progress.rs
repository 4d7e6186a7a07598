//! Daily progress aggregation
//!
//! Side-effect-free counts over a snapshot of the habit collection. Nothing
//! here caches: a toggle followed by an aggregate call always sees the
//! post-toggle state.

use chrono::NaiveDate;

use crate::types::{DailyProgress, Habit};

/// Number of habits with `day` marked complete.
pub fn completed_count(habits: &[Habit], day: NaiveDate) -> usize {
    habits
        .iter()
        .filter(|habit| habit.completed_dates.contains(&day))
        .count()
}

/// Fraction of habits completed on `day`; 0.0 for an empty collection.
pub fn completion_percent(habits: &[Habit], day: NaiveDate) -> f64 {
    if habits.is_empty() {
        return 0.0;
    }
    completed_count(habits, day) as f64 / habits.len() as f64
}

/// Full `{completed, total, percent}` record for one day.
pub fn daily_progress(habits: &[Habit], day: NaiveDate) -> DailyProgress {
    let total = habits.len();
    let completed = completed_count(habits, day);
    let percent = if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64
    };

    DailyProgress {
        completed,
        total,
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn habit(id: &str, completed: &[u32]) -> Habit {
        Habit {
            id: id.to_string(),
            title: id.to_string(),
            color: "#06b6d4".to_string(),
            completed_dates: completed.iter().map(|&d| day(d)).collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_collection_is_all_zeros() {
        let progress = daily_progress(&[], day(7));
        assert_eq!(
            progress,
            DailyProgress {
                completed: 0,
                total: 0,
                percent: 0.0
            }
        );
    }

    #[test]
    fn test_counts_only_habits_completed_on_target_day() {
        let habits = vec![habit("a", &[6, 7]), habit("b", &[6]), habit("c", &[7])];
        let progress = daily_progress(&habits, day(7));

        assert_eq!(progress.completed, 2);
        assert_eq!(progress.total, 3);
        assert!((progress.percent - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_percent_stays_within_unit_interval() {
        let habits = vec![habit("a", &[7]), habit("b", &[7])];
        for d in 1..=10 {
            let percent = completion_percent(&habits, day(d));
            assert!((0.0..=1.0).contains(&percent));
        }
    }

    #[test]
    fn test_no_habit_completed_today() {
        let habits = vec![habit("a", &[1]), habit("b", &[])];
        assert_eq!(completed_count(&habits, day(7)), 0);
        assert_eq!(completion_percent(&habits, day(7)), 0.0);
    }

    #[test]
    fn test_all_habits_completed_is_full_percent() {
        let habits = vec![habit("a", &[7]), habit("b", &[7])];
        assert_eq!(daily_progress(&habits, day(7)).percent, 1.0);
    }
}
