//! Completion toggling and streak calculation
//!
//! Pure functions over habit values. `toggle_completion` never mutates its
//! input; callers get a new `Habit` back, which keeps undo and comparison
//! straightforward and the functions trivially testable.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::types::Habit;

/// Whether the habit has the given day marked complete.
pub fn is_completed_on(habit: &Habit, day: NaiveDate) -> bool {
    habit.completed_dates.contains(&day)
}

/// Toggle completion for one day, returning the updated habit.
///
/// If the day is present it is removed (marked incomplete), otherwise added.
/// Toggling the same day twice restores the original completion set.
pub fn toggle_completion(habit: &Habit, day: NaiveDate) -> Habit {
    let mut completed_dates = habit.completed_dates.clone();
    if !completed_dates.remove(&day) {
        completed_dates.insert(day);
    }
    Habit {
        completed_dates,
        ..habit.clone()
    }
}

/// Count consecutive completed days ending at `reference`.
///
/// Walks backward one calendar day at a time via integer day stepping, so
/// month boundaries and leap days are handled by the calendar, not by
/// string arithmetic. Returns 0 when the reference day itself is absent.
pub fn current_streak(completed_dates: &BTreeSet<NaiveDate>, reference: NaiveDate) -> u32 {
    if completed_dates.is_empty() {
        return 0;
    }

    let mut streak = 0;
    let mut cursor = Some(reference);
    while let Some(day) = cursor {
        if !completed_dates.contains(&day) {
            break;
        }
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn days(entries: &[(i32, u32, u32)]) -> BTreeSet<NaiveDate> {
        entries.iter().map(|&(y, m, d)| day(y, m, d)).collect()
    }

    fn habit_with(dates: BTreeSet<NaiveDate>) -> Habit {
        Habit {
            id: "h1".to_string(),
            title: "Stretch".to_string(),
            color: "#8b5cf6".to_string(),
            completed_dates: dates,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_set_has_no_streak() {
        assert_eq!(current_streak(&BTreeSet::new(), day(2024, 1, 7)), 0);
    }

    #[test]
    fn test_streak_is_zero_when_reference_day_missing() {
        let completed = days(&[(2024, 1, 5), (2024, 1, 6)]);
        assert_eq!(current_streak(&completed, day(2024, 1, 7)), 0);
    }

    #[test]
    fn test_three_consecutive_days() {
        let completed = days(&[(2024, 1, 5), (2024, 1, 6), (2024, 1, 7)]);
        assert_eq!(current_streak(&completed, day(2024, 1, 7)), 3);
    }

    #[test]
    fn test_streak_stops_at_first_gap() {
        let completed = days(&[(2024, 1, 3), (2024, 1, 5), (2024, 1, 6), (2024, 1, 7)]);
        assert_eq!(current_streak(&completed, day(2024, 1, 7)), 3);
    }

    #[test]
    fn test_streak_crosses_month_and_leap_boundary() {
        let completed = days(&[(2024, 2, 28), (2024, 2, 29), (2024, 3, 1)]);
        assert_eq!(current_streak(&completed, day(2024, 3, 1)), 3);
    }

    #[test]
    fn test_toggle_adds_missing_day() {
        let habit = habit_with(BTreeSet::new());
        let updated = toggle_completion(&habit, day(2024, 1, 7));

        assert!(is_completed_on(&updated, day(2024, 1, 7)));
        // Input untouched.
        assert!(!is_completed_on(&habit, day(2024, 1, 7)));
    }

    #[test]
    fn test_toggle_removes_present_day() {
        let habit = habit_with(days(&[(2024, 1, 5), (2024, 1, 6), (2024, 1, 7)]));
        let updated = toggle_completion(&habit, day(2024, 1, 7));

        assert!(!is_completed_on(&updated, day(2024, 1, 7)));
        assert_eq!(updated.completed_dates, days(&[(2024, 1, 5), (2024, 1, 6)]));
        // With the 7th gone the walk stops immediately.
        assert_eq!(current_streak(&updated.completed_dates, day(2024, 1, 7)), 0);
    }

    #[test]
    fn test_double_toggle_is_identity() {
        let habit = habit_with(days(&[(2024, 1, 5), (2024, 1, 7)]));
        let toggled_twice =
            toggle_completion(&toggle_completion(&habit, day(2024, 1, 6)), day(2024, 1, 6));

        assert_eq!(toggled_twice.completed_dates, habit.completed_dates);
    }
}
