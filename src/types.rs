//! Core types for the habit engine
//!
//! These structs define the wire shape of the persisted store and the values
//! the UI layer consumes. Field names serialize in camelCase to match the
//! stored `habitra-habits-v1` blob (`completedDates`, `createdAt`).

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single tracked habit.
///
/// Completion state is encoded implicitly as set membership: a habit is
/// complete on a day iff that day is in `completed_dates`. The set holds
/// canonical calendar days, so duplicates are impossible by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Stable identity, unique within the collection
    pub id: String,
    /// Display name
    pub title: String,
    /// Display accent color (hex string, no behavioral effect)
    pub color: String,
    /// Days this habit was completed, as canonical UTC calendar days
    pub completed_dates: BTreeSet<NaiveDate>,
    /// Creation timestamp (display only)
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddHabitPayload {
    pub title: String,
    pub color: String,
}

/// Before/after record of a single completion toggle.
///
/// Returned so the caller can drive secondary effects (haptics, celebratory
/// animation) without recomputing streaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionTransition {
    /// Id of the toggled habit
    pub habit_id: String,
    /// Whether the target day was complete before the toggle
    pub was_completed: bool,
    /// Whether the target day is complete after the toggle
    pub is_completed: bool,
    /// Consecutive-day streak ending at the target day, before the toggle
    pub previous_streak: u32,
    /// Consecutive-day streak ending at the target day, after the toggle
    pub new_streak: u32,
}

impl CompletionTransition {
    /// True when the toggle flipped the day from incomplete to complete.
    pub fn entered_completion(&self) -> bool {
        self.is_completed && !self.was_completed
    }

    /// True when the post-toggle streak hit a weekly milestone.
    pub fn is_streak_milestone(&self) -> bool {
        self.new_streak > 0 && self.new_streak % 7 == 0
    }
}

/// Aggregate completion for one day across the whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    /// Habits with the target day marked complete
    pub completed: usize,
    /// Collection size
    pub total: usize,
    /// `completed / total`, with 0.0 for an empty collection
    pub percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn transition(was: bool, is: bool, new_streak: u32) -> CompletionTransition {
        CompletionTransition {
            habit_id: "h1".to_string(),
            was_completed: was,
            is_completed: is,
            previous_streak: 0,
            new_streak,
        }
    }

    #[test]
    fn test_entered_completion() {
        assert!(transition(false, true, 1).entered_completion());
        assert!(!transition(true, false, 0).entered_completion());
        assert!(!transition(true, true, 3).entered_completion());
    }

    #[test]
    fn test_streak_milestone_multiples_of_seven() {
        assert!(transition(false, true, 7).is_streak_milestone());
        assert!(transition(false, true, 14).is_streak_milestone());
        assert!(!transition(false, true, 6).is_streak_milestone());
        assert!(!transition(false, true, 8).is_streak_milestone());
        // Streak zero is never a milestone, even though 0 % 7 == 0.
        assert!(!transition(true, false, 0).is_streak_milestone());
    }

    #[test]
    fn test_habit_serializes_with_camel_case_wire_names() {
        let habit = Habit {
            id: "morning-stretch".to_string(),
            title: "Morning stretch".to_string(),
            color: "#8b5cf6".to_string(),
            completed_dates: [NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()]
                .into_iter()
                .collect(),
            created_at: "2024-01-01T08:00:00Z".parse().unwrap(),
        };

        let value = serde_json::to_value(&habit).unwrap();
        assert_eq!(value["completedDates"][0], "2024-01-07");
        assert_eq!(value["createdAt"], "2024-01-01T08:00:00Z");
        assert!(value.get("completed_dates").is_none());
    }

    #[test]
    fn test_habit_round_trips_through_json() {
        let habit = Habit {
            id: "h1".to_string(),
            title: "Read".to_string(),
            color: "#f59e0b".to_string(),
            completed_dates: BTreeSet::new(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&habit).unwrap();
        let revived: Habit = serde_json::from_str(&json).unwrap();
        assert_eq!(revived, habit);
    }
}
