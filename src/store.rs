//! Habit store
//!
//! `HabitStore` is an explicit, injectable state container: construct one per
//! app (or per test), mutate it through the operations below, and read it
//! through snapshot selectors. There is no hidden global instance.
//!
//! The engine assumes a single logical writer (the UI event loop); reads are
//! pure projections of the current snapshot. Interested parties register a
//! subscriber callback and receive one `StoreEvent` after each successful
//! mutation.

use std::fmt;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::types::{AddHabitPayload, CompletionTransition, DailyProgress, Habit};
use crate::{date, progress, seed, streak};

/// Notification emitted after a successful store mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    CompletionToggled(CompletionTransition),
    HabitAdded { id: String },
    HabitsReordered { from: usize, to: usize },
    StoreReset,
}

/// Handle returned by [`HabitStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(usize);

type Subscriber = Box<dyn Fn(&StoreEvent)>;

/// Ordered collection of habits plus its mutation operations.
pub struct HabitStore {
    habits: Vec<Habit>,
    subscribers: Vec<(SubscriberId, Subscriber)>,
    next_subscriber: usize,
}

impl Default for HabitStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HabitStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HabitStore")
            .field("habits", &self.habits)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl HabitStore {
    /// Create a store holding the default seed collection.
    pub fn new() -> Self {
        Self::from_habits(seed::seed_habits(date::today()))
    }

    /// Create a store from an already-rehydrated collection.
    pub fn from_habits(habits: Vec<Habit>) -> Self {
        Self {
            habits,
            subscribers: Vec::new(),
            next_subscriber: 0,
        }
    }

    /// Snapshot of the ordered habit collection.
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    /// Look up one habit by id.
    pub fn habit(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    /// Register a callback invoked after every successful mutation.
    pub fn subscribe(&mut self, subscriber: impl Fn(&StoreEvent) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a previously registered subscriber.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    /// Toggle a habit's completion for `day` (default: today, UTC boundary).
    ///
    /// Returns `None` when no habit has the given id. A stale id from a
    /// racing UI is a recoverable no-op, never a panic.
    pub fn toggle_completion(
        &mut self,
        id: &str,
        day: Option<NaiveDate>,
    ) -> Option<CompletionTransition> {
        let day = day.unwrap_or_else(date::today);
        let index = self.habits.iter().position(|habit| habit.id == id)?;

        let habit = &self.habits[index];
        let was_completed = streak::is_completed_on(habit, day);
        let previous_streak = streak::current_streak(&habit.completed_dates, day);

        let updated = streak::toggle_completion(habit, day);
        let is_completed = streak::is_completed_on(&updated, day);
        let new_streak = streak::current_streak(&updated.completed_dates, day);
        self.habits[index] = updated;

        let transition = CompletionTransition {
            habit_id: id.to_string(),
            was_completed,
            is_completed,
            previous_streak,
            new_streak,
        };

        tracing::debug!(
            habit = id,
            day = %date::format_day(day),
            completed = is_completed,
            streak = new_streak,
            "completion toggled"
        );
        self.notify(&StoreEvent::CompletionToggled(transition.clone()));
        Some(transition)
    }

    /// Append a new habit with a fresh unique id and empty completion set.
    ///
    /// Ids come from a random UUID rather than the wall clock, so rapid
    /// successive calls within the same millisecond cannot collide.
    pub fn add_habit(&mut self, payload: AddHabitPayload) -> String {
        let id = format!("habit-{}", Uuid::new_v4());
        self.habits.push(Habit {
            id: id.clone(),
            title: payload.title,
            color: payload.color,
            completed_dates: Default::default(),
            created_at: Utc::now(),
        });

        tracing::debug!(habit = %id, "habit added");
        self.notify(&StoreEvent::HabitAdded { id: id.clone() });
        id
    }

    /// Move the habit at `from` to position `to`, preserving the relative
    /// order of everything else.
    ///
    /// Returns `false` (state unchanged) when either index is out of bounds
    /// or the indices are equal.
    pub fn reorder_habits(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.habits.len() || to >= self.habits.len() {
            return false;
        }

        let habit = self.habits.remove(from);
        self.habits.insert(to, habit);
        self.notify(&StoreEvent::HabitsReordered { from, to });
        true
    }

    /// Replace the entire collection with the default seed set.
    pub fn reset(&mut self) {
        self.habits = seed::seed_habits(date::today());
        tracing::debug!("store reset to seed collection");
        self.notify(&StoreEvent::StoreReset);
    }

    /// Aggregate progress for `day` (default: today, UTC boundary).
    pub fn daily_progress(&self, day: Option<NaiveDate>) -> DailyProgress {
        progress::daily_progress(&self.habits, day.unwrap_or_else(date::today))
    }

    fn notify(&self, event: &StoreEvent) {
        for (_, subscriber) in &self.subscribers {
            subscriber(event);
        }
    }
}
