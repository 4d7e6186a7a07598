//! Versioned local persistence
//!
//! The full habit collection is stored as a single keyed JSON blob:
//! `{ "version": 1, "habits": [...] }` under the key `habitra-habits-v1`.
//! The `StorageBackend` trait keeps the store's mutation logic decoupled
//! from any particular storage medium; `FileStorage` is the on-device
//! backend and `MemoryStorage` backs tests.
//!
//! Loading is forgiving by contract: an absent, corrupt, or
//! future-versioned payload falls back to the seed collection instead of
//! failing app startup. Saving is fire-and-forget: a failed write is
//! logged and the in-memory state stays authoritative, an accepted
//! bounded-loss window.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;
use crate::store::{HabitStore, StoreEvent, SubscriberId};
use crate::types::{AddHabitPayload, CompletionTransition, DailyProgress, Habit};
use crate::{date, seed};

/// Current stored-schema version. Bump whenever the blob shape changes and
/// teach [`decode`] to migrate the previous shape.
pub const STORE_VERSION: u32 = 1;

/// Storage key for the habit blob.
pub const STORE_KEY: &str = "habitra-habits-v1";

/// Envelope written to storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredState {
    pub version: u32,
    pub habits: Vec<Habit>,
}

/// Keyed blob storage the engine persists into.
pub trait StorageBackend {
    /// Fetch the payload for `key`, or `None` when nothing is stored yet.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Durably store `payload` under `key`, replacing any previous value.
    fn save(&self, key: &str, payload: &str) -> Result<(), StoreError>;
}

/// One JSON file per key under a root directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, key: &str, payload: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(key), payload)?;
        Ok(())
    }
}

/// In-memory backend for tests and ephemeral embedding.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, payload: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

/// Serialize a habit collection into the versioned envelope.
pub fn encode(habits: &[Habit]) -> Result<String, StoreError> {
    let state = StoredState {
        version: STORE_VERSION,
        habits: habits.to_vec(),
    };
    Ok(serde_json::to_string(&state)?)
}

/// Deserialize a stored payload, migrating legacy shapes.
pub fn decode(payload: &str) -> Result<Vec<Habit>, StoreError> {
    let value: Value = serde_json::from_str(payload)?;
    let version = value.get("version").and_then(Value::as_u64).unwrap_or(0) as u32;

    if version > STORE_VERSION {
        return Err(StoreError::UnsupportedVersion(version));
    }
    if version == STORE_VERSION {
        let state: StoredState = serde_json::from_value(value)?;
        return Ok(state.habits);
    }

    migrate_legacy(&value)
}

/// Lift a versionless (pre-v1) blob into the current shape.
///
/// The source app shipped several habit shapes over time: a
/// `completedDates` string list, a single `completedToday` boolean, and a
/// bare numeric counter. The date-set form is canonical; the boolean form
/// becomes a singleton set for the load day, and anything without usable
/// history becomes an empty set. Entries missing identity are dropped.
fn migrate_legacy(value: &Value) -> Result<Vec<Habit>, StoreError> {
    let entries = value
        .get("habits")
        .and_then(Value::as_array)
        .ok_or_else(|| serde_json::Error::custom("legacy payload has no habits array"))?;

    Ok(entries.iter().filter_map(revive_legacy_habit).collect())
}

fn revive_legacy_habit(entry: &Value) -> Option<Habit> {
    let id = entry.get("id")?.as_str()?.to_string();
    let title = entry.get("title")?.as_str()?.to_string();
    let color = entry
        .get("color")
        .and_then(Value::as_str)
        .unwrap_or("#8b5cf6")
        .to_string();

    let completed_dates: BTreeSet<NaiveDate> =
        if let Some(list) = entry.get("completedDates").and_then(Value::as_array) {
            list.iter()
                .filter_map(Value::as_str)
                .filter_map(|day| date::parse_day(day).ok())
                .collect()
        } else if entry
            .get("completedToday")
            .and_then(Value::as_bool)
            .unwrap_or(false)
        {
            [date::today()].into_iter().collect()
        } else {
            BTreeSet::new()
        };

    let created_at = entry
        .get("createdAt")
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse::<DateTime<Utc>>().ok())
        .unwrap_or_else(Utc::now);

    Some(Habit {
        id,
        title,
        color,
        completed_dates,
        created_at,
    })
}

/// A [`HabitStore`] coupled to a storage backend.
///
/// Every successful mutation is followed by an explicit save of the full
/// collection. Reads delegate straight to the in-memory store.
pub struct PersistedStore<B: StorageBackend> {
    store: HabitStore,
    backend: B,
}

impl<B: StorageBackend> PersistedStore<B> {
    /// Rehydrate from the backend, seeding on absent or unreadable state.
    pub fn open(backend: B) -> Self {
        let habits = match backend.load(STORE_KEY) {
            Ok(Some(payload)) => match decode(&payload) {
                Ok(habits) => habits,
                Err(error) => {
                    tracing::warn!(%error, "persisted habit state unreadable, using seed collection");
                    seed::seed_habits(date::today())
                }
            },
            Ok(None) => seed::seed_habits(date::today()),
            Err(error) => {
                tracing::warn!(%error, "failed to read persisted habit state, using seed collection");
                seed::seed_habits(date::today())
            }
        };

        Self {
            store: HabitStore::from_habits(habits),
            backend,
        }
    }

    /// The underlying in-memory store, for snapshot reads.
    pub fn store(&self) -> &HabitStore {
        &self.store
    }

    /// Register a subscriber on the underlying store. Mutations always go
    /// through the persisting operations on this wrapper, so subscribers
    /// only ever observe state that is (or is about to be) on disk.
    pub fn subscribe(&mut self, subscriber: impl Fn(&StoreEvent) + 'static) -> SubscriberId {
        self.store.subscribe(subscriber)
    }

    /// Remove a previously registered subscriber.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.store.unsubscribe(id);
    }

    /// The backend this store persists into.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn habits(&self) -> &[Habit] {
        self.store.habits()
    }

    pub fn toggle_completion(
        &mut self,
        id: &str,
        day: Option<NaiveDate>,
    ) -> Option<CompletionTransition> {
        let transition = self.store.toggle_completion(id, day);
        if transition.is_some() {
            self.persist_after_mutation();
        }
        transition
    }

    pub fn add_habit(&mut self, payload: AddHabitPayload) -> String {
        let id = self.store.add_habit(payload);
        self.persist_after_mutation();
        id
    }

    pub fn reorder_habits(&mut self, from: usize, to: usize) -> bool {
        let moved = self.store.reorder_habits(from, to);
        if moved {
            self.persist_after_mutation();
        }
        moved
    }

    pub fn reset(&mut self) {
        self.store.reset();
        self.persist_after_mutation();
    }

    pub fn daily_progress(&self, day: Option<NaiveDate>) -> DailyProgress {
        self.store.daily_progress(day)
    }

    /// Write the current collection to the backend.
    pub fn persist(&self) -> Result<(), StoreError> {
        let payload = encode(self.store.habits())?;
        self.backend.save(STORE_KEY, &payload)
    }

    fn persist_after_mutation(&self) {
        if let Err(error) = self.persist() {
            tracing::warn!(%error, "failed to persist habit state");
        }
    }
}
