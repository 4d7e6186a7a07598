//! Habitra Core - on-device habit completion, streak, and progress engine
//!
//! The engine behind the Habitra mobile app: pure calculators over
//! per-habit completion-date sets, an injectable store with explicit
//! subscribe/notify, and versioned local persistence.
//!
//! ## Modules
//!
//! - **date / streak / progress**: canonical UTC calendar days, the
//!   backward-walking streak calculator, and daily progress aggregation
//! - **store**: the ordered habit collection and its mutation operations
//! - **storage**: the `habitra-habits-v1` blob, backends, and migration
//! - **feedback**: haptic pulse decisions derived from toggle transitions

pub mod date;
pub mod error;
pub mod feedback;
pub mod progress;
pub mod seed;
pub mod storage;
pub mod store;
pub mod streak;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use error::StoreError;
pub use feedback::{HapticPulse, HapticSink};
pub use progress::daily_progress;
pub use storage::{
    FileStorage, MemoryStorage, PersistedStore, StorageBackend, StoredState, STORE_KEY,
    STORE_VERSION,
};
pub use store::{HabitStore, StoreEvent, SubscriberId};
pub use streak::{current_streak, is_completed_on, toggle_completion};
pub use types::{AddHabitPayload, CompletionTransition, DailyProgress, Habit};

/// Engine version embedded in CLI and doctor output
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
