//! Core domain logic for the Moodlog journal.
//! This crate is the single source of truth for mood list invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;
pub mod view;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::mood::{
    find_mood_by_description, find_mood_by_emoji, mood_catalog, EntryTimestamp, MoodDocument,
    MoodEntry, MoodOption,
};
pub use storage::{
    KeyValueStore, LoadOutcome, MemoryKeyValueStore, SqliteKeyValueStore, StorageError,
    StorageResult, STORAGE_KEY,
};
pub use store::{Clock, InitialLoad, ManualClock, MoodStore, StoreError, Subscription, SystemClock};
pub use view::history::{format_timestamp, history_view, render_history, HistoryRow};
pub use view::picker::{MoodPicker, PickerError, PickerState, PICKER_PROMPT};
pub use view::swipe::{ReleaseOutcome, SwipePhase, SwipeRow};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
