//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose mood journal use cases to Dart via FRB.
//! - Own the process-wide `MoodStore` the UI reads and mutates.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - The store is opened lazily once; later calls reuse it.
//! - Storage trouble degrades to an in-memory journal instead of failing calls.
//! - The process-wide store is never dropped, so its drain-on-drop does not
//!   run here; the UI must call `mood_flush` before the app is suspended.

use chrono::Local;
use log::{error, warn};
use moodlog_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, mood_catalog,
    ping as ping_inner, render_history, CoreConfig, MemoryKeyValueStore, MoodStore,
    SqliteKeyValueStore, SystemClock,
};
use std::sync::{Mutex, MutexGuard};

static STORE: Mutex<Option<MoodStore>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One selectable mood for the picker grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodOptionItem {
    /// Position in the catalog; pass back to `mood_select`.
    pub index: u32,
    pub emoji: String,
    pub description: String,
}

/// One history row, most recent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodHistoryItem {
    /// Entry key; pass back to `mood_delete`.
    pub timestamp: i64,
    pub emoji: String,
    pub description: String,
    /// Local time, e.g. `14 Nov, 2023 at 10:13pm`.
    pub recorded_at: String,
}

/// Generic action response envelope for mood mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodActionResponse {
    pub ok: bool,
    /// Timestamp of the created entry, when one was created.
    pub timestamp: Option<i64>,
    /// Number of entries removed by a delete.
    pub removed: u32,
    pub message: String,
}

impl MoodActionResponse {
    fn created(timestamp: i64) -> Self {
        Self {
            ok: true,
            timestamp: Some(timestamp),
            removed: 0,
            message: "Mood recorded.".to_string(),
        }
    }

    fn deleted(removed: usize) -> Self {
        Self {
            ok: true,
            timestamp: None,
            removed: u32::try_from(removed).unwrap_or(u32::MAX),
            message: if removed == 0 {
                "Nothing to delete.".to_string()
            } else {
                "Mood deleted.".to_string()
            },
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            timestamp: None,
            removed: 0,
            message: message.into(),
        }
    }
}

/// Returns the fixed mood catalog in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn mood_options() -> Vec<MoodOptionItem> {
    mood_catalog()
        .iter()
        .enumerate()
        .map(|(index, option)| MoodOptionItem {
            index: u32::try_from(index).unwrap_or(u32::MAX),
            emoji: option.emoji.clone(),
            description: option.description.clone(),
        })
        .collect()
}

/// Records the catalog mood at `index` with the current time.
///
/// # FFI contract
/// - Never panics.
/// - Out-of-range index returns a failure envelope.
#[flutter_rust_bridge::frb(sync)]
pub fn mood_select(index: u32) -> MoodActionResponse {
    let Some(option) = mood_catalog().get(index as usize) else {
        return MoodActionResponse::failure(format!(
            "mood_select failed: index {index} out of range 0..{}",
            mood_catalog().len()
        ));
    };

    match with_store(|store| store.select_mood(option.clone())) {
        Ok(entry) => MoodActionResponse::created(entry.timestamp),
        Err(err) => MoodActionResponse::failure(format!("mood_select failed: {err}")),
    }
}

/// Deletes every entry recorded at `timestamp`. Unknown timestamps succeed
/// with `removed = 0`.
#[flutter_rust_bridge::frb(sync)]
pub fn mood_delete(timestamp: i64) -> MoodActionResponse {
    match with_store(|store| store.delete_timestamp(timestamp)) {
        Ok(removed) => MoodActionResponse::deleted(removed),
        Err(err) => MoodActionResponse::failure(format!("mood_delete failed: {err}")),
    }
}

/// Returns history rows, most recent first. Empty on store failure.
#[flutter_rust_bridge::frb(sync)]
pub fn mood_history() -> Vec<MoodHistoryItem> {
    with_store(|store| {
        render_history(store.entries(), &Local)
            .into_iter()
            .map(|row| MoodHistoryItem {
                timestamp: row.timestamp,
                emoji: row.emoji,
                description: row.description,
                recorded_at: row.recorded_at,
            })
            .collect()
    })
    .unwrap_or_default()
}

/// Waits until queued writes reach storage.
///
/// The FFI store lives in a static and is never dropped, so pending
/// snapshots are not drained on exit. Anything recorded since the last
/// flush is lost if the process dies first; call this on app pause.
///
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn mood_flush() -> String {
    match with_store(|store| store.flush()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

fn with_store<T>(f: impl FnOnce(&mut MoodStore) -> T) -> Result<T, String> {
    let mut guard = lock_store();
    if guard.is_none() {
        *guard = Some(open_store()?);
    }
    match guard.as_mut() {
        Some(store) => Ok(f(store)),
        None => Err("mood store unavailable".to_string()),
    }
}

fn lock_store() -> MutexGuard<'static, Option<MoodStore>> {
    // A panic mid-mutation leaves the list itself consistent; keep serving.
    STORE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn open_store() -> Result<MoodStore, String> {
    let config = CoreConfig::from_env().unwrap_or_else(|err| {
        warn!("event=ffi_config module=ffi status=fallback error={err}");
        CoreConfig::default()
    });
    open_store_with(&config)
}

/// Opens the journal at `config.db_path`, falling back to memory.
fn open_store_with(config: &CoreConfig) -> Result<MoodStore, String> {
    let store = match SqliteKeyValueStore::open(&config.db_path) {
        Ok(backend) => MoodStore::open(backend, SystemClock),
        Err(err) => {
            error!(
                "event=ffi_store_open module=ffi status=fallback error_code={} error={err}",
                err.code()
            );
            MoodStore::open(MemoryKeyValueStore::new(), SystemClock)
        }
    };
    store.map_err(|err| format!("mood store open failed: {err}"))
}
