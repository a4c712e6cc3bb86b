//! Owned mood store.
//!
//! # Responsibility
//! - Hold the authoritative `Vec<MoodEntry>` for the process lifetime.
//! - Expose select/delete/subscribe as the only mutation and read paths.
//!
//! # Invariants
//! - Storage is read exactly once, in `MoodStore::open`.
//! - Every mutation notifies subscribers and queues one full snapshot.
//! - Deleting an unknown timestamp is a silent no-op.

use super::clock::Clock;
use super::writer::SnapshotWriter;
use crate::model::mood::{EntryTimestamp, MoodEntry, MoodOption};
use crate::storage::{load_entries, KeyValueStore, LoadOutcome};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Store construction failure. Storage problems are not errors here;
/// only failing to start the persistence writer is.
#[derive(Debug)]
pub enum StoreError {
    WriterSpawn(std::io::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WriterSpawn(err) => write!(f, "failed to start persistence writer: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::WriterSpawn(err) => Some(err),
        }
    }
}

/// What the initial storage read produced, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialLoad {
    Loaded { count: usize },
    Absent,
    /// Storage failed or held malformed data; the store started empty.
    Failed { reason: String },
}

/// Latest published list shared between the store and one subscriber.
///
/// Holds a single snapshot, so an idle subscriber costs one list no matter
/// how many mutations happen before it refreshes.
#[derive(Default)]
struct SnapshotCell {
    state: Mutex<CellState>,
    changed: Condvar,
}

#[derive(Default)]
struct CellState {
    version: u64,
    entries: Vec<MoodEntry>,
    closed: bool,
}

impl SnapshotCell {
    fn lock(&self) -> MutexGuard<'_, CellState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, snapshot: &[MoodEntry]) {
        let mut state = self.lock();
        state.version += 1;
        state.entries = snapshot.to_vec();
        self.changed.notify_all();
    }

    fn close(&self) {
        self.lock().closed = true;
        self.changed.notify_all();
    }
}

/// Current list plus change notification for later snapshots.
///
/// Intermediate snapshots are skipped: `refresh` and `wait_next` always
/// jump to the newest list.
pub struct Subscription {
    cell: Arc<SnapshotCell>,
    seen: u64,
    current: Vec<MoodEntry>,
}

impl Subscription {
    pub fn current(&self) -> &[MoodEntry] {
        &self.current
    }

    /// Picks up the newest snapshot. Returns `true` when anything changed.
    pub fn refresh(&mut self) -> bool {
        let cell = Arc::clone(&self.cell);
        let state = cell.lock();
        self.apply(&state)
    }

    /// Waits up to `timeout` for a newer snapshot.
    ///
    /// Returns `false` on timeout or when the store is gone.
    pub fn wait_next(&mut self, timeout: Duration) -> bool {
        let cell = Arc::clone(&self.cell);
        let seen = self.seen;
        let (state, _) = cell
            .changed
            .wait_timeout_while(cell.lock(), timeout, |state| {
                state.version == seen && !state.closed
            })
            .unwrap_or_else(PoisonError::into_inner);
        self.apply(&state)
    }

    fn apply(&mut self, state: &CellState) -> bool {
        if state.version == self.seen {
            return false;
        }
        self.seen = state.version;
        self.current = state.entries.clone();
        true
    }
}

/// Single-writer owner of the mood entry list.
pub struct MoodStore {
    entries: Vec<MoodEntry>,
    initial_load: InitialLoad,
    clock: Box<dyn Clock>,
    subscribers: Vec<Arc<SnapshotCell>>,
    writer: SnapshotWriter,
}

impl MoodStore {
    /// Loads the persisted list from `storage` and takes ownership of it for
    /// later writes.
    ///
    /// Absent, unreadable or malformed data yields an empty list; the reason
    /// is logged and kept in [`MoodStore::initial_load`].
    pub fn open<S, C>(storage: S, clock: C) -> Result<Self, StoreError>
    where
        S: KeyValueStore + Send + 'static,
        C: Clock + 'static,
    {
        let (entries, initial_load) = match load_entries(&storage) {
            LoadOutcome::Loaded(entries) => {
                info!(
                    "event=store_load module=store status=ok count={}",
                    entries.len()
                );
                let count = entries.len();
                (entries, InitialLoad::Loaded { count })
            }
            LoadOutcome::Absent => {
                info!("event=store_load module=store status=absent count=0");
                (Vec::new(), InitialLoad::Absent)
            }
            LoadOutcome::Failed(err) => {
                warn!(
                    "event=store_load module=store status=fallback count=0 error_code={} error={}",
                    err.code(),
                    err
                );
                (
                    Vec::new(),
                    InitialLoad::Failed {
                        reason: err.to_string(),
                    },
                )
            }
        };

        let writer = SnapshotWriter::spawn(Box::new(storage)).map_err(StoreError::WriterSpawn)?;

        Ok(Self {
            entries,
            initial_load,
            clock: Box::new(clock),
            subscribers: Vec::new(),
            writer,
        })
    }

    /// Current list, oldest first.
    pub fn entries(&self) -> &[MoodEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn initial_load(&self) -> &InitialLoad {
        &self.initial_load
    }

    /// Entries most recent first, as the history screen shows them.
    pub fn history(&self) -> impl Iterator<Item = &MoodEntry> {
        crate::view::history::history_view(&self.entries)
    }

    /// Records `option` at the current clock time and returns the new entry.
    pub fn select_mood(&mut self, option: MoodOption) -> MoodEntry {
        let entry = MoodEntry::new(option, self.clock.now_ms());
        self.entries.push(entry.clone());
        info!(
            "event=mood_select module=store status=ok count={}",
            self.entries.len()
        );
        self.publish();
        entry
    }

    /// Removes every entry sharing `entry.timestamp`. Returns the removed count.
    pub fn delete_mood(&mut self, entry: &MoodEntry) -> usize {
        self.delete_timestamp(entry.timestamp)
    }

    /// Timestamp-keyed form of [`MoodStore::delete_mood`].
    pub fn delete_timestamp(&mut self, timestamp: EntryTimestamp) -> usize {
        let before = self.entries.len();
        self.entries.retain(|item| item.timestamp != timestamp);
        let removed = before - self.entries.len();
        info!(
            "event=mood_delete module=store status=ok removed={removed} count={}",
            self.entries.len()
        );
        self.publish();
        removed
    }

    /// Returns the current snapshot; later changes arrive as the newest list only.
    pub fn subscribe(&mut self) -> Subscription {
        let cell = Arc::new(SnapshotCell::default());
        self.subscribers.push(Arc::clone(&cell));
        Subscription {
            cell,
            seen: 0,
            current: self.entries.clone(),
        }
    }

    /// Blocks until all queued snapshots have been handed to storage.
    pub fn flush(&self) {
        self.writer.flush();
    }

    /// Number of snapshot writes that succeeded so far.
    pub fn persisted_writes(&self) -> u64 {
        self.writer.stats().written.load(Ordering::Relaxed)
    }

    /// Number of snapshot writes that failed and were discarded.
    pub fn failed_writes(&self) -> u64 {
        self.writer.stats().failed.load(Ordering::Relaxed)
    }

    fn publish(&mut self) {
        // A cell only the store still references belongs to a dropped subscription.
        self.subscribers.retain(|cell| Arc::strong_count(cell) > 1);
        for cell in &self.subscribers {
            cell.publish(&self.entries);
        }
        self.writer.submit(self.entries.clone());
    }
}

impl Drop for MoodStore {
    fn drop(&mut self) {
        for cell in &self.subscribers {
            cell.close();
        }
    }
}
