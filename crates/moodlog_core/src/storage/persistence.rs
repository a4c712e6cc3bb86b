//! Mood list load/save helpers over a `KeyValueStore`.
//!
//! # Responsibility
//! - Encode the full entry list as one JSON document under `STORAGE_KEY`.
//! - Report load results as loaded / absent / failed without erasing the
//!   difference; the mood store decides how to degrade.
//!
//! # Invariants
//! - A save always writes the whole list, never a delta.
//! - Empty stored values count as absent.

use super::{KeyValueStore, StorageError, StorageResult};
use crate::model::mood::{MoodDocument, MoodEntry};
use serde::Serialize;

/// Fixed slot key shared with previously installed builds.
pub const STORAGE_KEY: &str = "moodPicker-data";

/// Result of reading the persisted mood list.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Vec<MoodEntry>),
    Absent,
    Failed(StorageError),
}

impl LoadOutcome {
    /// Collapses absent and failed loads into an empty list.
    pub fn into_entries(self) -> Vec<MoodEntry> {
        match self {
            Self::Loaded(entries) => entries,
            Self::Absent | Self::Failed(_) => Vec::new(),
        }
    }
}

#[derive(Serialize)]
struct MoodDocumentRef<'a> {
    moods: &'a [MoodEntry],
}

/// Serializes the entry list as the persisted document.
pub fn encode_document(entries: &[MoodEntry]) -> StorageResult<String> {
    serde_json::to_string(&MoodDocumentRef { moods: entries }).map_err(StorageError::Encode)
}

/// Parses a persisted document back into its entry list.
pub fn decode_document(raw: &str) -> StorageResult<Vec<MoodEntry>> {
    serde_json::from_str::<MoodDocument>(raw)
        .map(|document| document.moods)
        .map_err(StorageError::Decode)
}

/// Reads and decodes the mood list from `store`.
pub fn load_entries(store: &dyn KeyValueStore) -> LoadOutcome {
    let raw = match store.read(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return LoadOutcome::Absent,
        Err(err) => return LoadOutcome::Failed(err),
    };

    if raw.trim().is_empty() {
        return LoadOutcome::Absent;
    }

    match decode_document(&raw) {
        Ok(entries) => LoadOutcome::Loaded(entries),
        Err(err) => LoadOutcome::Failed(err),
    }
}

/// Encodes and writes the full mood list into `store`.
pub fn save_entries(store: &dyn KeyValueStore, entries: &[MoodEntry]) -> StorageResult<()> {
    let encoded = encode_document(entries)?;
    store.write(STORAGE_KEY, &encoded)
}
