//! Mood option and mood entry records.
//!
//! # Responsibility
//! - Provide the fixed `MoodOption` catalog shown by the picker.
//! - Define `MoodEntry`, one recorded mood with its creation time.
//! - Define `MoodDocument`, the wire shape of the persisted slot.
//!
//! # Invariants
//! - `MoodEntry::timestamp` is Unix epoch milliseconds and doubles as the
//!   entry identity for deletion. Uniqueness is assumed, not enforced.
//! - Wire field names (`emoji`, `description`, `mood`, `timestamp`, `moods`)
//!   are shared with previously written data and must not change.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Unix epoch milliseconds used as the entry key.
pub type EntryTimestamp = i64;

/// One selectable mood: a display glyph plus a short label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoodOption {
    pub emoji: String,
    pub description: String,
}

impl MoodOption {
    pub fn new(emoji: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            emoji: emoji.into(),
            description: description.into(),
        }
    }
}

static MOOD_CATALOG: Lazy<Vec<MoodOption>> = Lazy::new(|| {
    vec![
        MoodOption::new("🧑‍💻", "studious"),
        MoodOption::new("🤔", "pensive"),
        MoodOption::new("😊", "happy"),
        MoodOption::new("🥳", "celebratory"),
        MoodOption::new("😤", "frustrated"),
    ]
});

/// Returns the fixed catalog of selectable moods in display order.
pub fn mood_catalog() -> &'static [MoodOption] {
    MOOD_CATALOG.as_slice()
}

/// Looks up a catalog option by its glyph.
pub fn find_mood_by_emoji(emoji: &str) -> Option<&'static MoodOption> {
    mood_catalog().iter().find(|option| option.emoji == emoji)
}

/// Looks up a catalog option by its label, ignoring ASCII case.
pub fn find_mood_by_description(description: &str) -> Option<&'static MoodOption> {
    let needle = description.trim();
    mood_catalog()
        .iter()
        .find(|option| option.description.eq_ignore_ascii_case(needle))
}

/// A recorded mood event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub mood: MoodOption,
    /// Creation time; also the key used when deleting.
    pub timestamp: EntryTimestamp,
}

impl MoodEntry {
    pub fn new(mood: MoodOption, timestamp: EntryTimestamp) -> Self {
        Self { mood, timestamp }
    }
}

/// Persisted slot content: `{"moods": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodDocument {
    pub moods: Vec<MoodEntry>,
}

#[cfg(test)]
mod tests {
    use super::{find_mood_by_description, find_mood_by_emoji, mood_catalog, MoodEntry, MoodOption};

    #[test]
    fn catalog_has_five_fixed_options_in_order() {
        let labels = mood_catalog()
            .iter()
            .map(|option| option.description.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            labels,
            vec!["studious", "pensive", "happy", "celebratory", "frustrated"]
        );
    }

    #[test]
    fn lookup_by_emoji_and_description() {
        let happy = find_mood_by_emoji("😊").expect("happy should exist");
        assert_eq!(happy.description, "happy");
        assert_eq!(find_mood_by_description(" Pensive ").unwrap().emoji, "🤔");
        assert!(find_mood_by_emoji("🙃").is_none());
    }

    #[test]
    fn entry_serializes_with_nested_mood_object() {
        let entry = MoodEntry::new(MoodOption::new("😊", "happy"), 100);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["mood"]["emoji"], "😊");
        assert_eq!(json["mood"]["description"], "happy");
        assert_eq!(json["timestamp"], 100);
    }
}
