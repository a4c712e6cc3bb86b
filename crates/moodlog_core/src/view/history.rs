//! History list projection and row rendering.

use crate::model::mood::MoodEntry;
use chrono::{TimeZone, Utc};

/// `14 Nov, 2023 at 10:13pm`
const ROW_TIME_FORMAT: &str = "%d %b, %Y at %-I:%M%P";

/// Entries most recent first. Holds no state of its own.
pub fn history_view(entries: &[MoodEntry]) -> impl Iterator<Item = &MoodEntry> {
    entries.iter().rev()
}

/// Display-ready row for one history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub timestamp: i64,
    pub emoji: String,
    pub description: String,
    pub recorded_at: String,
}

/// Builds display rows, most recent first, with times rendered in `tz`.
pub fn render_history<Tz: TimeZone>(entries: &[MoodEntry], tz: &Tz) -> Vec<HistoryRow>
where
    Tz::Offset: std::fmt::Display,
{
    history_view(entries)
        .map(|entry| HistoryRow {
            timestamp: entry.timestamp,
            emoji: entry.mood.emoji.clone(),
            description: entry.mood.description.clone(),
            recorded_at: format_timestamp(entry.timestamp, tz),
        })
        .collect()
}

/// Formats epoch milliseconds for a history row.
///
/// Timestamps chrono cannot represent fall back to the raw number.
pub fn format_timestamp<Tz: TimeZone>(timestamp_ms: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match Utc.timestamp_millis_opt(timestamp_ms).single() {
        Some(utc) => utc.with_timezone(tz).format(ROW_TIME_FORMAT).to_string(),
        None => timestamp_ms.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, history_view, render_history};
    use crate::model::mood::{MoodEntry, MoodOption};
    use chrono::{FixedOffset, Utc};

    #[test]
    fn history_is_most_recent_first() {
        let entries = vec![
            MoodEntry::new(MoodOption::new("😊", "happy"), 100),
            MoodEntry::new(MoodOption::new("🤔", "pensive"), 200),
        ];
        let order = history_view(&entries)
            .map(|entry| entry.timestamp)
            .collect::<Vec<_>>();
        assert_eq!(order, vec![200, 100]);
    }

    #[test]
    fn formats_row_time() {
        assert_eq!(
            format_timestamp(1_700_000_000_000, &Utc),
            "14 Nov, 2023 at 10:13pm"
        );
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            format_timestamp(1_700_000_000_000, &plus_two),
            "15 Nov, 2023 at 12:13am"
        );
    }

    #[test]
    fn unrepresentable_timestamp_falls_back_to_number() {
        assert_eq!(format_timestamp(i64::MAX, &Utc), i64::MAX.to_string());
    }

    #[test]
    fn render_history_carries_mood_fields() {
        let entries = vec![MoodEntry::new(MoodOption::new("🥳", "celebratory"), 0)];
        let rows = render_history(&entries, &Utc);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].emoji, "🥳");
        assert_eq!(rows[0].description, "celebratory");
        assert_eq!(rows[0].recorded_at, "01 Jan, 1970 at 12:00am");
    }
}
