//! Terminal front end for the mood journal.
//!
//! # Responsibility
//! - Drive the same `MoodStore`, picker and swipe row the mobile UI uses.
//! - Flush pending writes before the process exits.

use chrono::Local;
use clap::{Parser, Subcommand};
use log::info;
use moodlog_core::{
    find_mood_by_description, find_mood_by_emoji, init_logging, mood_catalog, render_history,
    CoreConfig, KeyValueStore, MoodOption, MoodPicker, MoodStore, ReleaseOutcome,
    SqliteKeyValueStore, SwipeRow, SystemClock, PICKER_PROMPT, STORAGE_KEY,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "moodlog", about = "Record how you feel, one emoji at a time", version)]
struct Cli {
    /// Journal database file (defaults to $MOODLOG_DB_PATH or the temp dir)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the selectable moods
    Options,
    /// Record a mood by catalog number (1-5), emoji or label
    Add { mood: String },
    /// Show recorded moods, most recent first
    History,
    /// Delete the entry recorded at TIMESTAMP
    Delete { timestamp: i64 },
    /// Replay a horizontal swipe on the entry at TIMESTAMP
    Swipe {
        timestamp: i64,
        /// Cumulative drag translations, in points
        #[arg(allow_negative_numbers = true, required = true)]
        moves: Vec<f64>,
    },
    /// Clear every recorded mood from storage
    Reset,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("moodlog: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let mut config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(dir) = cli.log_dir {
        config.log_dir = Some(dir);
    }
    let level = cli.log_level.as_deref().unwrap_or(config.log_level);

    if let Some(dir) = &config.log_dir {
        let dir = dir
            .to_str()
            .ok_or_else(|| format!("log dir `{}` is not valid UTF-8", dir.display()))?;
        init_logging(level, dir).map_err(|err| err.to_string())?;
    }

    let backend = SqliteKeyValueStore::open(&config.db_path)
        .map_err(|err| format!("cannot open `{}`: {err}", config.db_path.display()))?;

    if let Command::Reset = cli.command {
        backend.remove(STORAGE_KEY).map_err(|err| err.to_string())?;
        info!("event=cli_reset module=cli status=ok");
        println!("Journal cleared.");
        return Ok(());
    }

    let mut store = MoodStore::open(backend, SystemClock).map_err(|err| err.to_string())?;
    let outcome = execute(cli.command, &mut store);
    store.flush();
    outcome
}

fn execute(command: Command, store: &mut MoodStore) -> Result<(), String> {
    match command {
        Command::Options => {
            println!("{PICKER_PROMPT}");
            for (position, option) in mood_catalog().iter().enumerate() {
                println!("  {}. {} {}", position + 1, option.emoji, option.description);
            }
        }
        Command::Add { mood } => {
            let option = resolve_mood(&mood)?;
            let mut picker = MoodPicker::new();
            picker.highlight(option);
            let entry = picker.confirm(store).map_err(|err| err.to_string())?;
            println!(
                "Recorded {} {} ({})",
                entry.mood.emoji, entry.mood.description, entry.timestamp
            );
        }
        Command::History => {
            let rows = render_history(store.entries(), &Local);
            if rows.is_empty() {
                println!("No moods recorded yet.");
            }
            for row in rows {
                println!(
                    "{:>14}  {} {:<12} {}",
                    row.timestamp, row.emoji, row.description, row.recorded_at
                );
            }
        }
        Command::Delete { timestamp } => {
            let removed = store.delete_timestamp(timestamp);
            println!("Deleted {removed} entr{}.", if removed == 1 { "y" } else { "ies" });
        }
        Command::Swipe { timestamp, moves } => swipe(store, timestamp, &moves)?,
        Command::Reset => return Err("reset must run before the journal is loaded".to_string()),
    }
    Ok(())
}

fn swipe(store: &mut MoodStore, timestamp: i64, moves: &[f64]) -> Result<(), String> {
    let entry = store
        .entries()
        .iter()
        .find(|entry| entry.timestamp == timestamp)
        .cloned()
        .ok_or_else(|| format!("no entry recorded at {timestamp}"))?;

    let mut row = SwipeRow::new(entry);
    for translation in moves {
        row.drag(*translation);
    }

    match row.release(Instant::now()) {
        ReleaseOutcome::Ignored => println!("Swipe too short to move the row."),
        ReleaseOutcome::SnapBack => {
            row.settle();
            println!("Row snapped back; nothing deleted.");
        }
        ReleaseOutcome::DeleteScheduled { deadline } => {
            // Wait out the exit animation like the app does.
            std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
            if let Some(target) = row.poll(Instant::now()) {
                store.delete_mood(&target);
                println!("Swiped away entry {}.", target.timestamp);
            }
        }
    }
    Ok(())
}

fn resolve_mood(input: &str) -> Result<MoodOption, String> {
    let trimmed = input.trim();
    let by_position = trimmed
        .parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|index| mood_catalog().get(index));

    by_position
        .or_else(|| find_mood_by_emoji(trimmed))
        .or_else(|| find_mood_by_description(trimmed))
        .cloned()
        .ok_or_else(|| format!("unknown mood `{trimmed}`; run `moodlog options`"))
}

#[cfg(test)]
mod tests {
    use super::{resolve_mood, Cli};
    use clap::Parser;

    #[test]
    fn resolves_mood_by_position_emoji_and_label() {
        assert_eq!(resolve_mood("1").unwrap().description, "studious");
        assert_eq!(resolve_mood("😤").unwrap().description, "frustrated");
        assert_eq!(resolve_mood("Happy").unwrap().emoji, "😊");
        assert!(resolve_mood("0").is_err());
        assert!(resolve_mood("6").is_err());
    }

    #[test]
    fn swipe_accepts_negative_translations() {
        let cli = Cli::try_parse_from(["moodlog", "swipe", "100", "-10", "-90.5"]).unwrap();
        match cli.command {
            super::Command::Swipe { timestamp, moves } => {
                assert_eq!(timestamp, 100);
                assert_eq!(moves, vec![-10.0, -90.5]);
            }
            _ => panic!("expected swipe command"),
        }
    }
}
