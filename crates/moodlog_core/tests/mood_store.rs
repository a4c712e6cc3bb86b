use moodlog_core::storage::persistence::{encode_document, load_entries, save_entries};
use moodlog_core::{
    InitialLoad, KeyValueStore, ManualClock, MemoryKeyValueStore, MoodEntry, MoodOption,
    MoodStore, SqliteKeyValueStore, StorageError, StorageResult, STORAGE_KEY,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn happy() -> MoodOption {
    MoodOption::new("😊", "happy")
}

fn pensive() -> MoodOption {
    MoodOption::new("🤔", "pensive")
}

fn seeded(entries: &[MoodEntry]) -> MemoryKeyValueStore {
    MemoryKeyValueStore::with_value(STORAGE_KEY, encode_document(entries).unwrap())
}

/// Backend whose reads and writes fail while `down` is set.
#[derive(Clone, Default)]
struct FlakyStore {
    inner: MemoryKeyValueStore,
    down: Arc<AtomicBool>,
}

impl FlakyStore {
    fn check(&self) -> StorageResult<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("injected outage".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for FlakyStore {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        self.check()?;
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        self.check()?;
        self.inner.write(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.check()?;
        self.inner.remove(key)
    }
}

#[test]
fn empty_store_select_records_option_and_clock_time() {
    let clock = ManualClock::new(1_000);
    let backend = MemoryKeyValueStore::new();
    let mut store = MoodStore::open(backend.clone(), clock).unwrap();
    assert_eq!(store.initial_load(), &InitialLoad::Absent);
    assert!(store.is_empty());

    let entry = store.select_mood(happy());

    assert_eq!(entry, MoodEntry::new(happy(), 1_000));
    assert_eq!(store.entries(), &[MoodEntry::new(happy(), 1_000)]);

    store.flush();
    assert_eq!(load_entries(&backend).into_entries(), store.entries());
}

#[test]
fn select_appends_at_end_preserving_existing_entries() {
    let existing = vec![
        MoodEntry::new(pensive(), 10),
        MoodEntry::new(happy(), 20),
    ];
    let clock = ManualClock::new(30);
    let mut store = MoodStore::open(seeded(&existing), clock).unwrap();
    assert_eq!(store.initial_load(), &InitialLoad::Loaded { count: 2 });

    store.select_mood(pensive());

    assert_eq!(store.len(), 3);
    assert_eq!(&store.entries()[..2], existing.as_slice());
    assert_eq!(store.entries()[2], MoodEntry::new(pensive(), 30));
}

#[test]
fn delete_removes_matching_timestamp_only() {
    let existing = vec![MoodEntry::new(happy(), 100), MoodEntry::new(pensive(), 200)];
    let backend = seeded(&existing);
    let mut store = MoodStore::open(backend.clone(), ManualClock::new(0)).unwrap();

    let removed = store.delete_mood(&MoodEntry::new(MoodOption::new("x", "ignored"), 100));

    assert_eq!(removed, 1);
    assert_eq!(store.entries(), &[MoodEntry::new(pensive(), 200)]);
    store.flush();
    assert_eq!(
        load_entries(&backend).into_entries(),
        vec![MoodEntry::new(pensive(), 200)]
    );
}

#[test]
fn delete_preserves_relative_order_of_survivors() {
    let existing = vec![
        MoodEntry::new(happy(), 1),
        MoodEntry::new(pensive(), 2),
        MoodEntry::new(happy(), 3),
        MoodEntry::new(pensive(), 4),
    ];
    let mut store = MoodStore::open(seeded(&existing), ManualClock::new(0)).unwrap();

    store.delete_timestamp(2);

    let order = store
        .entries()
        .iter()
        .map(|entry| entry.timestamp)
        .collect::<Vec<_>>();
    assert_eq!(order, vec![1, 3, 4]);
}

#[test]
fn deleting_unknown_timestamp_is_a_no_op() {
    let existing = vec![MoodEntry::new(happy(), 100)];
    let mut store = MoodStore::open(seeded(&existing), ManualClock::new(0)).unwrap();

    let removed = store.delete_mood(&MoodEntry::new(happy(), 999));

    assert_eq!(removed, 0);
    assert_eq!(store.entries(), existing.as_slice());
}

#[test]
fn corrupt_storage_starts_empty_without_error() {
    let backend = MemoryKeyValueStore::with_value(STORAGE_KEY, "{not json");
    let store = MoodStore::open(backend, ManualClock::new(0)).unwrap();

    assert!(store.is_empty());
    assert!(matches!(store.initial_load(), InitialLoad::Failed { .. }));
}

#[test]
fn unreadable_storage_starts_empty_and_keeps_working() {
    let backend = FlakyStore::default();
    backend.down.store(true, Ordering::SeqCst);
    let mut store = MoodStore::open(backend.clone(), ManualClock::new(7)).unwrap();
    assert!(matches!(
        store.initial_load(),
        InitialLoad::Failed { reason } if reason.contains("injected outage")
    ));

    store.select_mood(happy());
    store.flush();

    assert_eq!(store.entries(), &[MoodEntry::new(happy(), 7)]);
    assert_eq!(store.failed_writes(), 1);
    assert_eq!(store.persisted_writes(), 0);
}

#[test]
fn write_failures_never_roll_back_memory() {
    let backend = FlakyStore::default();
    let clock = ManualClock::new(100);
    let mut store = MoodStore::open(backend.clone(), clock.clone()).unwrap();

    backend.down.store(true, Ordering::SeqCst);
    store.select_mood(happy());
    store.flush();
    assert_eq!(store.len(), 1);
    assert_eq!(backend.inner.read(STORAGE_KEY).unwrap(), None);

    backend.down.store(false, Ordering::SeqCst);
    clock.advance(1);
    store.select_mood(pensive());
    store.flush();

    assert_eq!(load_entries(&backend.inner).into_entries(), store.entries());
}

#[test]
fn last_mutation_wins_in_storage() {
    let backend = MemoryKeyValueStore::new();
    let clock = ManualClock::new(0);
    let mut store = MoodStore::open(backend.clone(), clock.clone()).unwrap();

    for _ in 0..50 {
        clock.advance(1);
        store.select_mood(happy());
    }
    store.delete_timestamp(25);
    store.flush();

    let persisted = load_entries(&backend).into_entries();
    assert_eq!(persisted.len(), 49);
    assert_eq!(persisted, store.entries());
}

#[test]
fn subscribers_see_snapshot_and_every_change() {
    let clock = ManualClock::new(100);
    let mut store = MoodStore::open(MemoryKeyValueStore::new(), clock.clone()).unwrap();
    store.select_mood(happy());

    let mut subscription = store.subscribe();
    assert_eq!(subscription.current().len(), 1);
    assert!(!subscription.refresh());

    clock.set(200);
    store.select_mood(pensive());
    assert!(subscription.wait_next(Duration::from_secs(1)));
    assert_eq!(subscription.current().len(), 2);

    store.delete_timestamp(100);
    assert!(subscription.refresh());
    assert_eq!(subscription.current(), &[MoodEntry::new(pensive(), 200)]);
}

#[test]
fn subscription_reports_closed_store() {
    let mut store = MoodStore::open(MemoryKeyValueStore::new(), ManualClock::new(0)).unwrap();
    let mut subscription = store.subscribe();
    drop(store);

    assert!(!subscription.wait_next(Duration::from_millis(10)));
}

#[test]
fn dropping_store_drains_pending_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("moodlog.sqlite3");

    {
        let backend = SqliteKeyValueStore::open(&path).unwrap();
        let mut store = MoodStore::open(backend, ManualClock::new(42)).unwrap();
        store.select_mood(happy());
    }

    let reopened = MoodStore::open(SqliteKeyValueStore::open(&path).unwrap(), ManualClock::new(0))
        .unwrap();
    assert_eq!(reopened.entries(), &[MoodEntry::new(happy(), 42)]);
    assert_eq!(reopened.initial_load(), &InitialLoad::Loaded { count: 1 });
}

#[test]
fn history_lists_most_recent_first() {
    let existing = vec![MoodEntry::new(happy(), 100), MoodEntry::new(pensive(), 200)];
    let store = MoodStore::open(seeded(&existing), ManualClock::new(0)).unwrap();

    let order = store
        .history()
        .map(|entry| entry.timestamp)
        .collect::<Vec<_>>();
    assert_eq!(order, vec![200, 100]);
}

#[test]
fn storage_is_never_reread_after_open() {
    let backend = MemoryKeyValueStore::new();
    let mut store = MoodStore::open(backend.clone(), ManualClock::new(1)).unwrap();

    save_entries(&backend, &[MoodEntry::new(pensive(), 555)]).unwrap();
    store.select_mood(happy());
    store.flush();

    assert_eq!(store.entries(), &[MoodEntry::new(happy(), 1)]);
    assert_eq!(load_entries(&backend).into_entries(), store.entries());
}
