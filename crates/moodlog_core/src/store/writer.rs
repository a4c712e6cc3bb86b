//! Background persistence writer.
//!
//! One thread owns the storage backend and applies snapshots in the order
//! they were submitted. When several snapshots are queued, only the newest
//! is written, so an older list can never overwrite a newer one.

use crate::model::mood::MoodEntry;
use crate::storage::{save_entries, KeyValueStore};
use log::{debug, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

const WRITER_THREAD_NAME: &str = "moodlog-persist";

enum WriteCommand {
    Persist(Vec<MoodEntry>),
    Flush(Sender<()>),
}

#[derive(Debug, Default)]
pub(crate) struct WriterStats {
    pub(crate) written: AtomicU64,
    pub(crate) failed: AtomicU64,
}

pub(crate) struct SnapshotWriter {
    tx: Option<Sender<WriteCommand>>,
    handle: Option<JoinHandle<()>>,
    stats: Arc<WriterStats>,
}

impl SnapshotWriter {
    pub(crate) fn spawn(storage: Box<dyn KeyValueStore + Send>) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let stats = Arc::new(WriterStats::default());
        let worker_stats = Arc::clone(&stats);
        let handle = thread::Builder::new()
            .name(WRITER_THREAD_NAME.to_string())
            .spawn(move || run_writer(storage, rx, &worker_stats))?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
            stats,
        })
    }

    /// Queues a snapshot; returns immediately.
    pub(crate) fn submit(&self, snapshot: Vec<MoodEntry>) {
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.send(WriteCommand::Persist(snapshot)).is_err() {
            warn!("event=store_persist module=store status=dropped reason=writer_gone");
        }
    }

    /// Blocks until every snapshot submitted before this call is handled.
    pub(crate) fn flush(&self) {
        let Some(tx) = &self.tx else {
            return;
        };
        let (ack_tx, ack_rx) = mpsc::channel();
        if tx.send(WriteCommand::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }

    pub(crate) fn stats(&self) -> &WriterStats {
        &self.stats
    }
}

impl Drop for SnapshotWriter {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain and exit.
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("event=store_persist module=store status=error error_code=writer_panicked");
            }
        }
    }
}

fn run_writer(
    storage: Box<dyn KeyValueStore + Send>,
    rx: Receiver<WriteCommand>,
    stats: &WriterStats,
) {
    while let Ok(command) = rx.recv() {
        let mut pending = None;
        let mut acks = Vec::new();
        absorb(command, &mut pending, &mut acks);
        while let Ok(next) = rx.try_recv() {
            absorb(next, &mut pending, &mut acks);
        }

        if let Some(snapshot) = pending {
            write_snapshot(&*storage, &snapshot, stats);
        }
        for ack in acks {
            let _ = ack.send(());
        }
    }
}

fn absorb(command: WriteCommand, pending: &mut Option<Vec<MoodEntry>>, acks: &mut Vec<Sender<()>>) {
    match command {
        WriteCommand::Persist(snapshot) => *pending = Some(snapshot),
        WriteCommand::Flush(ack) => acks.push(ack),
    }
}

fn write_snapshot(storage: &dyn KeyValueStore, snapshot: &[MoodEntry], stats: &WriterStats) {
    let started_at = Instant::now();
    match save_entries(storage, snapshot) {
        Ok(()) => {
            stats.written.fetch_add(1, Ordering::Relaxed);
            debug!(
                "event=store_persist module=store status=ok count={} duration_ms={}",
                snapshot.len(),
                started_at.elapsed().as_millis()
            );
        }
        Err(err) => {
            stats.failed.fetch_add(1, Ordering::Relaxed);
            warn!(
                "event=store_persist module=store status=error count={} duration_ms={} error_code={} error={}",
                snapshot.len(),
                started_at.elapsed().as_millis(),
                err.code(),
                err
            );
        }
    }
}
