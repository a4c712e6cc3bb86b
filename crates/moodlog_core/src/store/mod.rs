//! Mood store: the authoritative in-memory mood list and its persistence.
//!
//! # Responsibility
//! - Load the persisted list once at construction.
//! - Apply select/delete mutations in memory and notify subscribers.
//! - Forward full-list snapshots to the background persistence writer.
//!
//! # Invariants
//! - Storage failures never block or roll back an in-memory mutation.
//! - Snapshots reach storage in the order mutations happened.

pub mod clock;
pub mod mood_store;
mod writer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use mood_store::{InitialLoad, MoodStore, StoreError, Subscription};
