//! Swipe-to-delete state machine for one history row.
//!
//! ```text
//! Resting --drag past slop--> Dragging --release, |offset| <= threshold--> SnappingBack --settle--> Resting
//!                                      \--release, |offset| >  threshold--> Committing --deadline--> Removed
//! ```
//!
//! # Invariants
//! - The row never mutates the store itself; it hands back the entry to
//!   delete and the caller invokes `MoodStore::delete_mood`.
//! - A committed row yields its delete request at most once.

use crate::model::mood::MoodEntry;
use std::time::{Duration, Instant};

/// Horizontal movement ignored before the drag takes over the row.
pub const ACTIVATION_SLOP: f64 = 5.0;
/// Offsets beyond this distance delete the row on release.
pub const DELETE_THRESHOLD: i32 = 80;
/// Off-screen offset the row animates to before removal.
pub const EXIT_OFFSET: i32 = 2000;
/// Time given to the exit animation before the entry is removed.
pub const DELETE_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipePhase {
    Resting,
    Dragging { offset: i32, will_delete: bool },
    SnappingBack,
    Committing { target_offset: i32, deadline: Instant },
    Removed,
}

/// Result of releasing the drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// No active drag; nothing happened.
    Ignored,
    SnapBack,
    DeleteScheduled { deadline: Instant },
}

#[derive(Debug, Clone)]
pub struct SwipeRow {
    entry: MoodEntry,
    phase: SwipePhase,
}

impl SwipeRow {
    pub fn new(entry: MoodEntry) -> Self {
        Self {
            entry,
            phase: SwipePhase::Resting,
        }
    }

    pub fn entry(&self) -> &MoodEntry {
        &self.entry
    }

    pub fn phase(&self) -> SwipePhase {
        self.phase
    }

    /// Offset the row should currently be drawn at (animation target while
    /// snapping back or committing).
    pub fn offset(&self) -> i32 {
        match self.phase {
            SwipePhase::Resting | SwipePhase::SnappingBack => 0,
            SwipePhase::Dragging { offset, .. } => offset,
            SwipePhase::Committing { target_offset, .. } => target_offset,
            SwipePhase::Removed => EXIT_OFFSET,
        }
    }

    /// Feeds the cumulative horizontal translation of the active pan.
    pub fn drag(&mut self, translation_x: f64) {
        match self.phase {
            SwipePhase::Resting | SwipePhase::SnappingBack => {
                if translation_x.abs() <= ACTIVATION_SLOP {
                    return;
                }
            }
            SwipePhase::Dragging { .. } => {}
            SwipePhase::Committing { .. } | SwipePhase::Removed => return,
        }

        let offset = floor_offset(translation_x);
        self.phase = SwipePhase::Dragging {
            offset,
            will_delete: offset.saturating_abs() > DELETE_THRESHOLD,
        };
    }

    /// Ends the pan gesture at `now`.
    pub fn release(&mut self, now: Instant) -> ReleaseOutcome {
        let SwipePhase::Dragging {
            offset,
            will_delete,
        } = self.phase
        else {
            return ReleaseOutcome::Ignored;
        };

        if !will_delete {
            self.phase = SwipePhase::SnappingBack;
            return ReleaseOutcome::SnapBack;
        }

        let deadline = now + DELETE_DELAY;
        self.phase = SwipePhase::Committing {
            target_offset: offset.signum() * EXIT_OFFSET,
            deadline,
        };
        ReleaseOutcome::DeleteScheduled { deadline }
    }

    /// Marks the snap-back animation as finished.
    pub fn settle(&mut self) {
        if self.phase == SwipePhase::SnappingBack {
            self.phase = SwipePhase::Resting;
        }
    }

    /// Fires the scheduled delete once `now` reaches the deadline.
    pub fn poll(&mut self, now: Instant) -> Option<MoodEntry> {
        match self.phase {
            SwipePhase::Committing { deadline, .. } if now >= deadline => {
                self.phase = SwipePhase::Removed;
                Some(self.entry.clone())
            }
            _ => None,
        }
    }

    /// Delete button: removal is immediate, no exit animation delay.
    pub fn press_delete(&mut self) -> Option<MoodEntry> {
        if self.phase == SwipePhase::Removed {
            return None;
        }
        self.phase = SwipePhase::Removed;
        Some(self.entry.clone())
    }
}

fn floor_offset(translation_x: f64) -> i32 {
    let floored = translation_x.floor();
    if floored.is_nan() {
        0
    } else {
        // `as` saturates at the i32 bounds.
        floored as i32
    }
}
