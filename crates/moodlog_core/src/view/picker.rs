//! Mood picker view state.
//!
//! # Invariants
//! - The highlight is local view state; it is never persisted.
//! - Confirming requires an active highlight and clears it afterwards.

use crate::model::mood::{mood_catalog, MoodEntry, MoodOption};
use crate::store::MoodStore;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const PICKER_PROMPT: &str = "How are you feeling today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerError {
    NothingHighlighted,
    /// The confirmation view is showing; go `back()` first.
    AlreadyConfirmed,
}

impl Display for PickerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NothingHighlighted => write!(f, "no mood highlighted"),
            Self::AlreadyConfirmed => write!(f, "mood already confirmed"),
        }
    }
}

impl Error for PickerError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerState {
    Selecting { highlighted: Option<MoodOption> },
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodPicker {
    state: PickerState,
}

impl Default for MoodPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl MoodPicker {
    pub fn new() -> Self {
        Self {
            state: PickerState::Selecting { highlighted: None },
        }
    }

    pub fn options(&self) -> &'static [MoodOption] {
        mood_catalog()
    }

    pub fn state(&self) -> &PickerState {
        &self.state
    }

    pub fn highlighted(&self) -> Option<&MoodOption> {
        match &self.state {
            PickerState::Selecting { highlighted } => highlighted.as_ref(),
            PickerState::Confirmed => None,
        }
    }

    pub fn can_confirm(&self) -> bool {
        self.highlighted().is_some()
    }

    /// Highlights `option`. Ignored while the confirmation view is showing.
    pub fn highlight(&mut self, option: MoodOption) -> bool {
        match &mut self.state {
            PickerState::Selecting { highlighted } => {
                *highlighted = Some(option);
                true
            }
            PickerState::Confirmed => false,
        }
    }

    /// Records the highlighted mood in `store` and switches to the
    /// confirmation view.
    pub fn confirm(&mut self, store: &mut MoodStore) -> Result<MoodEntry, PickerError> {
        let option = match &mut self.state {
            PickerState::Selecting { highlighted } => {
                highlighted.take().ok_or(PickerError::NothingHighlighted)?
            }
            PickerState::Confirmed => return Err(PickerError::AlreadyConfirmed),
        };

        let entry = store.select_mood(option);
        self.state = PickerState::Confirmed;
        Ok(entry)
    }

    /// Returns from the confirmation view to an empty selection.
    pub fn back(&mut self) {
        self.state = PickerState::Selecting { highlighted: None };
    }
}
