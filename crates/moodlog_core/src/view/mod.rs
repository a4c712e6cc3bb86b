//! UI-state models for the picker, history list and swipeable history rows.
//!
//! These hold only transient view state. All durable changes go through
//! `MoodStore`.

pub mod history;
pub mod picker;
pub mod swipe;
