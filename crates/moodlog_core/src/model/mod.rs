//! Mood journal domain model.
//!
//! # Responsibility
//! - Define the selectable mood catalog and recorded entry shapes.
//! - Define the persisted document wrapper around the entry list.
//!
//! # Invariants
//! - The mood catalog is fixed at build time and never grows at runtime.
//! - Entry lists keep insertion order, which is chronological order.

pub mod mood;
