//! Flutter-facing bindings for the Moodlog core.

pub mod api;
