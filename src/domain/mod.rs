//! Domain layer types and invariants.

pub mod navigation;
pub mod posts;
pub mod quiz;
pub mod reading;
pub mod series;
pub mod slug;
