//! Application services layer.

pub mod catalog;
pub mod error;
pub mod export;
pub mod loader;
pub mod progress;
pub mod render;
pub mod search;
