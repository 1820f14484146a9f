//! Sentiero is a content core for learning-series publishing.
//!
//! It loads post units from a filesystem content store, aggregates series
//! parts into learning paths, computes prev/next navigation inside a series,
//! and tracks per-reader quiz progression and completion badges through an
//! injected key-value store. A small CLI exports the aggregated catalog as
//! static JSON for downstream site builds.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
