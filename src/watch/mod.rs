//! The watch pipeline: fetch, filter, match.
//!
//! # Modules
//!
//! - `structs` - data structures flowing through the pipeline
//! - `limiter` - admission gate bounding concurrent fetches
//! - `fetcher` - per-feed fetch, time parsing and recency filtering
//! - `matcher` - alert pattern predicates and matching
//! - `pipeline` - run orchestration

mod fetcher;
mod limiter;
mod matcher;
mod pipeline;
pub mod structs;

pub use crate::watch::matcher::compile_patterns;
pub use crate::watch::pipeline::{RunReport, Watcher};
