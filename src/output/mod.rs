//! Output module for crawl counters and reports
//!
//! This module handles:
//! - Per-session and per-run counters logged at the end of a crawl
//! - The `--stats` report over the entries already stored

mod report;
pub mod stats;

pub use report::{RunSummary, SessionReport};
pub use stats::{load_statistics, print_statistics, StoreStatistics};
