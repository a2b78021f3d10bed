//! Statistics over the entries already in the store
//!
//! This module backs the `--stats` command.

use crate::storage::{SqliteStore, StoreResult};

/// Store statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStatistics {
    /// Total number of stored entries
    pub total_entries: u64,

    /// Entries per category, largest first
    pub by_category: Vec<(String, u64)>,

    /// Entries per area, largest first
    pub by_area: Vec<(String, u64)>,
}

/// Loads statistics from the store
pub fn load_statistics(store: &SqliteStore) -> StoreResult<StoreStatistics> {
    Ok(StoreStatistics {
        total_entries: store.count_entries()?,
        by_category: store.count_by_category()?,
        by_area: store.count_by_area()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Store Statistics ===\n");

    println!("Overview:");
    println!("  Total entries: {}", stats.total_entries);
    println!();

    print_breakdown("Entries by Category:", &stats.by_category, stats.total_entries);
    print_breakdown("Entries by Area:", &stats.by_area, stats.total_entries);
}

fn print_breakdown(title: &str, counts: &[(String, u64)], total: u64) {
    if counts.is_empty() {
        return;
    }

    println!("{}", title);
    for (name, count) in counts {
        let percentage = if total > 0 {
            (*count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", name, count, percentage);
    }
    println!();
}
