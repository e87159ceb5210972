//! Statistics gathered during a crawl run
//!
//! This module provides the counters a driver keeps while it runs and the
//! formatted summary the CLI prints at the end.

use serde::Serialize;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Number of resources successfully fetched
    pub pages_fetched: u64,

    /// Pages that were expanded for links
    pub index_pages: u64,

    /// Pages handed to an extractor
    pub content_items: u64,

    /// Candidate links pushed onto the frontier
    pub links_discovered: u64,

    /// Records produced
    pub records: u64,

    /// Per-item failures recorded as diagnostics
    pub failures: u64,

    /// Wall-clock duration of the run in milliseconds
    pub elapsed_ms: u64,
}

impl RunStats {
    /// Folds another run's counters into this one
    ///
    /// Elapsed time takes the maximum, since parallel runs overlap.
    pub fn merge(&mut self, other: &RunStats) {
        self.pages_fetched += other.pages_fetched;
        self.index_pages += other.index_pages;
        self.content_items += other.content_items;
        self.links_discovered += other.links_discovered;
        self.records += other.records;
        self.failures += other.failures;
        self.elapsed_ms = self.elapsed_ms.max(other.elapsed_ms);
    }

    /// Share of attempted items that produced a record, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.records + self.failures;
        if attempted > 0 {
            (self.records as f64 / attempted as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Prints statistics to stderr in a formatted manner
///
/// Stderr keeps stdout free for the JSON output.
pub fn print_statistics(stats: &RunStats) {
    eprintln!("=== Harvest Statistics ===\n");

    eprintln!("Traversal:");
    eprintln!("  Pages fetched: {}", stats.pages_fetched);
    eprintln!("  Index pages expanded: {}", stats.index_pages);
    eprintln!("  Content items attempted: {}", stats.content_items);
    eprintln!("  Links queued: {}", stats.links_discovered);
    eprintln!();

    eprintln!("Output:");
    eprintln!("  Records: {}", stats.records);
    eprintln!("  Failures: {}", stats.failures);
    eprintln!("  Elapsed: {:.1}s", stats.elapsed_ms as f64 / 1000.0);
    eprintln!();

    eprintln!(
        "Success Rate: {:.1}% ({} / {} items produced a record)",
        stats.success_rate(),
        stats.records,
        stats.records + stats.failures
    );
}
