//! Output module for harvested records and run reports
//!
//! This module handles:
//! - The canonical record schema and its assembler
//! - Per-item failure diagnostics
//! - Run statistics
//! - Writing records and diagnostics as JSON

mod diagnostics;
mod record;
pub mod stats;

pub use diagnostics::{Diagnostic, FailureKind};
pub use record::{Attribution, ContentType, OutputRecord, RecordAssembler};
pub use stats::{print_statistics, RunStats};

use crate::state::RunState;
use crate::HarvestError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Everything a crawl run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Records in emission order
    pub records: Vec<OutputRecord>,

    /// One entry per skipped item
    pub diagnostics: Vec<Diagnostic>,

    /// Terminal state the run ended in
    pub state: RunState,

    /// Counters gathered during the run
    pub stats: RunStats,
}

impl RunReport {
    /// Creates an empty report in the given state
    pub fn empty(state: RunState) -> Self {
        Self {
            records: Vec::new(),
            diagnostics: Vec::new(),
            state,
            stats: RunStats::default(),
        }
    }

    /// Appends another report's records, diagnostics and counters
    ///
    /// The merged state is `Aborted` if either side was aborted.
    pub fn absorb(&mut self, other: RunReport) {
        self.records.extend(other.records);
        self.diagnostics.extend(other.diagnostics);
        self.stats.merge(&other.stats);
        if other.state == RunState::Aborted {
            self.state = RunState::Aborted;
        }
    }

    /// Returns the diagnostics of the given kind
    pub fn failures_of(&self, kind: FailureKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }
}

/// Serializes `items` as a pretty-printed JSON array to `writer`
pub fn write_json<T: Serialize, W: Write>(items: &[T], mut writer: W) -> Result<(), HarvestError> {
    serde_json::to_writer_pretty(&mut writer, items)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Serializes `items` as a JSON array into the file at `path`
pub fn write_json_file<T: Serialize>(items: &[T], path: &Path) -> Result<(), HarvestError> {
    let file = std::fs::File::create(path)?;
    write_json(items, std::io::BufWriter::new(file))
}
