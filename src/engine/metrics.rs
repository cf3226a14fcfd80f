//! Catalog run metrics.
//!
//! Collected by `build_verbose_with` and printed by the CLI report. The plain
//! `build_with` path records only the total.

use super::classify::Classification;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Wall time for the whole run.
    pub total: Duration,
    /// Decoding + period detection for every block.
    pub classify: Duration,
    /// Sorting and packing accepted records.
    pub layout: Duration,
    /// Building the final document text.
    pub assemble: Duration,
    pub blocks: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Recovered decode problems.
    pub warnings: usize,
    /// Generations simulated across all blocks.
    pub generations: u64,
}

impl RunMetrics {
    /// Tally counters from a finished classification batch.
    pub fn record_classifications(&mut self, batch: &[Classification]) {
        self.blocks = batch.len();
        self.accepted = batch.iter().filter(|c| c.is_accepted()).count();
        self.rejected = self.blocks - self.accepted;
        self.warnings = batch.iter().map(|c| c.warnings.len()).sum();
        self.generations = batch.iter().map(|c| c.generations).sum();
    }
}
