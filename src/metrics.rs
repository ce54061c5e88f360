//! Counters for one import run.
//!
//! Each listener owns its own `ImportMetrics`; nothing here is shared
//! between runs.

use serde::Serialize;

#[derive(Debug, Clone, Default)]
pub struct ImportMetrics {
    rows_seen: usize,
    rows_accepted: usize,
    rows_rejected: usize,
    flushes: usize,
    rows_flushed: usize,
    rows_discarded: usize,
}

impl ImportMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_accepted(&mut self) {
        self.rows_seen += 1;
        self.rows_accepted += 1;
    }

    pub fn record_rejected(&mut self) {
        self.rows_seen += 1;
        self.rows_rejected += 1;
    }

    /// A batch reached the sink and was persisted.
    pub fn record_flush(&mut self, rows: usize) {
        self.flushes += 1;
        self.rows_flushed += rows;
    }

    /// A batch reached the sink and was rejected; its rows are gone.
    pub fn record_failed_flush(&mut self, rows: usize) {
        self.flushes += 1;
        self.rows_discarded += rows;
    }

    pub fn rows_seen(&self) -> usize {
        self.rows_seen
    }

    pub fn rows_accepted(&self) -> usize {
        self.rows_accepted
    }

    pub fn rows_rejected(&self) -> usize {
        self.rows_rejected
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn rows_flushed(&self) -> usize {
        self.rows_flushed
    }

    pub fn rows_discarded(&self) -> usize {
        self.rows_discarded
    }

    pub fn report(&self) -> MetricsReport {
        let acceptance_rate = if self.rows_seen > 0 {
            (self.rows_accepted as f64 / self.rows_seen as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            rows_seen: self.rows_seen,
            rows_accepted: self.rows_accepted,
            rows_rejected: self.rows_rejected,
            acceptance_rate,
            flushes: self.flushes,
            rows_flushed: self.rows_flushed,
            rows_discarded: self.rows_discarded,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub rows_seen: usize,
    pub rows_accepted: usize,
    pub rows_rejected: usize,

    /// Accepted rows as a percentage of rows seen (0-100)
    pub acceptance_rate: f64,

    pub flushes: usize,
    pub rows_flushed: usize,
    pub rows_discarded: usize,
}

impl MetricsReport {
    pub fn log_summary(&self) {
        tracing::info!(
            "Import metrics: {} rows seen, {} accepted ({:.1}%), {} rejected, {} flushes, {} persisted, {} discarded",
            self.rows_seen,
            self.rows_accepted,
            self.acceptance_rate,
            self.rows_rejected,
            self.flushes,
            self.rows_flushed,
            self.rows_discarded
        );
    }
}
