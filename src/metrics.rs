// Run metrics module
//
// Lightweight counters for one parse + enrichment run

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Run metrics
///
/// Uses atomic operations so enrichment tasks can record results without locks.
/// Shared via `Arc` between the parser, the enricher and the binary, which logs
/// the summary once the report is written.
#[derive(Debug)]
pub struct Metrics {
    /// Non-blank profile lines seen
    lines_parsed: AtomicUsize,

    /// Profile lines that matched no known line kind
    lines_unrecognized: AtomicUsize,

    /// Items whose details were merged from the item API
    items_enriched: AtomicUsize,

    /// Items whose API response could not be decoded
    items_decode_failed: AtomicUsize,

    /// Sum of per-lookup wall time in milliseconds
    total_fetch_time_ms: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            lines_parsed: AtomicUsize::new(0),
            lines_unrecognized: AtomicUsize::new(0),
            items_enriched: AtomicUsize::new(0),
            items_decode_failed: AtomicUsize::new(0),
            total_fetch_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_line_parsed(&self) {
        self.lines_parsed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_line_unrecognized(&self) {
        self.lines_unrecognized.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_item_enriched(&self) {
        self.items_enriched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_item_decode_failed(&self) {
        self.items_decode_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record wall time of a single lookup
    pub fn record_fetch_time(&self, duration: Duration) {
        self.total_fetch_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn lines_parsed(&self) -> usize {
        self.lines_parsed.load(Ordering::Relaxed)
    }

    pub fn lines_unrecognized(&self) -> usize {
        self.lines_unrecognized.load(Ordering::Relaxed)
    }

    pub fn items_enriched(&self) -> usize {
        self.items_enriched.load(Ordering::Relaxed)
    }

    pub fn items_decode_failed(&self) -> usize {
        self.items_decode_failed.load(Ordering::Relaxed)
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average lookup time in milliseconds over all attempted lookups
    pub fn avg_fetch_time_ms(&self) -> f64 {
        let total = self.total_fetch_time_ms.load(Ordering::Relaxed);
        let count = self.items_enriched() + self.items_decode_failed();
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Run Metrics Summary ===");
        tracing::info!("Elapsed: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Lines: {} parsed, {} unrecognized",
            self.lines_parsed(),
            self.lines_unrecognized()
        );
        tracing::info!(
            "Items: {} enriched, {} undecodable (avg lookup: {:.2}ms)",
            self.items_enriched(),
            self.items_decode_failed(),
            self.avg_fetch_time_ms()
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
