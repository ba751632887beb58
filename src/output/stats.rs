//! Run statistics
//!
//! Counters are shared by every probe task and updated with relaxed
//! atomics; a snapshot is taken for the end-of-run summary.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Live counters for one run
#[derive(Debug)]
pub struct RunStatistics {
    started: Instant,
    launched: AtomicU64,
    completed: AtomicU64,
    misses: AtomicU64,
    pages: AtomicU64,
    delivered: AtomicU64,
    dropped: AtomicU64,
    benign: AtomicU64,
    suspicious: AtomicU64,
}

/// Point-in-time copy of `RunStatistics`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub elapsed: Duration,

    /// Probes spawned
    pub launched: u64,

    /// Probes that ran to completion
    pub completed: u64,

    /// Candidates that were not pastes
    pub misses: u64,

    /// Pastes fetched (HTTP 200)
    pub pages: u64,

    /// Entries written by the sink
    pub delivered: u64,

    /// Entries the sink failed to write
    pub dropped: u64,

    pub benign: u64,
    pub suspicious: u64,
}

impl Default for RunStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStatistics {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            launched: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            pages: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            benign: AtomicU64::new(0),
            suspicious: AtomicU64::new(0),
        }
    }

    pub fn record_launched(&self) {
        self.launched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_page(&self) {
        self.pages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delivered(&self, count: usize) {
        self.delivered.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_dropped(&self, count: usize) {
        self.dropped.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_benign(&self) {
        self.benign.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_suspicious(&self) {
        self.suspicious.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            elapsed: self.started.elapsed(),
            launched: self.launched.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            pages: self.pages.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            benign: self.benign.load(Ordering::Relaxed),
            suspicious: self.suspicious.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    /// Probes completed per second over the run
    pub fn probe_rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.completed as f64 / secs
        } else {
            0.0
        }
    }

    /// Formats the end-of-run summary
    pub fn summary(&self, reason: &str) -> String {
        let mut out = String::new();
        out.push_str("=== Run Statistics ===\n\n");
        out.push_str(&format!("Stopped: {}\n", reason));
        out.push_str(&format!(
            "Elapsed: {:.1}s ({:.1} probes/sec)\n\n",
            self.elapsed.as_secs_f64(),
            self.probe_rate()
        ));
        out.push_str("Probes:\n");
        out.push_str(&format!("  Launched: {}\n", self.launched));
        out.push_str(&format!("  Completed: {}\n", self.completed));
        out.push_str(&format!("  Misses: {}\n", self.misses));
        out.push_str(&format!("  Pastes found: {}\n\n", self.pages));
        out.push_str("Entries:\n");
        out.push_str(&format!("  Delivered: {}\n", self.delivered));
        out.push_str(&format!("  Dropped: {}\n\n", self.dropped));
        out.push_str("Errors:\n");
        out.push_str(&format!("  Benign: {}\n", self.benign));
        out.push_str(&format!("  Suspicious: {}\n", self.suspicious));
        out
    }
}

/// Prints the end-of-run summary to stderr
///
/// # Arguments
///
/// * `stats` - The statistics to display
/// * `reason` - Why discovery stopped
pub fn print_statistics(stats: &StatsSnapshot, reason: &str) {
    eprint!("{}", stats.summary(reason));
}
