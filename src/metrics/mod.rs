//! Metrics collection and monitoring module
//!
//! Tracks fetch latency and refresh cycle outcomes for the status bar.

use std::collections::BTreeMap;
use std::time::Duration;

/// Point-in-time view of refresh metrics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchMetrics {
    pub cycles_started: u64,
    pub cycles_failed: u64,
    pub commits: u64,
    pub deferrals: u64,
    pub stale_discarded: u64,
    pub latency_p50_ms: u64,
    pub latency_p95_ms: u64,
    pub latency_p99_ms: u64,
    /// Successful cycles per serving provider
    pub served_by: BTreeMap<&'static str, u64>,
}

/// Metrics collector for refresh cycles
#[derive(Debug)]
pub struct MetricsCollector {
    latency_samples: Vec<u64>,
    max_samples: usize,
    current: FetchMetrics,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new(max_samples: usize) -> Self {
        Self {
            latency_samples: Vec::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            current: FetchMetrics::default(),
        }
    }

    pub fn record_cycle_started(&mut self) {
        self.current.cycles_started += 1;
    }

    /// Record a resolved cycle; `source` is `None` when every provider failed
    pub fn record_fetch(&mut self, elapsed: Duration, source: Option<&'static str>) {
        let latency = elapsed.as_millis() as u64;

        if self.latency_samples.len() >= self.max_samples {
            self.latency_samples.remove(0);
        }
        self.latency_samples.push(latency);

        match source {
            Some(name) => *self.current.served_by.entry(name).or_insert(0) += 1,
            None => self.current.cycles_failed += 1,
        }

        let (p50, p95, p99) = self.calculate_percentiles();
        self.current.latency_p50_ms = p50;
        self.current.latency_p95_ms = p95;
        self.current.latency_p99_ms = p99;
    }

    pub fn record_commit(&mut self) {
        self.current.commits += 1;
    }

    pub fn record_deferral(&mut self) {
        self.current.deferrals += 1;
    }

    pub fn record_stale_discard(&mut self) {
        self.current.stale_discarded += 1;
    }

    /// Calculate latency percentiles
    pub fn calculate_percentiles(&self) -> (u64, u64, u64) {
        if self.latency_samples.is_empty() {
            return (0, 0, 0);
        }

        let mut sorted = self.latency_samples.clone();
        sorted.sort_unstable();

        let len = sorted.len();
        let p50_idx = (len * 50) / 100;
        let p95_idx = (len * 95) / 100;
        let p99_idx = (len * 99) / 100;

        let p50 = sorted.get(p50_idx).copied().unwrap_or(0);
        let p95 = sorted.get(p95_idx.min(len - 1)).copied().unwrap_or(0);
        let p99 = sorted.get(p99_idx.min(len - 1)).copied().unwrap_or(0);

        (p50, p95, p99)
    }

    pub fn snapshot(&self) -> FetchMetrics {
        self.current.clone()
    }
}
