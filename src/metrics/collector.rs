//! Metrics collection and registry.

use crate::generator::GeneratorStats;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of generator counters for metrics update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// IDs issued.
    pub issued: u64,
    /// Candidates rejected as duplicates.
    pub collisions: u64,
    /// Calls that timed out.
    pub timeouts: u64,
    /// Issued-ID memory resets.
    pub resets: u64,
    /// IDs currently tracked.
    pub tracked: usize,
}

impl MetricsSnapshot {
    /// Creates a snapshot from a generator's running counters.
    pub fn from_stats(stats: &GeneratorStats) -> Self {
        Self {
            issued: stats.issued,
            collisions: stats.collisions,
            timeouts: stats.timeouts,
            resets: stats.resets,
            tracked: stats.tracked,
        }
    }
}

/// Prometheus metrics registry for ID generation.
pub struct MetricsRegistry {
    registry: Registry,
    issued_total: IntCounter,
    collisions_total: IntCounter,
    timeouts_total: IntCounter,
    resets_total: IntCounter,
    tracked: IntGauge,
}

impl MetricsRegistry {
    /// Creates a new registry with all generator metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let issued_total = IntCounter::new("idforge_ids_issued_total", "Total IDs issued")?;
        let collisions_total = IntCounter::new(
            "idforge_collisions_total",
            "Candidates rejected because they were already issued",
        )?;
        let timeouts_total = IntCounter::new(
            "idforge_timeouts_total",
            "Generation calls that ran out of time or attempts",
        )?;
        let resets_total = IntCounter::new(
            "idforge_issued_resets_total",
            "Times the issued-ID memory was cleared",
        )?;
        let tracked = IntGauge::new("idforge_issued_tracked", "IDs currently remembered")?;

        registry.register(Box::new(issued_total.clone()))?;
        registry.register(Box::new(collisions_total.clone()))?;
        registry.register(Box::new(timeouts_total.clone()))?;
        registry.register(Box::new(resets_total.clone()))?;
        registry.register(Box::new(tracked.clone()))?;

        Ok(Self {
            registry,
            issued_total,
            collisions_total,
            timeouts_total,
            resets_total,
            tracked,
        })
    }

    /// Updates all metrics from a snapshot.
    ///
    /// Counters only move forward; a snapshot behind the current value
    /// leaves the counter unchanged.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        advance(&self.issued_total, snapshot.issued);
        advance(&self.collisions_total, snapshot.collisions);
        advance(&self.timeouts_total, snapshot.timeouts);
        advance(&self.resets_total, snapshot.resets);
        self.tracked
            .set(i64::try_from(snapshot.tracked).unwrap_or(i64::MAX));
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn advance(counter: &IntCounter, target: u64) {
    let current = counter.get();
    if target > current {
        counter.inc_by(target - current);
    }
}
