//! Entropy collection and aggregation.
//!
//! Two strategies live here:
//!
//! - [`collect`] walks the sources in order and returns the raw samples. The
//!   generator concatenates them into its per-call mixing seed.
//! - [`SecureAggregator`] samples every source concurrently and hashes the
//!   results into a single 256-bit hex digest.
//!
//! Neither tolerates partial failure.

use super::source::{EntropyError, EntropySource};
use super::sources::{AggregateHashSource, SystemStatsSource, UuidSource};
use crate::conditioning::{Conditioner, HashAlgorithm};
use crate::context::Context;
use std::sync::Arc;

/// Collects one sample from each source, in order.
///
/// The context is checked before every provider call; the first error
/// aborts collection and no samples are returned.
pub fn collect(
    sources: &[Arc<dyn EntropySource>],
    ctx: &Context,
) -> Result<Vec<String>, EntropyError> {
    let mut samples = Vec::with_capacity(sources.len());

    for source in sources {
        ctx.check()?;
        let sample = source.produce(ctx)?;
        tracing::trace!(
            source = source.name(),
            bytes = sample.len(),
            "Collected entropy sample"
        );
        samples.push(sample);
    }

    Ok(samples)
}

/// Default sources for a [`SecureAggregator`] built from an empty list.
pub fn default_aggregator_sources() -> Vec<Arc<dyn EntropySource>> {
    vec![
        Arc::new(AggregateHashSource::default()),
        Arc::new(SystemStatsSource),
        Arc::new(UuidSource),
    ]
}

/// Concurrent one-shot aggregator.
///
/// Fans out one scoped thread per source, waits for all of them, and fails
/// the whole aggregate if any source failed. Successful samples are hashed
/// in source order.
pub struct SecureAggregator {
    sources: Vec<Arc<dyn EntropySource>>,
    conditioner: Conditioner,
}

impl SecureAggregator {
    /// Creates an aggregator; an empty list selects
    /// [`default_aggregator_sources`].
    pub fn new(sources: Vec<Arc<dyn EntropySource>>) -> Self {
        let sources = if sources.is_empty() {
            default_aggregator_sources()
        } else {
            sources
        };
        Self {
            sources,
            conditioner: Conditioner::default(),
        }
    }

    /// Selects the hash used to fold samples together.
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.conditioner = Conditioner::new(algorithm);
        self
    }

    /// Number of sources sampled per aggregation.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Samples every source and returns the 64-character hex digest.
    pub fn aggregate(&self, ctx: &Context) -> Result<String, EntropyError> {
        ctx.check()?;

        let results: Vec<Result<String, EntropyError>> = std::thread::scope(|s| {
            let handles: Vec<_> = self
                .sources
                .iter()
                .map(|source| s.spawn(move || source.produce(ctx)))
                .collect();

            handles
                .into_iter()
                .zip(&self.sources)
                .map(|(handle, source)| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(EntropyError::Panicked(source.name())))
                })
                .collect()
        });

        let mut samples = Vec::with_capacity(results.len());
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(sample) => samples.push(sample),
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            if let Err(reason) = ctx.check() {
                return Err(EntropyError::Interrupted(reason));
            }
            tracing::debug!(failures = errors.len(), "Entropy aggregation failed");
            return Err(EntropyError::Aggregate(errors));
        }

        let digest = self.conditioner.condition(&samples);
        tracing::debug!(
            sources = samples.len(),
            algorithm = ?self.conditioner.algorithm(),
            "Aggregated entropy"
        );
        Ok(digest.to_hex())
    }
}

impl Default for SecureAggregator {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl EntropySource for SecureAggregator {
    fn name(&self) -> &'static str {
        "secure_aggregator"
    }

    fn produce(&self, ctx: &Context) -> Result<String, EntropyError> {
        self.aggregate(ctx)
    }
}
