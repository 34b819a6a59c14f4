//! Identifier generation with local uniqueness tracking.
//!
//! Each call collects entropy once, derives a mixing seed from it, and draws
//! candidates until one is absent from the instance's issued-ID memory or
//! the attempt bound is reached.

use super::config::GeneratorConfig;
use super::math;
use crate::context::Context;
use crate::entropy::{self, EntropyError};
use crate::rng::{OsRandom, RandomError, SecureRandom};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// How many attempts pass between context checks in the retry loop.
pub const CONTEXT_CHECK_INTERVAL: usize = 10;

/// Errors returned by [`Generator::generate`]. Any error means no ID was
/// produced.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("alphabet must contain at least 2 characters, got {len}")]
    InvalidAlphabet { len: usize },
    #[error("size must be positive")]
    InvalidSize,
    #[error("uniqueness pressure must be in (0, 1], got {0}")]
    InvalidUniquenessPressure(f64),
    /// Deadline expired, context cancelled, or attempt bound exhausted.
    #[error("ID generation timed out")]
    GenerationTimeout,
    /// A provider failed; the source's own error is kept as-is.
    #[error(transparent)]
    EntropySource(EntropyError),
    #[error("random source failed: {0}")]
    Random(RandomError),
}

impl GenerateError {
    fn from_entropy(err: EntropyError) -> Self {
        if err.is_interrupted() {
            Self::GenerationTimeout
        } else {
            Self::EntropySource(err)
        }
    }

    fn from_random(err: RandomError) -> Self {
        match err {
            RandomError::Interrupted(_) => Self::GenerationTimeout,
            other => Self::Random(other),
        }
    }
}

/// Running counters for one generator instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorStats {
    /// IDs returned successfully.
    pub issued: u64,
    /// Candidates rejected because they were already issued.
    pub collisions: u64,
    /// Calls that ended in [`GenerateError::GenerationTimeout`].
    pub timeouts: u64,
    /// Times the issued-ID memory was cleared.
    pub resets: u64,
    /// IDs currently remembered.
    pub tracked: usize,
}

#[derive(Default)]
struct IssuedIds {
    seen: HashSet<String>,
    count: usize,
    stats: GeneratorStats,
}

impl IssuedIds {
    fn reset(&mut self) {
        self.seen.clear();
        self.count = 0;
        self.stats.resets += 1;
    }
}

/// Generates identifiers that are unique within this instance's memory.
///
/// `generate` calls are serialized by one lock per instance: candidate
/// generation and the check-then-insert into the issued set never interleave.
/// Independent instances share nothing but the OS random source.
///
/// When the issued-ID memory reaches the configured cap it is cleared in one
/// step, after which previously issued IDs may be returned again.
pub struct Generator {
    config: GeneratorConfig,
    random: Arc<dyn SecureRandom>,
    state: Mutex<IssuedIds>,
}

impl Generator {
    /// Creates a generator drawing from the OS CSPRNG.
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_random(config, Arc::new(OsRandom))
    }

    /// Creates a generator drawing from a caller-supplied random source.
    pub fn with_random(config: GeneratorConfig, random: Arc<dyn SecureRandom>) -> Self {
        Self {
            config,
            random,
            state: Mutex::new(IssuedIds::default()),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn lock_state(&self) -> MutexGuard<'_, IssuedIds> {
        // State is updated in single steps, so it is consistent even if a
        // previous holder panicked.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Generates one identifier not currently in the issued-ID memory.
    ///
    /// The effective deadline is the earlier of `ctx`'s deadline and the
    /// configured maximum generation time.
    pub fn generate(&self, ctx: &Context) -> Result<String, GenerateError> {
        let mut state = self.lock_state();
        let result = self.generate_locked(&mut state, ctx);

        match &result {
            Ok(id) => {
                state.stats.issued += 1;
                tracing::trace!(len = id.chars().count(), "Issued ID");
            }
            Err(GenerateError::GenerationTimeout) => {
                state.stats.timeouts += 1;
                tracing::warn!(tracked = state.count, "ID generation timed out");
            }
            Err(_) => {}
        }
        result
    }

    fn generate_locked(&self, state: &mut IssuedIds, ctx: &Context) -> Result<String, GenerateError> {
        self.config.validate()?;

        let ctx = ctx.with_timeout(self.config.max_generation_time());

        let samples = entropy::collect(self.config.sources(), &ctx)
            .map_err(GenerateError::from_entropy)?;
        let seed = samples.concat().into_bytes();

        let max_attempts = math::max_attempts(
            self.config.alphabet().len(),
            self.config.size(),
            self.config.uniqueness_pressure(),
        );

        if let Some(cap) = self.config.max_issued() {
            if state.count >= cap {
                tracing::debug!(cap, "Issued-ID memory full, resetting");
                state.reset();
            }
        }

        for attempt in 0..max_attempts {
            if attempt % CONTEXT_CHECK_INTERVAL == 0 && ctx.is_done() {
                return Err(GenerateError::GenerationTimeout);
            }

            let candidate = self.candidate(&seed, &ctx)?;
            if state.seen.insert(candidate.clone()) {
                state.count += 1;
                return Ok(candidate);
            }

            state.stats.collisions += 1;
            tracing::trace!(attempt, "Candidate already issued, retrying");
        }

        tracing::warn!(max_attempts, "Attempt bound exhausted");
        Err(GenerateError::GenerationTimeout)
    }

    /// Draws one candidate: a uniform index per position, shifted by the
    /// seed byte at that position and reduced modulo the alphabet length.
    fn candidate(&self, seed: &[u8], ctx: &Context) -> Result<String, GenerateError> {
        let alphabet = self.config.alphabet();
        let len = alphabet.len();

        (0..self.config.size())
            .map(|i| -> Result<char, GenerateError> {
                let drawn = self
                    .random
                    .uniform_below(ctx, len)
                    .map_err(GenerateError::from_random)?;
                let index = match seed.len() {
                    0 => drawn,
                    n => (drawn + usize::from(seed[i % n])) % len,
                };
                Ok(alphabet.symbol(index))
            })
            .collect()
    }

    /// Like [`generate`](Self::generate), but panics on error.
    ///
    /// # Panics
    ///
    /// Panics if generation fails for any reason.
    pub fn must_generate(&self, ctx: &Context) -> String {
        self.generate(ctx)
            .unwrap_or_else(|e| panic!("ID generation failed: {e}"))
    }

    /// Returns true if `id` has the configured length and only uses
    /// alphabet symbols. Says nothing about whether it was issued.
    pub fn validate(&self, id: &str) -> bool {
        let alphabet = self.config.alphabet();
        id.chars().count() == self.config.size() && id.chars().all(|c| alphabet.contains(c))
    }

    /// Birthday-bound probability that `n` IDs from this configuration are
    /// pairwise distinct.
    pub fn uniqueness_probability(&self, n: u64) -> f64 {
        math::uniqueness_probability(self.config.alphabet().len(), self.config.size(), n)
    }

    /// Number of IDs currently in the issued-ID memory.
    pub fn issued_count(&self) -> usize {
        self.lock_state().count
    }

    /// Returns a snapshot of the running counters.
    pub fn stats(&self) -> GeneratorStats {
        let state = self.lock_state();
        GeneratorStats {
            tracked: state.seen.len(),
            ..state.stats
        }
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("config", &self.config)
            .field("issued", &self.issued_count())
            .finish_non_exhaustive()
    }
}
