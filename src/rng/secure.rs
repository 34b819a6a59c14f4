//! Uniform index sources backed by cryptographic generators.
//!
//! The OS generator is the primary randomness for every identifier. Entropy
//! samples are mixed on top of it but never replace it.

use crate::context::{Context, ContextError};
use rand::distributions::{Distribution, Uniform};
use rand_chacha::ChaCha20Rng;
use rand_core::{OsRng, RngCore, SeedableRng};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Errors that can occur while drawing random indices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RandomError {
    #[error("cannot draw below an upper bound of zero")]
    EmptyRange,
    #[error("random draw interrupted: {0}")]
    Interrupted(#[from] ContextError),
}

/// A source of integers uniformly distributed over `[0, bound)`.
///
/// Implementations must be uniform by construction (rejection sampling or
/// equivalent), never a plain modulo of a fixed-width integer.
pub trait SecureRandom: Send + Sync {
    /// Draws one integer uniformly from `[0, bound)`.
    fn uniform_below(&self, ctx: &Context, bound: usize) -> Result<usize, RandomError>;
}

/// The operating system CSPRNG.
///
/// Stateless; one instance can be shared across threads and generators.
/// Draws do not block in practice, so the context is not consulted per draw.
///
/// # Panics
///
/// Panics if the operating system's random source fails. The only error
/// returned is [`RandomError::EmptyRange`] for a zero bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl SecureRandom for OsRandom {
    fn uniform_below(&self, _ctx: &Context, bound: usize) -> Result<usize, RandomError> {
        if bound == 0 {
            return Err(RandomError::EmptyRange);
        }
        Ok(Uniform::new(0, bound).sample(&mut OsRng))
    }
}

/// ChaCha20-backed source with a fixed seed.
///
/// Output is reproducible for a given seed, which makes it suitable for
/// simulations and benchmarks. Seed it from the OS for anything else.
pub struct SeededRandom {
    inner: Mutex<ChaCha20Rng>,
}

impl SeededRandom {
    /// Creates a source from a known seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            inner: Mutex::new(ChaCha20Rng::from_seed(seed)),
        }
    }

    /// Creates a source seeded from the OS entropy source.
    pub fn from_os_entropy() -> Self {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        Self::from_seed(seed)
    }
}

impl SecureRandom for SeededRandom {
    fn uniform_below(&self, ctx: &Context, bound: usize) -> Result<usize, RandomError> {
        if bound == 0 {
            return Err(RandomError::EmptyRange);
        }
        if ctx.is_cancelled() {
            return Err(RandomError::Interrupted(ContextError::Cancelled));
        }
        let mut rng = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Uniform::new(0, bound).sample(&mut *rng))
    }
}

impl std::fmt::Debug for SeededRandom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeededRandom").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_random_in_range() {
        let ctx = Context::background();
        for _ in 0..1000 {
            let value = OsRandom.uniform_below(&ctx, 7).unwrap();
            assert!(value < 7);
        }
    }

    #[test]
    fn test_zero_bound_rejected() {
        let ctx = Context::background();
        assert_eq!(OsRandom.uniform_below(&ctx, 0), Err(RandomError::EmptyRange));
        assert_eq!(
            SeededRandom::from_seed([1; 32]).uniform_below(&ctx, 0),
            Err(RandomError::EmptyRange)
        );
    }

    #[test]
    fn test_bound_of_one_always_zero() {
        let ctx = Context::background();
        assert_eq!(OsRandom.uniform_below(&ctx, 1), Ok(0));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let ctx = Context::background();
        let a = SeededRandom::from_seed([0x42; 32]);
        let b = SeededRandom::from_seed([0x42; 32]);

        let draws_a: Vec<usize> = (0..32).map(|_| a.uniform_below(&ctx, 62).unwrap()).collect();
        let draws_b: Vec<usize> = (0..32).map(|_| b.uniform_below(&ctx, 62).unwrap()).collect();

        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn test_seeded_respects_cancellation() {
        let ctx = Context::background();
        ctx.cancel();

        let result = SeededRandom::from_os_entropy().uniform_below(&ctx, 10);
        assert_eq!(result, Err(RandomError::Interrupted(ContextError::Cancelled)));
    }

    #[test]
    fn test_os_random_covers_every_index() {
        let ctx = Context::background();
        let mut seen = [false; 4];
        for _ in 0..1000 {
            seen[OsRandom.uniform_below(&ctx, 4).unwrap()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
