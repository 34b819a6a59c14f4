//! Test doubles for entropy and randomness.

use crate::context::Context;
use crate::entropy::{EntropyError, EntropySource};
use crate::rng::{RandomError, SecureRandom};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Always returns the same sample.
pub(crate) struct FixedSource(String);

impl FixedSource {
    pub(crate) fn new(sample: &str) -> Self {
        Self(sample.to_string())
    }
}

impl EntropySource for FixedSource {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn produce(&self, _ctx: &Context) -> Result<String, EntropyError> {
        Ok(self.0.clone())
    }
}

/// Always fails.
pub(crate) struct FailingSource;

impl EntropySource for FailingSource {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn produce(&self, _ctx: &Context) -> Result<String, EntropyError> {
        Err(EntropyError::failed(self.name(), "sensor offline"))
    }
}

/// Returns a fixed sample and counts how often it was asked.
pub(crate) struct CountingSource {
    sample: String,
    pub(crate) calls: AtomicUsize,
}

impl CountingSource {
    pub(crate) fn new(sample: &str) -> Self {
        Self {
            sample: sample.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl EntropySource for CountingSource {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn produce(&self, _ctx: &Context) -> Result<String, EntropyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.sample.clone())
    }
}

/// Cancels the context it is sampled under, then succeeds.
pub(crate) struct CancellingSource;

impl EntropySource for CancellingSource {
    fn name(&self) -> &'static str {
        "cancelling"
    }

    fn produce(&self, ctx: &Context) -> Result<String, EntropyError> {
        ctx.cancel();
        Ok(String::new())
    }
}

/// Replays a fixed script of draws (cycling) and counts them.
pub(crate) struct ScriptedRandom {
    script: Vec<usize>,
    next: Mutex<usize>,
    pub(crate) draws: AtomicUsize,
}

impl ScriptedRandom {
    pub(crate) fn new(script: &[usize]) -> Self {
        assert!(!script.is_empty(), "script must not be empty");
        Self {
            script: script.to_vec(),
            next: Mutex::new(0),
            draws: AtomicUsize::new(0),
        }
    }
}

impl SecureRandom for ScriptedRandom {
    fn uniform_below(&self, _ctx: &Context, bound: usize) -> Result<usize, RandomError> {
        if bound == 0 {
            return Err(RandomError::EmptyRange);
        }
        let mut next = self.next.lock().unwrap();
        let value = self.script[*next % self.script.len()];
        *next += 1;
        self.draws.fetch_add(1, Ordering::SeqCst);
        Ok(value % bound)
    }
}

/// Always draws 0 and cancels the context on draw number `cancel_at`.
pub(crate) struct CancelAfterRandom {
    cancel_at: usize,
    pub(crate) draws: AtomicUsize,
}

impl CancelAfterRandom {
    pub(crate) fn new(cancel_at: usize) -> Self {
        Self {
            cancel_at,
            draws: AtomicUsize::new(0),
        }
    }
}

impl SecureRandom for CancelAfterRandom {
    fn uniform_below(&self, ctx: &Context, bound: usize) -> Result<usize, RandomError> {
        if bound == 0 {
            return Err(RandomError::EmptyRange);
        }
        let draws = self.draws.fetch_add(1, Ordering::SeqCst) + 1;
        if draws >= self.cancel_at {
            ctx.cancel();
        }
        Ok(0)
    }
}
