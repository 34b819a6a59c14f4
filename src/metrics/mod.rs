//! Prometheus metrics for ID generation.
//!
//! # Metrics Exposed
//!
//! - `idforge_ids_issued_total` - IDs issued
//! - `idforge_collisions_total` - candidates rejected as already issued
//! - `idforge_timeouts_total` - calls that ran out of time or attempts
//! - `idforge_issued_resets_total` - issued-ID memory resets
//! - `idforge_issued_tracked` - IDs currently remembered
//!
//! # Example
//!
//! ```no_run
//! use idforge::{Context, Generator};
//! use idforge::metrics::{MetricsRegistry, MetricsSnapshot};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//! let generator = Generator::default();
//! generator.generate(&Context::background()).unwrap();
//!
//! registry.update(&MetricsSnapshot::from_stats(&generator.stats()));
//! println!("{}", registry.encode().unwrap());
//! ```

mod collector;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
