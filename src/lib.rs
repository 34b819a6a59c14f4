//! Short, URL-safe identifiers from the OS CSPRNG with auxiliary entropy mixing.
//!
//! Every symbol of an ID is a uniform draw from the secure random source,
//! shifted by a byte of a seed assembled from pluggable entropy sources. A
//! [`Generator`] remembers what it has issued and retries on repeats, bounded
//! by an attempt budget and a per-call deadline.
//!
//! # Architecture
//!
//! ```text
//! entropy sources → seed ─┐
//!                         ├→ generator (retry loop, issued set) → ID
//! rng (OS CSPRNG) ────────┘
//!                              validate / analysis (optional post-filters)
//! ```
//!
//! # Design Principles
//!
//! - **CSPRNG first**: auxiliary entropy only shifts indices; it never
//!   replaces the OS random source
//! - **Per-instance uniqueness**: the issued set is bounded and is cleared
//!   once the cap is reached
//! - **Bounded work**: every call ends within its attempt budget or deadline
//!
//! # Example
//!
//! ```no_run
//! use idforge::{Context, Generator, GeneratorConfig, IdValidator};
//! use std::time::Duration;
//!
//! let config = GeneratorConfig::builder()
//!     .size(16)
//!     .max_generation_time(Duration::from_millis(500))
//!     .build();
//! let generator = Generator::new(config);
//!
//! let ctx = Context::background();
//! let id = generator.generate(&ctx).unwrap();
//! assert_eq!(id.len(), 16);
//!
//! if let Err(e) = IdValidator::default().validate(&id) {
//!     eprintln!("weak ID: {e}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod conditioning;
pub mod context;
pub mod entropy;
pub mod generator;
pub mod metrics;
pub mod rng;
pub mod validate;

#[cfg(test)]
mod testing;

// Re-export commonly used types at crate root
pub use analysis::ComplexityReport;
pub use context::{Context, ContextError};
pub use entropy::{EntropyError, EntropySource, SecureAggregator};
pub use generator::{
    generate, generate_with_size, is_valid_id, must_secure_token, secure_token, Alphabet,
    ConfigError, FileConfig, GenerateError, Generator, GeneratorConfig, GeneratorStats,
};
pub use rng::{OsRandom, RandomError, SecureRandom, SeededRandom};
pub use validate::{sanitize_id, secure_compare, IdValidator, ValidationError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
