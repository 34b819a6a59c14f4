//! Identifier generation core.
//!
//! [`Generator`] combines a uniform index from the secure random source with
//! an entropy-derived mixing seed for every symbol, rejects candidates it has
//! already issued, and gives up after a bounded number of attempts or when
//! its deadline passes.

mod config;
mod issuer;
mod math;
mod token;

pub use config::{
    Alphabet, ConfigError, FileConfig, GeneratorConfig, GeneratorConfigBuilder, GeneratorSection,
    ValidatorSection, DEFAULT_ALPHABET, DEFAULT_MAX_GENERATION_TIME, DEFAULT_MAX_ISSUED,
    DEFAULT_SIZE, DEFAULT_UNIQUENESS_PRESSURE,
};
pub use issuer::{GenerateError, Generator, GeneratorStats, CONTEXT_CHECK_INTERVAL};
pub use math::{id_space, max_attempts, uniqueness_probability, MAX_ATTEMPTS};
pub use token::{
    generate, generate_with_size, is_valid_id, must_secure_token, secure_token,
    secure_token_with, BASE32_ALPHABET,
};
