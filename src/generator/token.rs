//! One-shot helpers built on the generator and the secure random source.

use super::config::GeneratorConfig;
use super::issuer::Generator;
use crate::context::Context;
use crate::rng::{OsRandom, RandomError, SecureRandom};

/// RFC 4648 base32 alphabet used by [`secure_token`].
pub const BASE32_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Returns `length` random base32 characters from the OS CSPRNG.
///
/// Tokens are not tracked for uniqueness.
pub fn secure_token(length: usize) -> Result<String, RandomError> {
    secure_token_with(&OsRandom, &Context::background(), length)
}

/// Like [`secure_token`], drawing from `random` under `ctx`.
pub fn secure_token_with(
    random: &dyn SecureRandom,
    ctx: &Context,
    length: usize,
) -> Result<String, RandomError> {
    let symbols = BASE32_ALPHABET.as_bytes();
    (0..length)
        .map(|_| -> Result<char, RandomError> {
            let index = random.uniform_below(ctx, symbols.len())?;
            Ok(char::from(symbols[index]))
        })
        .collect()
}

/// Like [`secure_token`], but panics on error.
///
/// # Panics
///
/// Panics if the random source fails.
pub fn must_secure_token(length: usize) -> String {
    secure_token(length).unwrap_or_else(|e| panic!("token generation failed: {e}"))
}

/// Returns true if `id` is exactly `size` characters, all taken from `alphabet`.
pub fn is_valid_id(id: &str, alphabet: &str, size: usize) -> bool {
    id.chars().count() == size && id.chars().all(|c| alphabet.contains(c))
}

/// Generates one ID with a fresh default generator.
///
/// # Panics
///
/// Panics if generation fails.
pub fn generate() -> String {
    Generator::default().must_generate(&Context::background())
}

/// Generates one ID of `size` characters with a fresh default generator.
///
/// # Panics
///
/// Panics if `size` is zero or generation fails.
pub fn generate_with_size(size: usize) -> String {
    let config = GeneratorConfig::builder().size(size).build();
    Generator::new(config).must_generate(&Context::background())
}
