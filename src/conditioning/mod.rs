//! Entropy conditioning via cryptographic hashing.
//!
//! Used by the aggregate entropy paths to turn concatenated samples into a
//! fixed-length digest. The per-generate mixing path does not hash.

mod hash;

pub use hash::{Conditioner, Digest256, HashAlgorithm};
