//! Secure random index sources.
//!
//! Wraps the OS CSPRNG (and a seedable ChaCha20 variant) behind a
//! `uniform_below` interface that respects the caller's [`Context`](crate::Context).

mod secure;

pub use secure::{OsRandom, RandomError, SecureRandom, SeededRandom};
