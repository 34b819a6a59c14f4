//! ID validation and string utilities.
//!
//! The validator is an optional post-filter for generated IDs; the
//! generator never depends on it.

mod compare;
mod rules;

pub use compare::{sanitize_id, secure_compare};
pub use rules::{CharClassRequirement, IdValidator, ValidationError, Violation};
