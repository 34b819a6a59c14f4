//! Descriptive analysis of generated IDs.

mod report;

pub use report::{CharClassCounts, ComplexityReport};
