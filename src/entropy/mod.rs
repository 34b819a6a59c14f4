//! Auxiliary entropy sources and their aggregation.
//!
//! Sources produce non-secret string samples that are folded into ID
//! generation on top of the OS CSPRNG. Any type implementing
//! [`EntropySource`] can be supplied alongside the built-in ones.

mod aggregator;
mod source;
mod sources;

pub use aggregator::{collect, default_aggregator_sources, SecureAggregator};
pub use source::{EntropyError, EntropySource};
pub use sources::{
    default_sources, source_by_name, AggregateHashSource, NetworkMacSource, RandomBytesSource,
    SystemStatsSource, TimestampSource, UuidSource, DEFAULT_RANDOM_BYTES,
};
