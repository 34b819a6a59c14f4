//! The entropy source capability.

use crate::context::{Context, ContextError};
use thiserror::Error;

/// Errors raised while collecting entropy samples.
#[derive(Debug, Error)]
pub enum EntropyError {
    #[error("entropy collection interrupted: {0}")]
    Interrupted(#[from] ContextError),
    #[error("{name}: I/O error: {error}")]
    Io {
        name: &'static str,
        #[source]
        error: std::io::Error,
    },
    #[error("{name}: random bytes unavailable: {message}")]
    Random { name: &'static str, message: String },
    #[error("{name}: {message}")]
    Failed { name: &'static str, message: String },
    #[error("entropy source `{0}` panicked")]
    Panicked(&'static str),
    #[error("entropy collection errors: [{}]", join_errors(.0))]
    Aggregate(Vec<EntropyError>),
}

impl EntropyError {
    /// Convenience constructor for custom source failures.
    pub fn failed(name: &'static str, message: impl Into<String>) -> Self {
        Self::Failed {
            name,
            message: message.into(),
        }
    }

    /// Returns true if the error was caused by a cancelled or expired context,
    /// directly or in every member of an aggregate.
    pub fn is_interrupted(&self) -> bool {
        match self {
            Self::Interrupted(_) => true,
            Self::Aggregate(errors) => !errors.is_empty() && errors.iter().all(Self::is_interrupted),
            _ => false,
        }
    }
}

fn join_errors(errors: &[EntropyError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A provider of non-secret, time- or environment-varying string samples.
///
/// Samples supplement the cryptographic generator; they are never the sole
/// source of randomness. Implementations may perform I/O and should observe
/// `ctx` between blocking steps.
pub trait EntropySource: Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Produces one sample.
    fn produce(&self, ctx: &Context) -> Result<String, EntropyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_message_lists_members() {
        let err = EntropyError::Aggregate(vec![
            EntropyError::failed("a", "boom"),
            EntropyError::Panicked("b"),
        ]);
        assert_eq!(
            err.to_string(),
            "entropy collection errors: [a: boom; entropy source `b` panicked]"
        );
    }

    #[test]
    fn test_interrupted_detection() {
        assert!(EntropyError::Interrupted(ContextError::Cancelled).is_interrupted());
        assert!(EntropyError::Aggregate(vec![EntropyError::Interrupted(
            ContextError::DeadlineExceeded
        )])
        .is_interrupted());
        assert!(!EntropyError::Aggregate(vec![
            EntropyError::Interrupted(ContextError::Cancelled),
            EntropyError::failed("x", "y"),
        ])
        .is_interrupted());
        assert!(!EntropyError::Aggregate(Vec::new()).is_interrupted());
    }
}
