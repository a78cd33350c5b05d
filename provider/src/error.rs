//! Provider error handling
//!
//! Missing domain data is never an error (derived fields degrade to `None`
//! in the core crate). Errors here are collaborator-level: a store or
//! oracle call that failed outright, a setup failure that prevents a whole
//! pass, or cancellation of a superseded task.

use thiserror::Error;

/// Failure reported by a backend day store implementation
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Day store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to decode stored day: {0}")]
    Decode(String),
}

/// Failure reported by a health-platform oracle implementation
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Health platform permission denied")]
    PermissionDenied,

    #[error("Health platform unavailable: {0}")]
    Unavailable(String),
}

/// Top-level provider error
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// A setup-level failure: the set of dates to process could not be
    /// resolved at all. Per-date failures never surface here.
    #[error("Setup error: {0}")]
    Setup(String),

    /// The running task was superseded. Not user-facing.
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl ProviderError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProviderError::Cancelled)
    }
}

/// Result type alias for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_predicate() {
        assert!(ProviderError::Cancelled.is_cancelled());
        assert!(!ProviderError::Setup("no dates".into()).is_cancelled());
    }

    #[test]
    fn test_store_error_converts() {
        let error: ProviderError = StoreError::Unavailable("offline".into()).into();
        assert!(matches!(error, ProviderError::Store(_)));
    }
}
