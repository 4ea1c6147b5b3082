//! Error types for number allocation.

use thiserror::Error;

/// Errors for the numbering authority.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberingError {
    /// Transient allocation failure (lock timeout, connection loss).
    ///
    /// Retryable — but the caller retries the whole finalization, never by
    /// reusing a previously read counter value.
    #[error("number allocation failed: {reason}")]
    AllocationFailed {
        /// What went wrong.
        reason: String,
    },
}
