//! Error types for reconciliation.

use thiserror::Error;

use super::types::ReconciliationStatus;

/// Errors for reconciliation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconciliationError {
    /// A concurrent attempt already claimed this transaction. The caller
    /// treats this as a no-op, never as a second match.
    #[error("transaction '{transaction}' was reconciled concurrently")]
    Conflict {
        /// The contended transaction.
        transaction: String,
    },

    /// Operation requires an unmatched transaction.
    #[error("transaction is '{status}', expected 'unmatched'")]
    NotUnmatched {
        /// Current status.
        status: ReconciliationStatus,
    },

    /// Confirmation requires an existing match.
    #[error("cannot confirm a transaction with status '{status}'")]
    NothingToConfirm {
        /// Current status.
        status: ReconciliationStatus,
    },

    /// A transaction may link to a payment or an expense, never both.
    #[error("transaction would link to both a payment and an expense")]
    AmbiguousLink,
}
