//! Error types for the compliance state machine.

use thiserror::Error;

use crate::invoice::types::InvoiceStatus;

/// Errors for invoice status transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The requested transition is not in the allowed edge set. Names both
    /// the current and the attempted status.
    #[error("invalid transition from '{from}' to '{to}'")]
    InvalidTransition {
        /// Current status.
        from: InvoiceStatus,
        /// Attempted status.
        to: InvoiceStatus,
    },

    /// Paid/partial/overdue are derived from payment state, never set
    /// directly by a user action.
    #[error("status '{to}' is derived from payment state and cannot be set directly")]
    DerivedStatus {
        /// Attempted status.
        to: InvoiceStatus,
    },

    /// Finalization requires a document number; the transition aborts when
    /// allocation did not happen.
    #[error("cannot mark invoice as sent without an allocated document number")]
    NumberMissing,
}
