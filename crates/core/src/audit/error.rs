//! Error types for the audit journal.

use thiserror::Error;

/// Errors for audit recording.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    /// Action outside the closed {create, update, delete, status_change} set.
    #[error("invalid audit action '{action}'")]
    InvalidAction {
        /// The rejected action string.
        action: String,
    },

    /// Snapshots passed to the differ must be JSON objects.
    #[error("audit snapshots must be JSON objects")]
    NonObjectSnapshot,
}
