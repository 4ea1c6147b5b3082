//! Error types for retention and purging.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors for retention operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetentionError {
    /// The entity is still inside its mandatory retention window. There is
    /// no caller flag that overrides this.
    #[error("entity is retained until {expires_on}, refusing to purge")]
    StillRetained {
        /// Last day of the retention window.
        expires_on: NaiveDate,
    },

    /// Only soft-deleted entities are purge candidates.
    #[error("entity is not deleted, nothing to purge")]
    NotDeleted,
}
