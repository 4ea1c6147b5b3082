//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Core modules define their own `thiserror` enums; this is the cross-crate
/// taxonomy they convert into at the application boundary, one variant per
/// user-visible class of failure.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input, rejected before any write.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Attempted mutation of frozen fields on a non-draft ledger entity.
    #[error("Immutable ledger entry: {0}")]
    Immutable(String),

    /// Illegal status transition.
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Transient document number allocation failure; the caller retries the
    /// whole transition.
    #[error("Number allocation failed: {0}")]
    NumberAllocation(String),

    /// Payment would overdraw the invoice.
    #[error("Payment exceeds outstanding balance: {0}")]
    PaymentExceedsOutstanding(String),

    /// Two concurrent match attempts on one bank transaction.
    #[error("Reconciliation conflict: {0}")]
    ReconciliationConflict(String),

    /// Attempted purge of an entity inside its retention window.
    #[error("Retention violation: {0}")]
    RetentionViolation(String),

    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (e.g., duplicate entry, stale state).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// External service error (storage, sync) — degraded, never a rollback
    /// of the committed local mutation.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Immutable(_) | Self::InvalidTransition(_) | Self::RetentionViolation(_) => 422,
            Self::Conflict(_)
            | Self::PaymentExceedsOutstanding(_)
            | Self::ReconciliationConflict(_) => 409,
            Self::NumberAllocation(_) => 503,
            Self::Database(_) | Self::ExternalService(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Immutable(_) => "IMMUTABLE_LEDGER_ENTRY",
            Self::InvalidTransition(_) => "INVALID_TRANSITION",
            Self::NumberAllocation(_) => "NUMBER_ALLOCATION_FAILED",
            Self::PaymentExceedsOutstanding(_) => "PAYMENT_EXCEEDS_OUTSTANDING",
            Self::ReconciliationConflict(_) => "RECONCILIATION_CONFLICT",
            Self::RetentionViolation(_) => "RETENTION_VIOLATION",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if retrying the same operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NumberAllocation(_) | Self::Database(_) | Self::ExternalService(_)
        )
    }
}

impl From<crate::actor::AccessDenied> for AppError {
    fn from(err: crate::actor::AccessDenied) -> Self {
        Self::Forbidden(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::Forbidden(String::new()).status_code(), 403);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Immutable(String::new()).status_code(), 422);
        assert_eq!(AppError::InvalidTransition(String::new()).status_code(), 422);
        assert_eq!(AppError::RetentionViolation(String::new()).status_code(), 422);
        assert_eq!(
            AppError::PaymentExceedsOutstanding(String::new()).status_code(),
            409
        );
        assert_eq!(
            AppError::ReconciliationConflict(String::new()).status_code(),
            409
        );
        assert_eq!(AppError::NumberAllocation(String::new()).status_code(), 503);
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            AppError::Immutable(String::new()).error_code(),
            "IMMUTABLE_LEDGER_ENTRY"
        );
        assert_eq!(
            AppError::NumberAllocation(String::new()).error_code(),
            "NUMBER_ALLOCATION_FAILED"
        );
        assert_eq!(
            AppError::RetentionViolation(String::new()).error_code(),
            "RETENTION_VIOLATION"
        );
    }

    #[test]
    fn test_retryability() {
        assert!(AppError::NumberAllocation(String::new()).is_retryable());
        assert!(AppError::ExternalService(String::new()).is_retryable());
        assert!(!AppError::Validation(String::new()).is_retryable());
        assert!(!AppError::RetentionViolation(String::new()).is_retryable());
    }
}
