//! Error types for ledger entity operations.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::InvoiceStatus;

/// Errors for invoice, line item, and payment operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvoiceError {
    /// An invoice needs at least one line item to be finalized.
    #[error("invoice has no line items")]
    NoLineItems,

    /// Line item quantity must be strictly positive.
    #[error("line {position}: quantity must be positive")]
    NonPositiveQuantity {
        /// Offending line position.
        position: u32,
    },

    /// Line item unit price must be non-negative.
    #[error("line {position}: unit price must not be negative")]
    NegativeUnitPrice {
        /// Offending line position.
        position: u32,
    },

    /// Line item tax rate must be non-negative.
    #[error("line {position}: tax rate must not be negative")]
    NegativeTaxRate {
        /// Offending line position.
        position: u32,
    },

    /// Discount percent must lie within 0..=100.
    #[error("line {position}: discount percent must be between 0 and 100")]
    DiscountOutOfRange {
        /// Offending line position.
        position: u32,
    },

    /// Line positions must be dense 1..N.
    #[error("line positions must be dense 1..N, found {found} at index {index}")]
    NonDensePositions {
        /// Position value found.
        found: u32,
        /// Zero-based index in the submitted list.
        index: usize,
    },

    /// Attempted mutation of frozen fields on a non-draft invoice.
    #[error("field '{field}' is immutable once invoice status is '{status}'")]
    ImmutableLedgerEntry {
        /// Field whose mutation was rejected.
        field: &'static str,
        /// Current invoice status.
        status: InvoiceStatus,
    },

    /// Payment amount must be strictly positive.
    #[error("payment amount must be positive")]
    NonPositivePayment,

    /// A payment that would overdraw the invoice is rejected whole.
    #[error(
        "payment of {amount} exceeds outstanding balance of {outstanding} on invoice {invoice}"
    )]
    PaymentExceedsOutstanding {
        /// Attempted payment amount.
        amount: Decimal,
        /// Outstanding balance at the time of the attempt.
        outstanding: Decimal,
        /// Invoice number or id shown to the user.
        invoice: String,
    },

    /// Payments can only be recorded against finalized invoices.
    #[error("cannot record a payment on a '{status}' invoice")]
    PaymentNotAllowed {
        /// Current invoice status.
        status: InvoiceStatus,
    },
}
