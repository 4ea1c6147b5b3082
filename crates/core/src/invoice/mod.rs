//! Ledger entities: invoices, line items, payments, and expenses.
//!
//! This module implements the financially authoritative records:
//! - Domain types with status lifecycle
//! - Derived totals (recomputed, never independently edited)
//! - Draft validation rules
//! - Payment invariants (an invoice can never be overpaid)

pub mod error;
pub mod service;
pub mod totals;
pub mod types;

#[cfg(test)]
mod totals_props;

pub use error::InvoiceError;
pub use service::InvoiceService;
pub use totals::{compute_invoice_totals, compute_line_totals};
pub use types::{
    DocumentType, Expense, Invoice, InvoiceStatus, InvoiceTotals, LineItem, LineItemTotals,
    Payment, PaymentMethod,
};
