//! `SeaORM` entity definitions for the ledger tables.
//!
//! Status-like columns are stored as strings and converted through the
//! closed enums in `kontor-core`; unknown values are rejected at the
//! repository boundary, never silently defaulted.

pub mod audit_log;
pub mod bank_accounts;
pub mod bank_transactions;
pub mod documents;
pub mod expenses;
pub mod invoice_line_items;
pub mod invoices;
pub mod number_sequences;
pub mod payments;
