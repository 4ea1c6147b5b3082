//! Core business logic for Kontor.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here; the `kontor-db` crate composes them into atomic transactions.
//!
//! # Modules
//!
//! - `invoice` - Ledger entities (invoices, line items, payments, expenses)
//! - `lifecycle` - Compliance state machine for invoice status transitions
//! - `numbering` - Gap-free, year-scoped document number allocation
//! - `audit` - Append-only change journal types and field diffing
//! - `reconciliation` - Scored matching of bank transactions to open items
//! - `retention` - Retention-window policy and compliance exports
//! - `storage` - Generated-document storage and registry records

pub mod audit;
pub mod invoice;
pub mod lifecycle;
pub mod numbering;
pub mod reconciliation;
pub mod retention;
pub mod storage;
