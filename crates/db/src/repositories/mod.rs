//! Repository abstractions for data access.
//!
//! Repositories compose the pure rules from `kontor-core` into atomic
//! database transactions. Every mutating operation on a ledger entity
//! writes its audit entry inside the same transaction as the entity change.

pub mod audit;
pub mod bank_transaction;
pub mod document;
pub mod expense;
pub mod invoice;
pub mod number_sequence;
pub mod retention;

#[cfg(test)]
mod invoice_integration_tests;
#[cfg(test)]
mod reconciliation_integration_tests;

pub use audit::{AuditRepoError, AuditRepository};
pub use bank_transaction::{
    BankTransactionError, BankTransactionRepository, ImportLine, ImportOutcome,
};
pub use document::{DocumentRepoError, DocumentRepository};
pub use expense::{CreateExpenseInput, ExpenseError, ExpenseRepository};
pub use invoice::{
    CreateInvoiceInput, InvoiceRepoError, InvoiceRepository, LineItemInput, UpdateInvoiceInput,
};
pub use number_sequence::NumberSequenceRepository;
pub use retention::{RetentionRepoError, RetentionRepository};
