//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the ledger tables
//! - Repository abstractions that compose `kontor-core` rules into atomic
//!   transactions (entity write + audit write succeed or fail together)
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AuditRepository, BankTransactionRepository, DocumentRepository, ExpenseRepository,
    InvoiceRepository, NumberSequenceRepository, RetentionRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
