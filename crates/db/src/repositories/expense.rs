//! Expense repository.
//!
//! Expenses are the outflow counterparts of invoices in reconciliation.
//! They are soft-deleted like invoices so their audit trail and retention
//! window stay intact.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use kontor_core::audit::{AuditAction, AuditEntityType, AuditEntry};
use kontor_core::invoice::types::Expense;
use kontor_shared::actor::ActorContext;
use kontor_shared::types::{BankAccountId, ExpenseId, OrganizationId};

use crate::entities::expenses;
use crate::repositories::audit::AuditRepository;

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// Expense not found.
    #[error("expense not found: {0}")]
    NotFound(Uuid),

    /// Expense amount must be strictly positive.
    #[error("expense amount must be positive")]
    NonPositiveAmount,

    /// Expense is already soft-deleted.
    #[error("expense {0} is already deleted")]
    AlreadyDeleted(Uuid),

    /// Snapshot serialization failed.
    #[error("snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Owning tenant.
    pub organization_id: OrganizationId,
    /// What was paid for.
    pub description: String,
    /// Amount, must be positive.
    pub amount: Decimal,
    /// Date of the expense.
    pub expense_date: NaiveDate,
    /// Receipt or voucher number, used by reconciliation matching.
    pub receipt_number: Option<String>,
    /// Account the expense was paid from, if known.
    pub bank_account_id: Option<BankAccountId>,
}

/// Repository for expenses.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an expense with its audit entry.
    ///
    /// # Errors
    ///
    /// Returns `NonPositiveAmount` for a zero or negative amount.
    pub async fn create(
        &self,
        input: CreateExpenseInput,
        actor: &ActorContext,
    ) -> Result<Expense, ExpenseError> {
        if input.amount <= Decimal::ZERO {
            return Err(ExpenseError::NonPositiveAmount);
        }

        let expense = Expense {
            id: ExpenseId::new(),
            organization_id: input.organization_id,
            description: input.description,
            amount: input.amount,
            expense_date: input.expense_date,
            receipt_number: input.receipt_number,
            bank_account_id: input.bank_account_id,
            deleted_at: None,
        };

        let txn = self.db.begin().await?;
        expense_to_model(&expense).insert(&txn).await?;

        let entry = AuditEntry::new(
            AuditEntityType::Expense,
            expense.id.into_inner(),
            AuditAction::Create,
            None,
            Some(serde_json::to_value(&expense)?),
            actor.clone(),
        );
        AuditRepository::record(&txn, &entry).await?;
        txn.commit().await?;

        Ok(expense)
    }

    /// Loads one expense.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn find(&self, expense_id: ExpenseId) -> Result<Expense, ExpenseError> {
        let model = expenses::Entity::find_by_id(expense_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::NotFound(expense_id.into_inner()))?;
        Ok(model_to_domain(model))
    }

    /// Lists live expenses for a tenant, newest first.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn list(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Expense>, ExpenseError> {
        let rows = expenses::Entity::find()
            .filter(expenses::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(expenses::Column::DeletedAt.is_null())
            .order_by_desc(expenses::Column::ExpenseDate)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(model_to_domain).collect())
    }

    /// Soft-deletes an expense, keeping the row for the retention window.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyDeleted` when called twice.
    pub async fn soft_delete(
        &self,
        expense_id: ExpenseId,
        actor: &ActorContext,
    ) -> Result<(), ExpenseError> {
        let txn = self.db.begin().await?;
        let model = expenses::Entity::find_by_id(expense_id.into_inner())
            .one(&txn)
            .await?
            .ok_or(ExpenseError::NotFound(expense_id.into_inner()))?;
        if model.deleted_at.is_some() {
            return Err(ExpenseError::AlreadyDeleted(expense_id.into_inner()));
        }

        let expense = model_to_domain(model.clone());
        let mut active: expenses::ActiveModel = model.into();
        active.deleted_at = Set(Some(Utc::now().into()));
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await?;

        let entry = AuditEntry::new(
            AuditEntityType::Expense,
            expense_id.into_inner(),
            AuditAction::Delete,
            Some(serde_json::to_value(&expense)?),
            None,
            actor.clone(),
        );
        AuditRepository::record(&txn, &entry).await?;
        txn.commit().await?;
        Ok(())
    }
}

fn expense_to_model(expense: &Expense) -> expenses::ActiveModel {
    let now = Utc::now();
    expenses::ActiveModel {
        id: Set(expense.id.into_inner()),
        organization_id: Set(expense.organization_id.into_inner()),
        description: Set(expense.description.clone()),
        amount: Set(expense.amount),
        expense_date: Set(expense.expense_date),
        receipt_number: Set(expense.receipt_number.clone()),
        bank_account_id: Set(expense.bank_account_id.map(BankAccountId::into_inner)),
        deleted_at: Set(expense.deleted_at.map(Into::into)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
}

fn model_to_domain(model: expenses::Model) -> Expense {
    Expense {
        id: ExpenseId::from_uuid(model.id),
        organization_id: OrganizationId::from_uuid(model.organization_id),
        description: model.description,
        amount: model.amount,
        expense_date: model.expense_date,
        receipt_number: model.receipt_number,
        bank_account_id: model.bank_account_id.map(BankAccountId::from_uuid),
        deleted_at: model.deleted_at.map(Into::into),
    }
}
