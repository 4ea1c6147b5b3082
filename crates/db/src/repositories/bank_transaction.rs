//! Bank transaction repository: statement import and reconciliation.
//!
//! Writes to a single transaction's `reconciliation_status` are serialized
//! with conditional updates — an update filtered on the status the caller
//! observed. Zero affected rows means a concurrent attempt won, surfaced as
//! `Conflict`, never as a silent double-match.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use kontor_core::audit::{AuditAction, AuditEntityType, AuditEntry};
use kontor_core::invoice::types::{InvoiceStatus, Payment, PaymentMethod};
use kontor_core::reconciliation::{
    self, BankTransaction, CandidateRef, MatchCandidate, MatchResult, ReconciliationEngine,
    ReconciliationError, ReconciliationStatus, ScoredCandidate,
};
use kontor_shared::actor::ActorContext;
use kontor_shared::config::ReconciliationConfig;
use kontor_shared::types::{BankAccountId, BankTransactionId, ExpenseId, InvoiceId, PaymentId};

use crate::entities::{bank_transactions, expenses, invoices, payments};
use crate::repositories::audit::AuditRepository;
use crate::repositories::invoice::{self as invoice_repo, InvoiceRepoError};

/// Error types for bank transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum BankTransactionError {
    /// Transaction not found.
    #[error("bank transaction not found: {0}")]
    NotFound(Uuid),

    /// A reconciliation rule rejected the operation.
    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),

    /// Recording the matched payment failed.
    #[error(transparent)]
    Invoice(#[from] InvoiceRepoError),

    /// A stored row could not be decoded into its domain type.
    #[error("corrupt bank transaction row: {0}")]
    CorruptRow(String),

    /// Snapshot serialization failed.
    #[error("snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// One statement line offered for import.
#[derive(Debug, Clone)]
pub struct ImportLine {
    /// Signed amount, positive = inflow.
    pub amount: Decimal,
    /// Booking date.
    pub booking_date: NaiveDate,
    /// Free-text purpose.
    pub purpose: String,
    /// Counterparty name, when the bank provides one.
    pub counterparty: Option<String>,
    /// Bank-supplied transaction id, unique per account.
    pub reference: String,
}

/// Result of a statement import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Lines inserted.
    pub imported: u64,
    /// Lines skipped because their reference was already present.
    pub skipped: u64,
}

/// Repository for imported bank transactions.
#[derive(Debug, Clone)]
pub struct BankTransactionRepository {
    db: DatabaseConnection,
    engine: ReconciliationEngine,
}

impl BankTransactionRepository {
    /// Creates a new bank transaction repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: ReconciliationConfig) -> Self {
        Self {
            db,
            engine: ReconciliationEngine::new(config),
        }
    }

    /// Imports statement lines for one account.
    ///
    /// Idempotent: a line whose bank reference already exists on the
    /// account is skipped, so re-running an import never duplicates rows.
    ///
    /// # Errors
    ///
    /// Returns a database error; nothing is imported partially.
    pub async fn import(
        &self,
        bank_account_id: BankAccountId,
        lines: Vec<ImportLine>,
        actor: &ActorContext,
    ) -> Result<ImportOutcome, BankTransactionError> {
        let txn = self.db.begin().await?;
        let mut outcome = ImportOutcome {
            imported: 0,
            skipped: 0,
        };

        for line in lines {
            let existing = bank_transactions::Entity::find()
                .filter(bank_transactions::Column::BankAccountId.eq(bank_account_id.into_inner()))
                .filter(bank_transactions::Column::Reference.eq(line.reference.clone()))
                .one(&txn)
                .await?;
            if existing.is_some() {
                outcome.skipped += 1;
                continue;
            }

            let transaction = BankTransaction {
                id: BankTransactionId::new(),
                bank_account_id,
                amount: line.amount,
                booking_date: line.booking_date,
                purpose: line.purpose,
                counterparty: line.counterparty,
                reference: line.reference,
                reconciliation_status: ReconciliationStatus::Unmatched,
                matched_payment_id: None,
                matched_expense_id: None,
            };
            transaction_to_model(&transaction).insert(&txn).await?;

            let entry = AuditEntry::new(
                AuditEntityType::BankTransaction,
                transaction.id.into_inner(),
                AuditAction::Create,
                None,
                Some(serde_json::to_value(&transaction)?),
                actor.clone(),
            );
            AuditRepository::record(&txn, &entry).await?;
            outcome.imported += 1;
        }

        txn.commit().await?;
        Ok(outcome)
    }

    /// Loads one transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database/decoding error.
    pub async fn find(
        &self,
        transaction_id: BankTransactionId,
    ) -> Result<BankTransaction, BankTransactionError> {
        load_transaction(&self.db, transaction_id).await
    }

    /// Ranked match suggestions for one transaction, best first.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn suggest(
        &self,
        transaction_id: BankTransactionId,
    ) -> Result<Vec<ScoredCandidate>, BankTransactionError> {
        let transaction = load_transaction(&self.db, transaction_id).await?;
        let candidates = self.load_candidates(&self.db, &transaction).await?;
        Ok(self.engine.suggest_matches(&transaction, &candidates))
    }

    /// Scores and, at or above the threshold, applies an automatic match.
    ///
    /// The transaction moves to `matched` — never `confirmed`; confirmation
    /// stays a distinct human action. Below the threshold the status is
    /// untouched and the ranked suggestions are returned.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` when a concurrent attempt claimed the transaction
    /// first; the caller treats that as a no-op.
    pub async fn auto_reconcile(
        &self,
        transaction_id: BankTransactionId,
        actor: &ActorContext,
    ) -> Result<MatchResult, BankTransactionError> {
        let txn = self.db.begin().await?;
        let transaction = load_transaction(&txn, transaction_id).await?;
        let candidates = self.load_candidates(&txn, &transaction).await?;

        let result = self.engine.auto_reconcile(&transaction, &candidates)?;
        if let MatchResult::Matched { target, .. } = &result {
            self.apply_match(&txn, &transaction, *target, actor).await?;
        }
        txn.commit().await?;
        Ok(result)
    }

    /// Applies a human-chosen match regardless of confidence.
    ///
    /// # Errors
    ///
    /// Returns `NotUnmatched` for a transaction that already left
    /// `unmatched`, `PaymentExceedsOutstanding` when the inflow is larger
    /// than the invoice's open balance, or `Conflict` on a concurrent
    /// claim.
    pub async fn reconcile(
        &self,
        transaction_id: BankTransactionId,
        target: CandidateRef,
        actor: &ActorContext,
    ) -> Result<(), BankTransactionError> {
        let txn = self.db.begin().await?;
        let transaction = load_transaction(&txn, transaction_id).await?;
        if transaction.reconciliation_status != ReconciliationStatus::Unmatched {
            return Err(ReconciliationError::NotUnmatched {
                status: transaction.reconciliation_status,
            }
            .into());
        }
        self.apply_match(&txn, &transaction, target, actor).await?;
        txn.commit().await?;
        Ok(())
    }

    /// Confirms a match. Confirming an already-confirmed transaction is a
    /// no-op: state unchanged, no audit entry.
    ///
    /// # Errors
    ///
    /// Returns `NothingToConfirm` when there is no match to confirm.
    pub async fn confirm(
        &self,
        transaction_id: BankTransactionId,
        actor: &ActorContext,
    ) -> Result<(), BankTransactionError> {
        let txn = self.db.begin().await?;
        let transaction = load_transaction(&txn, transaction_id).await?;
        let Some(new_status) = reconciliation::confirm(transaction.reconciliation_status)? else {
            return Ok(());
        };
        self.transition_status(&txn, &transaction, new_status, None, actor)
            .await?;
        txn.commit().await?;
        Ok(())
    }

    /// Reverses a match: clears the links and resets to `unmatched`. The
    /// underlying payment or expense is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` on a concurrent status change.
    pub async fn unmatch(
        &self,
        transaction_id: BankTransactionId,
        actor: &ActorContext,
    ) -> Result<(), BankTransactionError> {
        let txn = self.db.begin().await?;
        let transaction = load_transaction(&txn, transaction_id).await?;
        let Some(new_status) = reconciliation::unmatch(transaction.reconciliation_status) else {
            return Ok(());
        };
        self.transition_status(
            &txn,
            &transaction,
            new_status,
            Some((None, None)),
            actor,
        )
        .await?;
        txn.commit().await?;
        Ok(())
    }

    /// Marks a transaction as not reconcilable.
    ///
    /// # Errors
    ///
    /// Returns `NotUnmatched` for matched or confirmed transactions.
    pub async fn ignore(
        &self,
        transaction_id: BankTransactionId,
        actor: &ActorContext,
    ) -> Result<(), BankTransactionError> {
        let txn = self.db.begin().await?;
        let transaction = load_transaction(&txn, transaction_id).await?;
        let Some(new_status) = reconciliation::ignore(transaction.reconciliation_status)? else {
            return Ok(());
        };
        self.transition_status(&txn, &transaction, new_status, None, actor)
            .await?;
        txn.commit().await?;
        Ok(())
    }

    /// Records the match: for an invoice target this also records the
    /// payment the transaction represents and links it.
    async fn apply_match<C: ConnectionTrait>(
        &self,
        conn: &C,
        transaction: &BankTransaction,
        target: CandidateRef,
        actor: &ActorContext,
    ) -> Result<(), BankTransactionError> {
        let links = match target {
            CandidateRef::Invoice(invoice_id) => {
                let payment = self
                    .record_matched_payment(conn, invoice_id, transaction, actor)
                    .await?;
                (Some(payment.id), None)
            }
            CandidateRef::Expense(expense_id) => (None, Some(expense_id)),
        };

        self.transition_status(
            conn,
            transaction,
            ReconciliationStatus::Matched,
            Some(links),
            actor,
        )
        .await
    }

    /// Conditional status write: filtered on the status the caller
    /// observed, so concurrent attempts cannot both succeed.
    async fn transition_status<C: ConnectionTrait>(
        &self,
        conn: &C,
        transaction: &BankTransaction,
        new_status: ReconciliationStatus,
        links: Option<(Option<PaymentId>, Option<ExpenseId>)>,
        actor: &ActorContext,
    ) -> Result<(), BankTransactionError> {
        let mut update = bank_transactions::Entity::update_many()
            .col_expr(
                bank_transactions::Column::ReconciliationStatus,
                sea_orm::sea_query::Expr::value(new_status.as_str()),
            )
            .filter(bank_transactions::Column::Id.eq(transaction.id.into_inner()))
            .filter(
                bank_transactions::Column::ReconciliationStatus
                    .eq(transaction.reconciliation_status.as_str()),
            );

        if let Some((payment_id, expense_id)) = links {
            update = update
                .col_expr(
                    bank_transactions::Column::MatchedPaymentId,
                    sea_orm::sea_query::Expr::value(payment_id.map(PaymentId::into_inner)),
                )
                .col_expr(
                    bank_transactions::Column::MatchedExpenseId,
                    sea_orm::sea_query::Expr::value(expense_id.map(ExpenseId::into_inner)),
                );
        }

        let result = update.exec(conn).await?;
        if result.rows_affected == 0 {
            return Err(ReconciliationError::Conflict {
                transaction: transaction.reference.clone(),
            }
            .into());
        }

        let entry = AuditEntry::status_change(
            AuditEntityType::BankTransaction,
            transaction.id.into_inner(),
            transaction.reconciliation_status.as_str(),
            new_status.as_str(),
            actor.clone(),
        );
        AuditRepository::record(conn, &entry).await?;
        Ok(())
    }

    /// Records the payment a matched inflow represents, with its audit
    /// entry, on the caller's transaction.
    ///
    /// The full transaction amount is booked: an inflow exceeding the
    /// outstanding balance is rejected, never truncated, and the
    /// transaction stays unmatched.
    async fn record_matched_payment<C: ConnectionTrait>(
        &self,
        conn: &C,
        invoice_id: InvoiceId,
        transaction: &BankTransaction,
        actor: &ActorContext,
    ) -> Result<Payment, BankTransactionError> {
        let invoice = invoice_repo::load_invoice(conn, invoice_id).await?;
        let amount = transaction.amount.abs();
        kontor_core::invoice::InvoiceService::validate_payment(&invoice, amount)
            .map_err(InvoiceRepoError::from)?;

        let payment = Payment {
            id: PaymentId::new(),
            invoice_id,
            amount,
            payment_date: transaction.booking_date,
            method: Some(PaymentMethod::BankTransfer),
            reference: Some(transaction.reference.clone()),
        };
        invoice_repo::payment_to_model(&payment).insert(conn).await?;

        let entry = AuditEntry::new(
            AuditEntityType::Payment,
            payment.id.into_inner(),
            AuditAction::Create,
            None,
            Some(serde_json::to_value(&payment)?),
            actor.clone(),
        );
        AuditRepository::record(conn, &entry).await?;
        Ok(payment)
    }

    /// Loads scoring candidates: open invoices for inflows, live expenses
    /// for outflows.
    async fn load_candidates<C: ConnectionTrait>(
        &self,
        conn: &C,
        transaction: &BankTransaction,
    ) -> Result<Vec<MatchCandidate>, BankTransactionError> {
        if transaction.amount >= Decimal::ZERO {
            self.load_invoice_candidates(conn).await
        } else {
            self.load_expense_candidates(conn).await
        }
    }

    async fn load_invoice_candidates<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<Vec<MatchCandidate>, BankTransactionError> {
        let open_statuses = [
            InvoiceStatus::Sent.as_str(),
            InvoiceStatus::Partial.as_str(),
            InvoiceStatus::Overdue.as_str(),
        ];
        let rows = invoices::Entity::find()
            .filter(invoices::Column::Status.is_in(open_statuses))
            .filter(invoices::Column::DeletedAt.is_null())
            .filter(invoices::Column::InvoiceNumber.is_not_null())
            .all(conn)
            .await?;

        let mut candidates = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(number) = row.invoice_number.clone() else {
                continue;
            };
            let paid: Decimal = payments::Entity::find()
                .filter(payments::Column::InvoiceId.eq(row.id))
                .all(conn)
                .await?
                .iter()
                .map(|p| p.amount)
                .sum();

            candidates.push(MatchCandidate {
                target: CandidateRef::Invoice(InvoiceId::from_uuid(row.id)),
                reference: number,
                amount: row.total - paid,
                date: row.due_date,
            });
        }
        Ok(candidates)
    }

    async fn load_expense_candidates<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<Vec<MatchCandidate>, BankTransactionError> {
        let rows = expenses::Entity::find()
            .filter(expenses::Column::DeletedAt.is_null())
            .all(conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| MatchCandidate {
                target: CandidateRef::Expense(ExpenseId::from_uuid(row.id)),
                reference: row.receipt_number.unwrap_or_default(),
                amount: row.amount,
                date: row.expense_date,
            })
            .collect())
    }
}

async fn load_transaction<C: ConnectionTrait>(
    conn: &C,
    transaction_id: BankTransactionId,
) -> Result<BankTransaction, BankTransactionError> {
    let model = bank_transactions::Entity::find_by_id(transaction_id.into_inner())
        .one(conn)
        .await?
        .ok_or(BankTransactionError::NotFound(transaction_id.into_inner()))?;
    model_to_domain(model)
}

fn transaction_to_model(transaction: &BankTransaction) -> bank_transactions::ActiveModel {
    bank_transactions::ActiveModel {
        id: Set(transaction.id.into_inner()),
        bank_account_id: Set(transaction.bank_account_id.into_inner()),
        amount: Set(transaction.amount),
        booking_date: Set(transaction.booking_date),
        purpose: Set(transaction.purpose.clone()),
        counterparty: Set(transaction.counterparty.clone()),
        reference: Set(transaction.reference.clone()),
        reconciliation_status: Set(transaction.reconciliation_status.as_str().to_string()),
        matched_payment_id: Set(transaction.matched_payment_id.map(PaymentId::into_inner)),
        matched_expense_id: Set(transaction.matched_expense_id.map(ExpenseId::into_inner)),
        created_at: Set(Utc::now().into()),
    }
}

fn model_to_domain(
    model: bank_transactions::Model,
) -> Result<BankTransaction, BankTransactionError> {
    let status = ReconciliationStatus::parse(&model.reconciliation_status).ok_or_else(|| {
        BankTransactionError::CorruptRow(format!(
            "unknown reconciliation status '{}'",
            model.reconciliation_status
        ))
    })?;

    Ok(BankTransaction {
        id: BankTransactionId::from_uuid(model.id),
        bank_account_id: BankAccountId::from_uuid(model.bank_account_id),
        amount: model.amount,
        booking_date: model.booking_date,
        purpose: model.purpose,
        counterparty: model.counterparty,
        reference: model.reference,
        reconciliation_status: status,
        matched_payment_id: model.matched_payment_id.map(PaymentId::from_uuid),
        matched_expense_id: model.matched_expense_id.map(ExpenseId::from_uuid),
    })
}
