//! Invoice repository: persisted lifecycle of the central ledger entity.
//!
//! Every mutation here runs as one database transaction containing the
//! entity write and its audit entry. Finalization additionally contains the
//! number allocation, so a failed allocation aborts the whole transition.

use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde_json::Value;
use std::str::FromStr;
use uuid::Uuid;

use kontor_core::audit::{AuditAction, AuditEntityType, AuditEntry, diff};
use kontor_core::invoice::{
    InvoiceError, InvoiceService,
    types::{DocumentType, Invoice, InvoiceStatus, LineItem, Payment, PaymentMethod},
};
use kontor_core::lifecycle::{LifecycleError, LifecycleService, TransitionAction};
use kontor_core::numbering::NumberingError;
use kontor_shared::actor::ActorContext;
use kontor_shared::config::NumberingConfig;
use kontor_shared::types::money::Currency;
use kontor_shared::types::{
    CustomerId, InvoiceId, LineItemId, OrganizationId, PaymentId, ProjectId,
};

use crate::entities::{invoice_line_items, invoices, payments};
use crate::repositories::audit::AuditRepository;
use crate::repositories::number_sequence::NumberSequenceRepository;

/// Error types for invoice operations.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceRepoError {
    /// Invoice not found.
    #[error("invoice not found: {0}")]
    NotFound(Uuid),

    /// A business rule rejected the mutation.
    #[error(transparent)]
    Invoice(#[from] InvoiceError),

    /// The state machine rejected the transition.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Number allocation failed; retry the whole finalization.
    #[error(transparent)]
    Numbering(#[from] NumberingError),

    /// A concurrent writer changed the invoice first; retry against fresh
    /// state.
    #[error("concurrent modification of invoice {0}")]
    ConcurrentModification(Uuid),

    /// A stored row could not be decoded into its domain type.
    #[error("corrupt invoice row: {0}")]
    CorruptRow(String),

    /// Snapshot serialization failed.
    #[error("snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for one line item.
#[derive(Debug, Clone)]
pub struct LineItemInput {
    /// 1-based position.
    pub position: u32,
    /// Human-readable description.
    pub description: String,
    /// Quantity (> 0).
    pub quantity: rust_decimal::Decimal,
    /// Price per unit (>= 0).
    pub unit_price: rust_decimal::Decimal,
    /// Tax rate in percent (>= 0).
    pub tax_rate: rust_decimal::Decimal,
    /// Discount in percent (0..=100).
    pub discount_percent: rust_decimal::Decimal,
}

/// Input for creating a draft invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// Owning tenant.
    pub organization_id: OrganizationId,
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Optional project association.
    pub project_id: Option<ProjectId>,
    /// Document type.
    pub document_type: DocumentType,
    /// Issue date.
    pub issued_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Currency.
    pub currency: Currency,
    /// Customer-visible notes.
    pub notes: Option<String>,
    /// Line items.
    pub line_items: Vec<LineItemInput>,
}

/// Partial update of an invoice.
///
/// Which of these are accepted depends on the invoice status: drafts take
/// everything, finalized invoices only the notes fields.
#[derive(Debug, Clone, Default)]
pub struct UpdateInvoiceInput {
    /// New due date.
    pub due_date: Option<NaiveDate>,
    /// New customer-visible notes (`Some(None)` clears them).
    pub notes: Option<Option<String>>,
    /// New internal annotation.
    pub internal_note: Option<Option<String>>,
    /// Replacement line items.
    pub line_items: Option<Vec<LineItemInput>>,
}

/// Repository for invoice ledger entities.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
    numbering: NumberingConfig,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, numbering: NumberingConfig) -> Self {
        Self { db, numbering }
    }

    /// Creates a draft invoice with its line items and the paired audit
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any write, or a database error.
    pub async fn create(
        &self,
        input: CreateInvoiceInput,
        actor: &ActorContext,
    ) -> Result<Invoice, InvoiceRepoError> {
        let invoice_id = InvoiceId::new();
        let line_items: Vec<LineItem> = input
            .line_items
            .iter()
            .map(|line| line_input_to_domain(invoice_id, line))
            .collect();
        InvoiceService::validate_line_items(&line_items)?;

        let now = Utc::now();
        let mut invoice = Invoice {
            id: invoice_id,
            organization_id: input.organization_id,
            customer_id: input.customer_id,
            project_id: input.project_id,
            document_type: input.document_type,
            invoice_number: None,
            status: InvoiceStatus::Draft,
            issued_date: input.issued_date,
            due_date: input.due_date,
            currency: input.currency,
            subtotal: rust_decimal::Decimal::ZERO,
            tax_amount: rust_decimal::Decimal::ZERO,
            total: rust_decimal::Decimal::ZERO,
            notes: input.notes,
            internal_note: None,
            line_items,
            payments: Vec::new(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        InvoiceService::recompute_totals(&mut invoice)?;

        let entry = AuditEntry::new(
            AuditEntityType::Invoice,
            invoice.id.into_inner(),
            AuditAction::Create,
            None,
            Some(snapshot(&invoice)?),
            actor.clone(),
        );

        let txn = self.db.begin().await?;
        invoice_to_model(&invoice).insert(&txn).await?;
        for line in &invoice.line_items {
            line_to_model(line).insert(&txn).await?;
        }
        AuditRepository::record(&txn, &entry).await?;
        txn.commit().await?;

        Ok(invoice)
    }

    /// Loads an invoice with its line items and payments.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database/decoding error.
    pub async fn find(&self, invoice_id: InvoiceId) -> Result<Invoice, InvoiceRepoError> {
        self.load(&self.db, invoice_id).await
    }

    /// Applies a partial update, enforcing the status-dependent mutability
    /// window per field.
    ///
    /// A no-op update (nothing actually changed) writes no audit entry and
    /// returns the invoice unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ImmutableLedgerEntry` (via `Invoice`) when a frozen field
    /// is touched on a finalized invoice.
    pub async fn update(
        &self,
        invoice_id: InvoiceId,
        input: UpdateInvoiceInput,
        actor: &ActorContext,
    ) -> Result<Invoice, InvoiceRepoError> {
        let txn = self.db.begin().await?;
        let mut invoice = self.load(&txn, invoice_id).await?;
        let before = snapshot(&invoice)?;
        let lines_before = invoice.line_items.clone();

        if let Some(due_date) = input.due_date {
            invoice.due_date = due_date;
        }
        if let Some(notes) = input.notes {
            invoice.notes = notes;
        }
        if let Some(internal_note) = input.internal_note {
            invoice.internal_note = internal_note;
        }
        if let Some(lines) = input.line_items {
            InvoiceService::ensure_mutable(invoice.status, "line_items")?;
            invoice.line_items = lines
                .iter()
                .map(|line| line_input_to_domain(invoice.id, line))
                .collect();
            InvoiceService::validate_line_items(&invoice.line_items)?;
            InvoiceService::recompute_totals(&mut invoice)?;
        }

        let after = snapshot(&invoice)?;
        let lines_changed = lines_domain_differ(&lines_before, &invoice.line_items);
        let change = match diff::diff_snapshots(&before, &after)
            .map_err(|e| InvoiceRepoError::CorruptRow(e.to_string()))?
        {
            Some(mut change) => {
                if lines_changed {
                    let (old, new) = line_change_values(&lines_before, &invoice.line_items);
                    if let Some(map) = change.old_values.as_object_mut() {
                        map.insert("line_items".to_string(), old);
                    }
                    if let Some(map) = change.new_values.as_object_mut() {
                        map.insert("line_items".to_string(), new);
                    }
                }
                change
            }
            None if lines_changed => line_change_set(&lines_before, &invoice.line_items),
            None => {
                // No-op update: nothing persisted, no audit entry.
                txn.commit().await?;
                return Ok(invoice);
            }
        };

        invoice.updated_at = Utc::now();

        if lines_changed {
            invoice_line_items::Entity::delete_many()
                .filter(invoice_line_items::Column::InvoiceId.eq(invoice.id.into_inner()))
                .exec(&txn)
                .await?;
            for line in &invoice.line_items {
                line_to_model(line).insert(&txn).await?;
            }
        }

        invoice_to_model(&invoice).update(&txn).await?;

        let entry = AuditEntry::new(
            AuditEntityType::Invoice,
            invoice.id.into_inner(),
            AuditAction::Update,
            Some(change.old_values),
            Some(change.new_values),
            actor.clone(),
        );
        AuditRepository::record(&txn, &entry).await?;
        txn.commit().await?;

        Ok(invoice)
    }

    /// Finalizes a draft: allocates the document number and transitions to
    /// `sent` in one transaction. This is the irrevocable compliance
    /// boundary.
    ///
    /// # Errors
    ///
    /// A failed allocation or transition rolls back everything; allocation
    /// failures are retryable at this level. `ConcurrentModification` means
    /// another writer finalized or mutated the invoice first.
    pub async fn finalize(
        &self,
        invoice_id: InvoiceId,
        actor: &ActorContext,
    ) -> Result<Invoice, InvoiceRepoError> {
        let txn = self.db.begin().await?;
        let mut invoice = self.load(&txn, invoice_id).await?;
        self.claim(&txn, &mut invoice).await?;

        if invoice.status != InvoiceStatus::Draft {
            return Err(LifecycleError::InvalidTransition {
                from: invoice.status,
                to: InvoiceStatus::Sent,
            }
            .into());
        }
        InvoiceService::validate_for_finalization(&invoice)?;

        let number = NumberSequenceRepository::allocate(
            &txn,
            &self.numbering,
            invoice.document_type,
            invoice.issued_date.year(),
        )
        .await?;
        invoice.invoice_number = Some(number);

        let action = LifecycleService::finalize(&invoice, actor)?;
        self.apply_transition(&txn, &mut invoice, &action).await?;
        txn.commit().await?;

        Ok(invoice)
    }

    /// Cancels an invoice (allowed from any non-terminal state).
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` for an already-cancelled invoice.
    pub async fn cancel(
        &self,
        invoice_id: InvoiceId,
        actor: &ActorContext,
    ) -> Result<Invoice, InvoiceRepoError> {
        let txn = self.db.begin().await?;
        let mut invoice = self.load(&txn, invoice_id).await?;
        let action = LifecycleService::cancel(&invoice, actor)?;
        self.apply_transition(&txn, &mut invoice, &action).await?;
        txn.commit().await?;
        Ok(invoice)
    }

    /// Records a payment against a finalized invoice and reevaluates its
    /// payment-derived status, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `PaymentExceedsOutstanding` (via `Invoice`) without any
    /// partial application, or `ConcurrentModification` when another
    /// payment landed between load and write.
    pub async fn record_payment(
        &self,
        invoice_id: InvoiceId,
        amount: rust_decimal::Decimal,
        payment_date: NaiveDate,
        method: Option<PaymentMethod>,
        reference: Option<String>,
        actor: &ActorContext,
    ) -> Result<Payment, InvoiceRepoError> {
        let txn = self.db.begin().await?;
        let mut invoice = self.load(&txn, invoice_id).await?;
        self.claim(&txn, &mut invoice).await?;
        InvoiceService::validate_payment(&invoice, amount)?;

        let payment = Payment {
            id: PaymentId::new(),
            invoice_id,
            amount,
            payment_date,
            method,
            reference,
        };
        payment_to_model(&payment).insert(&txn).await?;

        let entry = AuditEntry::new(
            AuditEntityType::Payment,
            payment.id.into_inner(),
            AuditAction::Create,
            None,
            Some(serde_json::to_value(&payment)?),
            actor.clone(),
        );
        AuditRepository::record(&txn, &entry).await?;

        invoice.payments.push(payment.clone());
        let today = Utc::now().date_naive();
        if let Some(action) = LifecycleService::reevaluate(&invoice, today) {
            self.apply_transition(&txn, &mut invoice, &action).await?;
        }
        txn.commit().await?;

        Ok(payment)
    }

    /// Reevaluates the payment-derived status (e.g. a nightly overdue
    /// sweep). A no-op reevaluation writes nothing.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn reevaluate(
        &self,
        invoice_id: InvoiceId,
        today: NaiveDate,
    ) -> Result<Invoice, InvoiceRepoError> {
        let txn = self.db.begin().await?;
        let mut invoice = self.load(&txn, invoice_id).await?;
        if let Some(action) = LifecycleService::reevaluate(&invoice, today) {
            self.apply_transition(&txn, &mut invoice, &action).await?;
            txn.commit().await?;
        }
        Ok(invoice)
    }

    /// Soft-deletes an invoice. The row persists for the full retention
    /// period; hard deletion happens only through the retention repository.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn soft_delete(
        &self,
        invoice_id: InvoiceId,
        actor: &ActorContext,
    ) -> Result<Invoice, InvoiceRepoError> {
        let txn = self.db.begin().await?;
        let mut invoice = self.load(&txn, invoice_id).await?;
        let before = snapshot(&invoice)?;

        invoice.deleted_at = Some(Utc::now());
        invoice.updated_at = Utc::now();

        invoice_to_model(&invoice).update(&txn).await?;

        let entry = AuditEntry::new(
            AuditEntityType::Invoice,
            invoice.id.into_inner(),
            AuditAction::Delete,
            Some(before),
            None,
            actor.clone(),
        );
        AuditRepository::record(&txn, &entry).await?;
        txn.commit().await?;

        Ok(invoice)
    }

    /// Claims the invoice row for this writer: a conditional bump of
    /// `updated_at` filtered on the value observed at load time. Zero
    /// affected rows means a concurrent transaction committed in between
    /// and the loaded state (including the outstanding balance the payment
    /// validator saw) is stale. The row stays locked until commit, so the
    /// sum of recorded payments can never exceed the invoice total and a
    /// draft is finalized at most once.
    async fn claim<C: ConnectionTrait>(
        &self,
        conn: &C,
        invoice: &mut Invoice,
    ) -> Result<(), InvoiceRepoError> {
        let now = Utc::now();
        let result = invoices::Entity::update_many()
            .col_expr(
                invoices::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .filter(invoices::Column::Id.eq(invoice.id.into_inner()))
            .filter(invoices::Column::UpdatedAt.eq(invoice.updated_at))
            .exec(conn)
            .await?;
        if result.rows_affected == 0 {
            return Err(InvoiceRepoError::ConcurrentModification(
                invoice.id.into_inner(),
            ));
        }
        invoice.updated_at = now;
        Ok(())
    }

    /// Writes a status transition plus its audit entry on the caller's
    /// transaction.
    async fn apply_transition<C: ConnectionTrait>(
        &self,
        conn: &C,
        invoice: &mut Invoice,
        action: &TransitionAction,
    ) -> Result<(), InvoiceRepoError> {
        invoice.status = action.new_status;
        invoice.updated_at = action.occurred_at;

        invoice_to_model(invoice).update(conn).await?;

        let entry = AuditEntry::status_change(
            AuditEntityType::Invoice,
            invoice.id.into_inner(),
            action.old_status.as_str(),
            action.new_status.as_str(),
            action.actor.clone(),
        );
        AuditRepository::record(conn, &entry).await?;
        Ok(())
    }

    async fn load<C: ConnectionTrait>(
        &self,
        conn: &C,
        invoice_id: InvoiceId,
    ) -> Result<Invoice, InvoiceRepoError> {
        load_invoice(conn, invoice_id).await
    }
}

/// Loads an invoice with lines and payments on any connection. Shared with
/// the reconciliation repository, which records payments during matching.
pub(crate) async fn load_invoice<C: ConnectionTrait>(
    conn: &C,
    invoice_id: InvoiceId,
) -> Result<Invoice, InvoiceRepoError> {
    let model = invoices::Entity::find_by_id(invoice_id.into_inner())
        .one(conn)
        .await?
        .ok_or(InvoiceRepoError::NotFound(invoice_id.into_inner()))?;

    let lines = invoice_line_items::Entity::find()
        .filter(invoice_line_items::Column::InvoiceId.eq(invoice_id.into_inner()))
        .order_by_asc(invoice_line_items::Column::Position)
        .all(conn)
        .await?;

    let payment_rows = payments::Entity::find()
        .filter(payments::Column::InvoiceId.eq(invoice_id.into_inner()))
        .order_by_asc(payments::Column::PaymentDate)
        .all(conn)
        .await?;

    model_to_domain(model, lines, payment_rows)
}

fn line_input_to_domain(invoice_id: InvoiceId, input: &LineItemInput) -> LineItem {
    LineItem {
        id: LineItemId::new(),
        invoice_id,
        position: input.position,
        description: input.description.clone(),
        quantity: input.quantity,
        unit_price: input.unit_price,
        tax_rate: input.tax_rate,
        discount_percent: input.discount_percent,
    }
}

/// Audit form of one line item: content fields only. IDs are regenerated
/// on every replacement and excluded, so only real edits count as changes.
fn line_value(line: &LineItem) -> Value {
    serde_json::json!({
        "position": line.position,
        "description": line.description,
        "quantity": line.quantity,
        "unit_price": line.unit_price,
        "tax_rate": line.tax_rate,
        "discount_percent": line.discount_percent,
    })
}

fn line_map(lines: &[LineItem]) -> std::collections::BTreeMap<u32, Value> {
    lines
        .iter()
        .map(|line| (line.position, line_value(line)))
        .collect()
}

/// Line items are keyed by position; a replacement changed something only
/// when the content at some position differs.
pub(crate) fn lines_domain_differ(before: &[LineItem], after: &[LineItem]) -> bool {
    line_map(before) != line_map(after)
}

/// Old/new arrays holding only the positions that differ, position order;
/// a position present on just one side diffs against `null`.
fn line_change_values(before: &[LineItem], after: &[LineItem]) -> (Value, Value) {
    let old_map = line_map(before);
    let new_map = line_map(after);

    let positions: std::collections::BTreeSet<u32> =
        old_map.keys().chain(new_map.keys()).copied().collect();

    let mut old_changed = Vec::new();
    let mut new_changed = Vec::new();
    for position in positions {
        let old = old_map.get(&position);
        let new = new_map.get(&position);
        if old != new {
            old_changed.push(old.cloned().unwrap_or(Value::Null));
            new_changed.push(new.cloned().unwrap_or(Value::Null));
        }
    }

    (Value::Array(old_changed), Value::Array(new_changed))
}

pub(crate) fn line_change_set(before: &[LineItem], after: &[LineItem]) -> diff::ChangeSet {
    let (old, new) = line_change_values(before, after);
    diff::ChangeSet {
        old_values: serde_json::json!({ "line_items": old }),
        new_values: serde_json::json!({ "line_items": new }),
    }
}

/// Serializes an invoice for audit snapshots: relationship collections and
/// row timestamps are excluded, matching the diff rules.
fn snapshot(invoice: &Invoice) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(invoice)?;
    if let Some(map) = value.as_object_mut() {
        for key in diff::EXCLUDED_FIELDS {
            map.remove(*key);
        }
    }
    Ok(value)
}

fn invoice_to_model(invoice: &Invoice) -> invoices::ActiveModel {
    invoices::ActiveModel {
        id: Set(invoice.id.into_inner()),
        organization_id: Set(invoice.organization_id.into_inner()),
        customer_id: Set(invoice.customer_id.into_inner()),
        project_id: Set(invoice.project_id.map(ProjectId::into_inner)),
        document_type: Set(invoice.document_type.as_str().to_string()),
        invoice_number: Set(invoice.invoice_number.clone()),
        status: Set(invoice.status.as_str().to_string()),
        issued_date: Set(invoice.issued_date),
        due_date: Set(invoice.due_date),
        currency: Set(invoice.currency.to_string()),
        subtotal: Set(invoice.subtotal),
        tax_amount: Set(invoice.tax_amount),
        total: Set(invoice.total),
        notes: Set(invoice.notes.clone()),
        internal_note: Set(invoice.internal_note.clone()),
        deleted_at: Set(invoice.deleted_at.map(Into::into)),
        created_at: Set(invoice.created_at.into()),
        updated_at: Set(invoice.updated_at.into()),
    }
}

fn line_to_model(line: &LineItem) -> invoice_line_items::ActiveModel {
    invoice_line_items::ActiveModel {
        id: Set(line.id.into_inner()),
        invoice_id: Set(line.invoice_id.into_inner()),
        position: Set(i32::try_from(line.position).unwrap_or(i32::MAX)),
        description: Set(line.description.clone()),
        quantity: Set(line.quantity),
        unit_price: Set(line.unit_price),
        tax_rate: Set(line.tax_rate),
        discount_percent: Set(line.discount_percent),
    }
}

pub(crate) fn payment_to_model(payment: &Payment) -> payments::ActiveModel {
    payments::ActiveModel {
        id: Set(payment.id.into_inner()),
        invoice_id: Set(payment.invoice_id.into_inner()),
        amount: Set(payment.amount),
        payment_date: Set(payment.payment_date),
        method: Set(payment.method.map(|m| m.as_str().to_string())),
        reference: Set(payment.reference.clone()),
        created_at: Set(Utc::now().into()),
    }
}

fn model_to_domain(
    model: invoices::Model,
    lines: Vec<invoice_line_items::Model>,
    payment_rows: Vec<payments::Model>,
) -> Result<Invoice, InvoiceRepoError> {
    let document_type = DocumentType::parse(&model.document_type).ok_or_else(|| {
        InvoiceRepoError::CorruptRow(format!("unknown document type '{}'", model.document_type))
    })?;
    let status = InvoiceStatus::parse(&model.status).ok_or_else(|| {
        InvoiceRepoError::CorruptRow(format!("unknown status '{}'", model.status))
    })?;
    let currency = Currency::from_str(&model.currency).map_err(InvoiceRepoError::CorruptRow)?;

    let line_items = lines
        .into_iter()
        .map(|line| {
            Ok(LineItem {
                id: LineItemId::from_uuid(line.id),
                invoice_id: InvoiceId::from_uuid(line.invoice_id),
                position: u32::try_from(line.position).map_err(|_| {
                    InvoiceRepoError::CorruptRow(format!("negative position {}", line.position))
                })?,
                description: line.description,
                quantity: line.quantity,
                unit_price: line.unit_price,
                tax_rate: line.tax_rate,
                discount_percent: line.discount_percent,
            })
        })
        .collect::<Result<Vec<_>, InvoiceRepoError>>()?;

    let payments_domain = payment_rows
        .into_iter()
        .map(|row| {
            let method = row
                .method
                .as_deref()
                .map(|m| {
                    PaymentMethod::parse(m).ok_or_else(|| {
                        InvoiceRepoError::CorruptRow(format!("unknown payment method '{m}'"))
                    })
                })
                .transpose()?;
            Ok(Payment {
                id: PaymentId::from_uuid(row.id),
                invoice_id: InvoiceId::from_uuid(row.invoice_id),
                amount: row.amount,
                payment_date: row.payment_date,
                method,
                reference: row.reference,
            })
        })
        .collect::<Result<Vec<_>, InvoiceRepoError>>()?;

    Ok(Invoice {
        id: InvoiceId::from_uuid(model.id),
        organization_id: OrganizationId::from_uuid(model.organization_id),
        customer_id: CustomerId::from_uuid(model.customer_id),
        project_id: model.project_id.map(ProjectId::from_uuid),
        document_type,
        invoice_number: model.invoice_number,
        status,
        issued_date: model.issued_date,
        due_date: model.due_date,
        currency,
        subtotal: model.subtotal,
        tax_amount: model.tax_amount,
        total: model.total,
        notes: model.notes,
        internal_note: model.internal_note,
        line_items,
        payments: payments_domain,
        deleted_at: model.deleted_at.map(Into::into),
        created_at: model.created_at.into(),
        updated_at: model.updated_at.into(),
    })
}
