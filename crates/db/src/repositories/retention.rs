//! Retention repository: compliance export and end-of-retention purge.
//!
//! Purge is the only hard-delete path in the system. It runs one database
//! transaction per invoice so a failure mid-run leaves every other invoice
//! either fully purged or fully intact.

use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::info;

use kontor_core::audit::{AuditAction, AuditEntityType, AuditEntry};
use kontor_core::invoice::types::Invoice;
use kontor_core::retention::{
    AUDIT_HEADER, ComplianceArchive, ArchiveFile, INVOICE_HEADER, LINE_ITEM_HEADER,
    PAYMENT_HEADER, RetentionError, audit_row, csv_document, ensure_purgeable, invoice_row,
    is_purgeable, line_item_row, payment_row,
};
use kontor_shared::actor::ActorContext;
use kontor_shared::config::RetentionConfig;
use kontor_shared::types::InvoiceId;

use crate::entities::{audit_log, invoice_line_items, invoices, payments};
use crate::repositories::audit::{self as audit_repo, AuditRepoError, AuditRepository};
use crate::repositories::invoice::{self as invoice_repo, InvoiceRepoError};

/// Error types for retention operations.
#[derive(Debug, thiserror::Error)]
pub enum RetentionRepoError {
    /// The retention window rejected the operation.
    #[error(transparent)]
    Retention(#[from] RetentionError),

    /// Loading an invoice for export or purge failed.
    #[error(transparent)]
    Invoice(#[from] InvoiceRepoError),

    /// Decoding an audit row for export failed.
    #[error(transparent)]
    Audit(#[from] AuditRepoError),

    /// Snapshot serialization failed.
    #[error("snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository for compliance export and purge.
#[derive(Debug, Clone)]
pub struct RetentionRepository {
    db: DatabaseConnection,
    config: RetentionConfig,
}

impl RetentionRepository {
    /// Creates a new retention repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, config: RetentionConfig) -> Self {
        Self { db, config }
    }

    /// Exports invoices, line items, payments, and the audit journal as a
    /// compliance archive.
    ///
    /// Soft-deleted invoices are exported like any other; the range filters
    /// on `issued_date` (journal entries on their recording date) and both
    /// bounds are inclusive.
    ///
    /// # Errors
    ///
    /// Returns a database or decoding error.
    pub async fn export_archive(
        &self,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> Result<ComplianceArchive, RetentionRepoError> {
        let mut query = invoices::Entity::find();
        if let Some(from) = from_date {
            query = query.filter(invoices::Column::IssuedDate.gte(from));
        }
        if let Some(to) = to_date {
            query = query.filter(invoices::Column::IssuedDate.lte(to));
        }
        let invoice_models = query
            .order_by_asc(invoices::Column::IssuedDate)
            .order_by_asc(invoices::Column::Id)
            .all(&self.db)
            .await?;

        let mut invoice_rows = Vec::with_capacity(invoice_models.len());
        let mut line_rows = Vec::new();
        let mut payment_rows = Vec::new();
        for model in invoice_models {
            let invoice =
                invoice_repo::load_invoice(&self.db, InvoiceId::from_uuid(model.id)).await?;
            invoice_rows.push(invoice_row(&invoice));
            line_rows.extend(invoice.line_items.iter().map(line_item_row));
            payment_rows.extend(invoice.payments.iter().map(payment_row));
        }

        let audit_rows = self
            .load_audit_entries(from_date, to_date)
            .await?
            .iter()
            .map(audit_row)
            .collect::<Vec<_>>();

        let files = vec![
            ArchiveFile {
                name: "invoices.csv".to_string(),
                contents: csv_document(INVOICE_HEADER, &invoice_rows),
            },
            ArchiveFile {
                name: "line_items.csv".to_string(),
                contents: csv_document(LINE_ITEM_HEADER, &line_rows),
            },
            ArchiveFile {
                name: "payments.csv".to_string(),
                contents: csv_document(PAYMENT_HEADER, &payment_rows),
            },
            ArchiveFile {
                name: "audit_log.csv".to_string(),
                contents: csv_document(AUDIT_HEADER, &audit_rows),
            },
        ];

        Ok(ComplianceArchive::assemble(
            from_date,
            to_date,
            self.config.compliance_standard.clone(),
            files,
        ))
    }

    /// Hard-deletes one invoice whose retention window has elapsed.
    ///
    /// # Errors
    ///
    /// Returns `NotDeleted` for a live invoice and `StillRetained` inside
    /// the window.
    pub async fn purge(
        &self,
        invoice_id: InvoiceId,
        as_of: NaiveDate,
        actor: &ActorContext,
    ) -> Result<(), RetentionRepoError> {
        let txn = self.db.begin().await?;
        let invoice = invoice_repo::load_invoice(&txn, invoice_id).await?;
        ensure_purgeable(invoice.deleted_at, as_of, self.config.retention_years)?;
        self.purge_one(&txn, &invoice, actor).await?;
        txn.commit().await?;
        Ok(())
    }

    /// Hard-deletes every soft-deleted invoice whose window has elapsed as
    /// of `as_of`. Invoices still inside their window are skipped, never an
    /// error. Returns the number purged.
    ///
    /// # Errors
    ///
    /// Returns a database error; invoices purged before the failure stay
    /// purged.
    pub async fn purge_expired(
        &self,
        as_of: NaiveDate,
        actor: &ActorContext,
    ) -> Result<u64, RetentionRepoError> {
        let candidates = invoices::Entity::find()
            .filter(invoices::Column::DeletedAt.is_not_null())
            .all(&self.db)
            .await?;

        let mut purged = 0u64;
        for model in candidates {
            let Some(deleted_at) = model.deleted_at else {
                continue;
            };
            if !is_purgeable(deleted_at.into(), as_of, self.config.retention_years) {
                continue;
            }

            let txn = self.db.begin().await?;
            let invoice =
                invoice_repo::load_invoice(&txn, InvoiceId::from_uuid(model.id)).await?;
            self.purge_one(&txn, &invoice, actor).await?;
            txn.commit().await?;
            purged += 1;
        }

        if purged > 0 {
            info!(purged, %as_of, "purged invoices past their retention window");
        }
        Ok(purged)
    }

    /// Deletes the invoice, its children, and its audit trail, then writes
    /// one terminal journal entry carrying the full final snapshot.
    async fn purge_one<C: ConnectionTrait>(
        &self,
        conn: &C,
        invoice: &Invoice,
        actor: &ActorContext,
    ) -> Result<(), RetentionRepoError> {
        let snapshot = serde_json::to_value(invoice)?;
        let invoice_uuid = invoice.id.into_inner();

        let mut trail_ids = vec![invoice_uuid];
        trail_ids.extend(invoice.line_items.iter().map(|l| l.id.into_inner()));
        trail_ids.extend(invoice.payments.iter().map(|p| p.id.into_inner()));
        audit_log::Entity::delete_many()
            .filter(audit_log::Column::EntityId.is_in(trail_ids))
            .exec(conn)
            .await?;

        payments::Entity::delete_many()
            .filter(payments::Column::InvoiceId.eq(invoice_uuid))
            .exec(conn)
            .await?;
        invoice_line_items::Entity::delete_many()
            .filter(invoice_line_items::Column::InvoiceId.eq(invoice_uuid))
            .exec(conn)
            .await?;
        invoices::Entity::delete_by_id(invoice_uuid).exec(conn).await?;

        let entry = AuditEntry::new(
            AuditEntityType::Invoice,
            invoice_uuid,
            AuditAction::Delete,
            Some(snapshot),
            None,
            actor.clone(),
        );
        AuditRepository::record(conn, &entry).await?;
        Ok(())
    }

    async fn load_audit_entries(
        &self,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> Result<Vec<AuditEntry>, RetentionRepoError> {
        use chrono::{Duration, NaiveTime};

        let mut query = audit_log::Entity::find();
        if let Some(from) = from_date {
            query = query.filter(audit_log::Column::RecordedAt.gte(from.and_time(NaiveTime::MIN)));
        }
        if let Some(to) = to_date {
            let end = to.and_time(NaiveTime::MIN) + Duration::days(1);
            query = query.filter(audit_log::Column::RecordedAt.lt(end));
        }

        let rows = query
            .order_by_asc(audit_log::Column::RecordedAt)
            .order_by_asc(audit_log::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(audit_repo::model_to_entry)
            .collect::<Result<Vec<_>, _>>()?)
    }
}
