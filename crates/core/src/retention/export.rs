//! Compliance archive building blocks.
//!
//! An archive is a set of CSV files (one per table, soft-deleted rows
//! included) plus a JSON manifest. The repository layer streams rows out of
//! the database; this module turns them into files.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::audit::AuditEntry;
use crate::invoice::types::{Invoice, LineItem, Payment};

/// Manifest written alongside the exported tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportManifest {
    /// When the export was produced.
    pub exported_at: DateTime<Utc>,
    /// Start of the exported date range, if bounded.
    pub from_date: Option<NaiveDate>,
    /// End of the exported date range, if bounded.
    pub to_date: Option<NaiveDate>,
    /// File format of the table exports.
    pub format: String,
    /// Compliance standard the archive is produced for.
    pub compliance_standard: String,
    /// Row counts per exported file.
    pub row_counts: Vec<FileRowCount>,
}

/// Row count of one archive file, recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRowCount {
    /// File name within the archive.
    pub file: String,
    /// Number of data rows (header excluded).
    pub rows: usize,
}

/// One file inside the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    /// File name, e.g. `invoices.csv`.
    pub name: String,
    /// Full file contents.
    pub contents: String,
}

/// A fully assembled compliance archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceArchive {
    /// The manifest, serialized into the archive as `manifest.json`.
    pub manifest: ExportManifest,
    /// The exported table files.
    pub files: Vec<ArchiveFile>,
}

impl ComplianceArchive {
    /// Assembles an archive from exported tables, filling in manifest row
    /// counts.
    #[must_use]
    pub fn assemble(
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
        compliance_standard: String,
        files: Vec<ArchiveFile>,
    ) -> Self {
        let row_counts = files
            .iter()
            .map(|file| FileRowCount {
                file: file.name.clone(),
                // Every file has exactly one header line.
                rows: file.contents.lines().count().saturating_sub(1),
            })
            .collect();
        Self {
            manifest: ExportManifest {
                exported_at: Utc::now(),
                from_date,
                to_date,
                format: "csv".to_string(),
                compliance_standard,
                row_counts,
            },
            files,
        }
    }
}

/// True when `date` falls inside the optional `[from, to]` range.
#[must_use]
pub fn date_in_range(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    from.is_none_or(|f| date >= f) && to.is_none_or(|t| date <= t)
}

/// Column header of `invoices.csv`.
pub const INVOICE_HEADER: &[&str] = &[
    "id",
    "invoice_number",
    "document_type",
    "status",
    "customer_id",
    "issued_date",
    "due_date",
    "currency",
    "subtotal",
    "tax_amount",
    "total",
    "deleted_at",
];

/// Column header of `line_items.csv`.
pub const LINE_ITEM_HEADER: &[&str] = &[
    "id",
    "invoice_id",
    "position",
    "description",
    "quantity",
    "unit_price",
    "tax_rate",
    "discount_percent",
];

/// Column header of `payments.csv`.
pub const PAYMENT_HEADER: &[&str] = &[
    "id",
    "invoice_id",
    "amount",
    "payment_date",
    "method",
    "reference",
];

/// Column header of `audit_log.csv`.
pub const AUDIT_HEADER: &[&str] = &[
    "id",
    "entity_type",
    "entity_id",
    "action",
    "old_values",
    "new_values",
    "recorded_at",
    "actor_user_id",
    "actor_ip",
];

/// Builds the `invoices.csv` row for one invoice. Soft-deleted invoices are
/// exported like any other, with `deleted_at` set.
#[must_use]
pub fn invoice_row(invoice: &Invoice) -> Vec<String> {
    vec![
        invoice.id.to_string(),
        invoice.invoice_number.clone().unwrap_or_default(),
        invoice.document_type.as_str().to_string(),
        invoice.status.as_str().to_string(),
        invoice.customer_id.to_string(),
        invoice.issued_date.to_string(),
        invoice.due_date.to_string(),
        invoice.currency.to_string(),
        invoice.subtotal.to_string(),
        invoice.tax_amount.to_string(),
        invoice.total.to_string(),
        invoice
            .deleted_at
            .map(|d| d.to_rfc3339())
            .unwrap_or_default(),
    ]
}

/// Builds the `line_items.csv` row for one line item.
#[must_use]
pub fn line_item_row(line: &LineItem) -> Vec<String> {
    vec![
        line.id.to_string(),
        line.invoice_id.to_string(),
        line.position.to_string(),
        line.description.clone(),
        line.quantity.to_string(),
        line.unit_price.to_string(),
        line.tax_rate.to_string(),
        line.discount_percent.to_string(),
    ]
}

/// Builds the `payments.csv` row for one payment.
#[must_use]
pub fn payment_row(payment: &Payment) -> Vec<String> {
    vec![
        payment.id.to_string(),
        payment.invoice_id.to_string(),
        payment.amount.to_string(),
        payment.payment_date.to_string(),
        payment
            .method
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
        payment.reference.clone().unwrap_or_default(),
    ]
}

/// Builds the `audit_log.csv` row for one journal entry.
#[must_use]
pub fn audit_row(entry: &AuditEntry) -> Vec<String> {
    vec![
        entry.id.to_string(),
        entry.entity_type.as_str().to_string(),
        entry.entity_id.to_string(),
        entry.action.as_str().to_string(),
        entry
            .old_values
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        entry
            .new_values
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        entry.recorded_at.to_rfc3339(),
        entry
            .actor
            .user_id
            .map(|id| id.to_string())
            .unwrap_or_default(),
        entry.actor.ip_address.clone().unwrap_or_default(),
    ]
}

/// Renders a header plus rows as an RFC 4180 CSV document.
#[must_use]
pub fn csv_document(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    push_row(&mut out, header.iter().copied());
    for row in rows {
        push_row(&mut out, row.iter().map(String::as_str));
    }
    out
}

fn push_row<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&escape_field(field));
    }
    out.push('\n');
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
