//! Statutory retention windows and compliance exports.
//!
//! Soft-deleted ledger entities stay on disk for the full retention period,
//! measured from the end of the calendar year of deletion. Hard deletion
//! happens only through the purge path, which refuses anything still inside
//! the window and journals a final `delete` entry first.

pub mod error;
pub mod export;
pub mod policy;

pub use error::RetentionError;
pub use export::{
    ArchiveFile, AUDIT_HEADER, ComplianceArchive, ExportManifest, INVOICE_HEADER,
    LINE_ITEM_HEADER, PAYMENT_HEADER, audit_row, csv_document, date_in_range, invoice_row,
    line_item_row, payment_row,
};
pub use policy::{ensure_purgeable, is_purgeable, retention_expiry};
