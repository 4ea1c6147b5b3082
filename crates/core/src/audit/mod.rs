//! Append-only audit journal types and field diffing.
//!
//! Every mutation of a ledger entity carries exactly one audit entry,
//! written in the same database transaction as the entity change. Entries
//! are never updated or deleted by application code; the only deletion path
//! is the regulator-mandated retention purge, which itself writes a final
//! entry first.

pub mod diff;
pub mod error;
pub mod types;

pub use diff::{ChangeSet, diff_snapshots};
pub use error::AuditError;
pub use types::{AuditAction, AuditEntityType, AuditEntry, AuditFilter};
