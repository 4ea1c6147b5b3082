//! Storage of generated invoice documents using Apache OpenDAL.
//!
//! Vendor-agnostic object storage (S3-compatible or local filesystem) plus
//! the registry records that link a stored artifact back to its ledger
//! entity. Storage failures never roll back the ledger mutation they
//! accompany; callers surface them as a degraded result.

mod config;
mod error;
mod registry;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use registry::{DocumentRecord, EntityKind, EntityRef, sha256_hex};
pub use service::DocumentStore;
