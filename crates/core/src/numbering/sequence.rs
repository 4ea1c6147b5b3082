//! In-memory sequence allocator.
//!
//! The production path allocates through the `number_sequences` table with
//! an atomic upsert (see `kontor-db`); this allocator backs tests and
//! single-process deployments with the same contract: linearizable per
//! `(doc_type, year)` key, duplicates impossible, gaps tolerated.

use dashmap::DashMap;

use kontor_shared::config::NumberingConfig;

use super::error::NumberingError;
use super::format::format_document_number;
use crate::invoice::types::DocumentType;

/// Thread-safe in-memory number sequences.
///
/// The dashmap entry guard holds the shard lock for the key while the
/// counter is incremented and read back, which makes the allocation atomic.
#[derive(Debug, Default)]
pub struct InMemorySequences {
    counters: DashMap<(DocumentType, i32), u64>,
}

impl InMemorySequences {
    /// Creates an empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically allocates the next sequence value for `(doc_type, year)`.
    ///
    /// The value is consumed by the caller immediately; it is never handed
    /// out twice and never decremented on caller failure.
    pub fn next(&self, doc_type: DocumentType, year: i32) -> Result<u64, NumberingError> {
        let mut entry = self.counters.entry((doc_type, year)).or_insert(0);
        *entry = entry.checked_add(1).ok_or_else(|| NumberingError::AllocationFailed {
            reason: format!("sequence overflow for {doc_type} {year}"),
        })?;
        Ok(*entry)
    }

    /// Allocates and formats the next document number.
    pub fn allocate_number(
        &self,
        config: &NumberingConfig,
        doc_type: DocumentType,
        year: i32,
    ) -> Result<String, NumberingError> {
        let number = self.next(doc_type, year)?;
        Ok(format_document_number(config, doc_type, year, number))
    }
}
