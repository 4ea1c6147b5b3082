//! Number sequence repository: the single serialization point for
//! document numbers.
//!
//! Allocation is one atomic upsert-and-increment statement; the row lock it
//! takes is held only for the remainder of the caller's transaction, which
//! never spans an outbound call. Concurrent callers serialize on the
//! `(doc_type, year)` row and each read back a distinct value. A caller
//! that fails after the increment leaves a gap, which is acceptable;
//! duplicates are not.

use sea_orm::{ConnectionTrait, DbBackend, Statement};

use kontor_core::invoice::types::DocumentType;
use kontor_core::numbering::{NumberingError, format_document_number};
use kontor_shared::config::NumberingConfig;

const ALLOCATE_SQL: &str = "\
INSERT INTO number_sequences (doc_type, year, current_number) \
VALUES ($1, $2, 1) \
ON CONFLICT (doc_type, year) \
DO UPDATE SET current_number = number_sequences.current_number + 1 \
RETURNING current_number";

/// Repository for gap-tolerant, duplicate-free number allocation.
pub struct NumberSequenceRepository;

impl NumberSequenceRepository {
    /// Atomically allocates the next document number for `(doc_type, year)`
    /// on the caller's transaction and formats it.
    ///
    /// # Errors
    ///
    /// Returns the retryable `AllocationFailed`; the caller retries the
    /// whole finalization, never just this step.
    pub async fn allocate<C: ConnectionTrait>(
        conn: &C,
        config: &NumberingConfig,
        doc_type: DocumentType,
        year: i32,
    ) -> Result<String, NumberingError> {
        let statement = Statement::from_sql_and_values(
            DbBackend::Postgres,
            ALLOCATE_SQL,
            [doc_type.as_str().into(), year.into()],
        );

        let row = conn
            .query_one(statement)
            .await
            .map_err(|e| NumberingError::AllocationFailed {
                reason: e.to_string(),
            })?
            .ok_or_else(|| NumberingError::AllocationFailed {
                reason: "allocation statement returned no row".to_string(),
            })?;

        let current: i64 =
            row.try_get("", "current_number")
                .map_err(|e| NumberingError::AllocationFailed {
                    reason: e.to_string(),
                })?;
        let number = u64::try_from(current).map_err(|_| NumberingError::AllocationFailed {
            reason: format!("counter out of range: {current}"),
        })?;

        Ok(format_document_number(config, doc_type, year, number))
    }
}
