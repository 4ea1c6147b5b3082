//! Numbering authority: gap-tolerant, duplicate-free document numbers.
//!
//! Numbers are year-scoped per document type, formatted as
//! `<PREFIX>-<YEAR>-<NNNN>`. Allocation is an atomic increment of the
//! `(doc_type, year)` counter — the single serialization point of the
//! system. Gaps are acceptable (a failed caller never "returns" a number);
//! duplicates are forbidden.

pub mod error;
pub mod format;
pub mod sequence;

pub use error::NumberingError;
pub use format::{format_document_number, prefix_for};
pub use sequence::InMemorySequences;
