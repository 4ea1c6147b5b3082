//! Scored matching of imported bank transactions to open ledger items.
//!
//! The engine is pure: it takes a transaction plus the candidate set loaded
//! by the caller and returns ranked suggestions or an auto-match decision.
//! Applying a decision (and resolving concurrent attempts on one
//! transaction) is the repository's job.

pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::{ReconciliationEngine, confirm, ignore, unmatch};
pub use error::ReconciliationError;
pub use types::{
    BankTransaction, CandidateRef, MatchCandidate, MatchResult, ReconciliationStatus,
    ScoredCandidate,
};
