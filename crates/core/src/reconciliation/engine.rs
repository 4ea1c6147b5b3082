//! Confidence scoring and match decisions.

use rust_decimal::Decimal;

use kontor_shared::config::ReconciliationConfig;

use super::error::ReconciliationError;
use super::types::{
    BankTransaction, MatchCandidate, MatchResult, ReconciliationStatus, ScoredCandidate,
};

/// Stateless scoring engine. Construct once with the tenant's configuration
/// and reuse across transactions.
#[derive(Debug, Clone)]
pub struct ReconciliationEngine {
    config: ReconciliationConfig,
}

impl ReconciliationEngine {
    /// Creates an engine with the given scoring configuration.
    #[must_use]
    pub fn new(config: ReconciliationConfig) -> Self {
        Self { config }
    }

    /// Scores one candidate against one transaction.
    ///
    /// Signals are additive and independently earned: document number found
    /// in the purpose text, exact or approximate amount match (mutually
    /// exclusive, exact wins), and date proximity. The sum is capped at 1.
    #[must_use]
    pub fn score(&self, transaction: &BankTransaction, candidate: &MatchCandidate) -> Decimal {
        let mut confidence = Decimal::ZERO;

        if !candidate.reference.is_empty()
            && transaction
                .purpose
                .to_lowercase()
                .contains(&candidate.reference.to_lowercase())
        {
            confidence += self.config.reference_weight;
        }

        let amount = transaction.amount.abs();
        if amount == candidate.amount {
            confidence += self.config.exact_amount_weight;
        } else if (amount - candidate.amount).abs()
            <= candidate.amount * self.config.amount_tolerance
        {
            confidence += self.config.approx_amount_weight;
        }

        let day_gap = (transaction.booking_date - candidate.date).num_days().abs();
        if day_gap <= self.config.date_window_days {
            confidence += self.config.date_weight;
        }

        confidence.min(Decimal::ONE)
    }

    /// Returns candidates with non-zero confidence, best first.
    ///
    /// Ordering is by descending confidence; ties are broken by the
    /// candidate date nearest the booking date.
    #[must_use]
    pub fn suggest_matches(
        &self,
        transaction: &BankTransaction,
        candidates: &[MatchCandidate],
    ) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> = candidates
            .iter()
            .map(|candidate| ScoredCandidate {
                candidate: candidate.clone(),
                confidence: self.score(transaction, candidate),
            })
            .filter(|s| s.confidence > Decimal::ZERO)
            .collect();

        scored.sort_by(|a, b| {
            let gap_a = (transaction.booking_date - a.candidate.date).num_days().abs();
            let gap_b = (transaction.booking_date - b.candidate.date).num_days().abs();
            b.confidence.cmp(&a.confidence).then(gap_a.cmp(&gap_b))
        });
        scored
    }

    /// Decides whether the transaction auto-matches.
    ///
    /// Only `unmatched` transactions are eligible. At or above the
    /// threshold the decision is `matched` — never `confirmed`, which
    /// always requires an explicit human action. Below the threshold the
    /// ranked suggestions are returned and the transaction stays put.
    ///
    /// # Errors
    ///
    /// Returns `NotUnmatched` if the transaction already left `unmatched`.
    pub fn auto_reconcile(
        &self,
        transaction: &BankTransaction,
        candidates: &[MatchCandidate],
    ) -> Result<MatchResult, ReconciliationError> {
        if transaction.reconciliation_status != ReconciliationStatus::Unmatched {
            return Err(ReconciliationError::NotUnmatched {
                status: transaction.reconciliation_status,
            });
        }

        let suggestions = self.suggest_matches(transaction, candidates);
        match suggestions.first() {
            Some(best) if best.confidence >= self.config.auto_match_threshold => {
                Ok(MatchResult::Matched {
                    target: best.candidate.target,
                    confidence: best.confidence,
                })
            }
            _ => Ok(MatchResult::Unmatched { suggestions }),
        }
    }
}

/// Decides the status written by an explicit confirmation.
///
/// Confirming an already-confirmed transaction is a no-op (`Ok(None)`), not
/// an error.
///
/// # Errors
///
/// Returns `NothingToConfirm` when there is no match to confirm.
pub fn confirm(
    status: ReconciliationStatus,
) -> Result<Option<ReconciliationStatus>, ReconciliationError> {
    match status {
        ReconciliationStatus::Matched => Ok(Some(ReconciliationStatus::Confirmed)),
        ReconciliationStatus::Confirmed => Ok(None),
        other => Err(ReconciliationError::NothingToConfirm { status: other }),
    }
}

/// Decides the status written by an unmatch. Reversing a match never
/// touches the underlying payment or expense; already-unmatched is a no-op.
#[must_use]
pub fn unmatch(status: ReconciliationStatus) -> Option<ReconciliationStatus> {
    match status {
        ReconciliationStatus::Unmatched => None,
        _ => Some(ReconciliationStatus::Unmatched),
    }
}

/// Decides the status written when marking a transaction not reconcilable.
///
/// # Errors
///
/// Returns `NotUnmatched` when the transaction is matched or confirmed.
pub fn ignore(
    status: ReconciliationStatus,
) -> Result<Option<ReconciliationStatus>, ReconciliationError> {
    match status {
        ReconciliationStatus::Unmatched => Ok(Some(ReconciliationStatus::Ignored)),
        ReconciliationStatus::Ignored => Ok(None),
        other => Err(ReconciliationError::NotUnmatched { status: other }),
    }
}
