//! Property-based tests for the scoring engine.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use kontor_shared::config::ReconciliationConfig;
use kontor_shared::types::{BankAccountId, BankTransactionId, InvoiceId};

use super::engine::ReconciliationEngine;
use super::types::{BankTransaction, CandidateRef, MatchCandidate, MatchResult, ReconciliationStatus};

fn amount() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn date() -> impl Strategy<Value = NaiveDate> {
    (0i64..730i64).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Duration::days(offset)
    })
}

fn purpose() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 -]{0,60}"
}

fn transaction_strategy() -> impl Strategy<Value = BankTransaction> {
    (amount(), date(), purpose()).prop_map(|(amount, booking_date, purpose)| BankTransaction {
        id: BankTransactionId::new(),
        bank_account_id: BankAccountId::new(),
        amount,
        booking_date,
        purpose,
        counterparty: None,
        reference: "TX".to_string(),
        reconciliation_status: ReconciliationStatus::Unmatched,
        matched_payment_id: None,
        matched_expense_id: None,
    })
}

fn candidate_strategy() -> impl Strategy<Value = MatchCandidate> {
    (positive_amount(), date(), "[A-Z]{2}-[0-9]{4}-[0-9]{4}").prop_map(
        |(amount, date, reference)| MatchCandidate {
            target: CandidateRef::Invoice(InvoiceId::new()),
            reference,
            amount,
            date,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Confidence always lands in `[0, 1]`, whatever the inputs.
    #[test]
    fn prop_confidence_bounded(
        tx in transaction_strategy(),
        candidate in candidate_strategy(),
    ) {
        let engine = ReconciliationEngine::new(ReconciliationConfig::default());
        let confidence = engine.score(&tx, &candidate);
        prop_assert!(confidence >= Decimal::ZERO);
        prop_assert!(confidence <= Decimal::ONE);
    }

    /// An auto-match decision always carries at-threshold confidence; a
    /// below-threshold best candidate never flips the status.
    #[test]
    fn prop_auto_match_respects_threshold(
        tx in transaction_strategy(),
        candidates in prop::collection::vec(candidate_strategy(), 0..6),
    ) {
        let config = ReconciliationConfig::default();
        let threshold = config.auto_match_threshold;
        let engine = ReconciliationEngine::new(config);

        match engine.auto_reconcile(&tx, &candidates).unwrap() {
            MatchResult::Matched { confidence, .. } => {
                prop_assert!(confidence >= threshold);
            }
            MatchResult::Unmatched { suggestions } => {
                for suggestion in &suggestions {
                    prop_assert!(suggestion.confidence < threshold);
                }
            }
        }
    }

    /// Suggestions come back ordered: confidence descending, ties by
    /// date nearest the booking date.
    #[test]
    fn prop_suggestions_ordered(
        tx in transaction_strategy(),
        candidates in prop::collection::vec(candidate_strategy(), 0..8),
    ) {
        let engine = ReconciliationEngine::new(ReconciliationConfig::default());
        let suggestions = engine.suggest_matches(&tx, &candidates);

        for pair in suggestions.windows(2) {
            prop_assert!(pair[0].confidence >= pair[1].confidence);
            if pair[0].confidence == pair[1].confidence {
                let gap_first = (tx.booking_date - pair[0].candidate.date).num_days().abs();
                let gap_second = (tx.booking_date - pair[1].candidate.date).num_days().abs();
                prop_assert!(gap_first <= gap_second);
            }
        }
        prop_assert!(suggestions.iter().all(|s| s.confidence > Decimal::ZERO));
    }
}
