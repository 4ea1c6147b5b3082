//! Integration tests for the reconciliation workflow.
//!
//! Exercises the scoring engine together with the status decision
//! functions the repository applies: import → suggest → match → confirm,
//! plus the manual override and ignore paths.

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use kontor_core::invoice::InvoiceService;
    use kontor_core::invoice::error::InvoiceError;
    use kontor_core::invoice::types::{DocumentType, Invoice, InvoiceStatus};
    use kontor_core::reconciliation::{
        self, BankTransaction, CandidateRef, MatchCandidate, MatchResult, ReconciliationEngine,
        ReconciliationError, ReconciliationStatus,
    };
    use kontor_shared::config::ReconciliationConfig;
    use kontor_shared::types::money::Currency;
    use kontor_shared::types::{
        BankAccountId, BankTransactionId, CustomerId, ExpenseId, InvoiceId, OrganizationId,
    };

    // ========================================================================
    // Helper Functions
    // ========================================================================

    fn engine() -> ReconciliationEngine {
        ReconciliationEngine::new(ReconciliationConfig::default())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn transaction(amount: Decimal, purpose: &str, booking: NaiveDate) -> BankTransaction {
        BankTransaction {
            id: BankTransactionId::new(),
            bank_account_id: BankAccountId::new(),
            amount,
            booking_date: booking,
            purpose: purpose.to_string(),
            counterparty: None,
            reference: "STMT-0001".to_string(),
            reconciliation_status: ReconciliationStatus::Unmatched,
            matched_payment_id: None,
            matched_expense_id: None,
        }
    }

    fn open_invoice(total: Decimal) -> Invoice {
        let now = Utc::now();
        Invoice {
            id: InvoiceId::new(),
            organization_id: OrganizationId::new(),
            customer_id: CustomerId::new(),
            project_id: None,
            document_type: DocumentType::Invoice,
            invoice_number: Some("RE-2026-0001".to_string()),
            status: InvoiceStatus::Sent,
            issued_date: date(2026, 1, 10),
            due_date: date(2026, 2, 9),
            currency: Currency::Eur,
            subtotal: total,
            tax_amount: Decimal::ZERO,
            total,
            notes: None,
            internal_note: None,
            line_items: Vec::new(),
            payments: Vec::new(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn invoice_candidate(number: &str, amount: Decimal, due: NaiveDate) -> MatchCandidate {
        MatchCandidate {
            target: CandidateRef::Invoice(InvoiceId::new()),
            reference: number.to_string(),
            amount,
            date: due,
        }
    }

    // ========================================================================
    // Match Scenario Tests
    // ========================================================================

    #[test]
    fn test_exact_amount_with_number_auto_matches() {
        let tx = transaction(
            dec!(484.93),
            "Zahlung RE-2026-0001, vielen Dank",
            date(2026, 2, 5),
        );
        let candidate = invoice_candidate("RE-2026-0001", dec!(484.93), date(2026, 2, 9));

        // Reference + exact amount + date proximity clears the threshold.
        let result = engine().auto_reconcile(&tx, &[candidate.clone()]).unwrap();
        match result {
            MatchResult::Matched { target, confidence } => {
                assert_eq!(target, candidate.target);
                assert_eq!(confidence, Decimal::ONE);
            }
            MatchResult::Unmatched { .. } => panic!("expected an automatic match"),
        }
    }

    #[test]
    fn test_weak_signal_suggests_but_never_auto_matches() {
        // Amount off by half, no document number in the purpose; only the
        // date signal fires.
        let tx = transaction(dec!(242.00), "Teilzahlung", date(2026, 2, 5));
        let candidate = invoice_candidate("RE-2026-0001", dec!(484.93), date(2026, 2, 9));

        let result = engine().auto_reconcile(&tx, &[candidate]).unwrap();
        match result {
            MatchResult::Unmatched { suggestions } => {
                assert_eq!(suggestions.len(), 1);
                assert_eq!(suggestions[0].confidence, dec!(0.10));
            }
            MatchResult::Matched { .. } => panic!("weak signal must not auto-match"),
        }
    }

    #[test]
    fn test_suggestions_ranked_best_first() {
        let tx = transaction(dec!(484.93), "RE-2026-0001", date(2026, 2, 5));
        let strong = invoice_candidate("RE-2026-0001", dec!(484.93), date(2026, 2, 9));
        let weak = invoice_candidate("RE-2026-0044", dec!(480.00), date(2026, 2, 6));

        let suggestions = engine().suggest_matches(&tx, &[weak.clone(), strong.clone()]);
        assert_eq!(suggestions[0].candidate.target, strong.target);
        assert!(suggestions[0].confidence > suggestions[1].confidence);
    }

    #[test]
    fn test_auto_reconcile_refuses_already_matched() {
        let mut tx = transaction(dec!(100.00), "irrelevant", date(2026, 2, 5));
        tx.reconciliation_status = ReconciliationStatus::Matched;

        assert!(matches!(
            engine().auto_reconcile(&tx, &[]),
            Err(ReconciliationError::NotUnmatched {
                status: ReconciliationStatus::Matched
            })
        ));
    }

    #[test]
    fn test_outflow_matches_expense_candidates() {
        let tx = transaction(dec!(-89.90), "Beleg B-2026-17 Hosting", date(2026, 3, 3));
        let candidate = MatchCandidate {
            target: CandidateRef::Expense(ExpenseId::new()),
            reference: "B-2026-17".to_string(),
            amount: dec!(89.90),
            date: date(2026, 3, 1),
        };

        // Signed amounts compare by absolute value.
        let result = engine().auto_reconcile(&tx, &[candidate.clone()]).unwrap();
        assert!(matches!(
            result,
            MatchResult::Matched { target, .. } if target == candidate.target
        ));
    }

    #[test]
    fn test_overshooting_inflow_rejected_not_truncated() {
        // Matching books the full statement amount against the invoice.
        // An inflow larger than the open balance is rejected by the
        // payment validator, never shrunk to fit.
        let invoice = open_invoice(dec!(484.93));
        let tx = transaction(dec!(600.00), "Zahlung RE-2026-0001", date(2026, 2, 5));

        let err = InvoiceService::validate_payment(&invoice, tx.amount.abs()).unwrap_err();
        assert!(matches!(
            err,
            InvoiceError::PaymentExceedsOutstanding { .. }
        ));
    }

    // ========================================================================
    // Status Decision Tests
    // ========================================================================

    #[test]
    fn test_confirm_then_confirm_again_is_noop() {
        let first = reconciliation::confirm(ReconciliationStatus::Matched).unwrap();
        assert_eq!(first, Some(ReconciliationStatus::Confirmed));

        // Idempotent: no state change, no journal entry to write.
        let second = reconciliation::confirm(ReconciliationStatus::Confirmed).unwrap();
        assert_eq!(second, None);
    }

    #[test]
    fn test_confirm_without_match_rejected() {
        assert!(matches!(
            reconciliation::confirm(ReconciliationStatus::Unmatched),
            Err(ReconciliationError::NothingToConfirm { .. })
        ));
    }

    #[test]
    fn test_unmatch_reopens_confirmed_transactions() {
        assert_eq!(
            reconciliation::unmatch(ReconciliationStatus::Confirmed),
            Some(ReconciliationStatus::Unmatched)
        );
        assert_eq!(reconciliation::unmatch(ReconciliationStatus::Unmatched), None);
    }

    #[test]
    fn test_ignore_only_from_unmatched() {
        assert_eq!(
            reconciliation::ignore(ReconciliationStatus::Unmatched).unwrap(),
            Some(ReconciliationStatus::Ignored)
        );
        assert!(matches!(
            reconciliation::ignore(ReconciliationStatus::Matched),
            Err(ReconciliationError::NotUnmatched { .. })
        ));
    }

    // ========================================================================
    // Property Tests
    // ========================================================================

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Whatever the inputs, an automatic match only ever happens at or
        /// above the configured threshold.
        #[test]
        fn prop_auto_match_respects_threshold(
            tx_amount in amount_strategy(),
            candidate_amount in amount_strategy(),
            day_offset in 0i64..60i64,
            with_reference in any::<bool>(),
        ) {
            let purpose = if with_reference {
                "payment for RE-2026-0042".to_string()
            } else {
                "payment".to_string()
            };
            let tx = transaction(tx_amount, &purpose, date(2026, 2, 5));
            let candidate = invoice_candidate(
                "RE-2026-0042",
                candidate_amount,
                date(2026, 2, 5) + chrono::Duration::days(day_offset),
            );

            let config = ReconciliationConfig::default();
            let result = engine().auto_reconcile(&tx, &[candidate]).unwrap();
            match result {
                MatchResult::Matched { confidence, .. } => {
                    prop_assert!(confidence >= config.auto_match_threshold);
                }
                MatchResult::Unmatched { suggestions } => {
                    for s in &suggestions {
                        prop_assert!(s.confidence < config.auto_match_threshold);
                        prop_assert!(s.confidence > Decimal::ZERO);
                    }
                }
            }
        }

        /// Confidence is always within [0, 1] regardless of signal overlap.
        #[test]
        fn prop_confidence_bounded(
            tx_amount in amount_strategy(),
            candidate_amount in amount_strategy(),
            day_offset in 0i64..60i64,
        ) {
            let tx = transaction(tx_amount, "RE-2026-0042", date(2026, 2, 5));
            let candidate = invoice_candidate(
                "RE-2026-0042",
                candidate_amount,
                date(2026, 2, 5) + chrono::Duration::days(day_offset),
            );

            let confidence = engine().score(&tx, &candidate);
            prop_assert!(confidence >= Decimal::ZERO);
            prop_assert!(confidence <= Decimal::ONE);
        }
    }
}
