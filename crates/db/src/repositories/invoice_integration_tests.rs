//! Integration tests for the invoice workflow.
//!
//! Exercises the full rule chain the repository composes: draft validation
//! → finalization → payment recording → derived status reevaluation, plus
//! the immutability window and snapshot diffing.

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use crate::repositories::invoice::{line_change_set, lines_domain_differ};
    use kontor_core::audit::diff::diff_snapshots;
    use kontor_core::invoice::error::InvoiceError;
    use kontor_core::invoice::types::{
        DocumentType, Invoice, InvoiceStatus, LineItem, Payment,
    };
    use kontor_core::invoice::InvoiceService;
    use kontor_core::lifecycle::LifecycleService;
    use kontor_shared::actor::ActorContext;
    use kontor_shared::types::money::Currency;
    use kontor_shared::types::{
        CustomerId, InvoiceId, LineItemId, OrganizationId, PaymentId, UserId,
    };

    // ========================================================================
    // Helper Functions
    // ========================================================================

    fn actor() -> ActorContext {
        ActorContext::user(UserId::new(), None)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn line(position: u32, quantity: Decimal, unit_price: Decimal, discount: Decimal) -> LineItem {
        LineItem {
            id: LineItemId::new(),
            invoice_id: InvoiceId::new(),
            position,
            description: format!("Position {position}"),
            quantity,
            unit_price,
            tax_rate: dec!(19),
            discount_percent: discount,
        }
    }

    fn draft(line_items: Vec<LineItem>) -> Invoice {
        let now = Utc::now();
        let mut invoice = Invoice {
            id: InvoiceId::new(),
            organization_id: OrganizationId::new(),
            customer_id: CustomerId::new(),
            project_id: None,
            document_type: DocumentType::Invoice,
            invoice_number: None,
            status: InvoiceStatus::Draft,
            issued_date: date(2026, 1, 10),
            due_date: date(2026, 2, 9),
            currency: Currency::Eur,
            subtotal: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total: Decimal::ZERO,
            notes: None,
            internal_note: None,
            line_items,
            payments: Vec::new(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        InvoiceService::recompute_totals(&mut invoice).unwrap();
        invoice
    }

    fn pay(invoice: &mut Invoice, amount: Decimal, day: NaiveDate) {
        InvoiceService::validate_payment(invoice, amount).unwrap();
        invoice.payments.push(Payment {
            id: PaymentId::new(),
            invoice_id: invoice.id,
            amount,
            payment_date: day,
            method: None,
            reference: None,
        });
        if let Some(action) = LifecycleService::reevaluate(invoice, day) {
            invoice.status = action.new_status;
        }
    }

    // ========================================================================
    // Full Workflow Tests
    // ========================================================================

    #[test]
    fn test_full_lifecycle_draft_to_paid() {
        // Two positions: 2 x 85.00 and 1 x 250.00 at 5% discount, 19% tax.
        let mut invoice = draft(vec![
            line(1, dec!(2), dec!(85.00), dec!(0)),
            line(2, dec!(1), dec!(250.00), dec!(5)),
        ]);
        assert_eq!(invoice.subtotal, dec!(407.50));
        assert_eq!(invoice.tax_amount, dec!(77.43));
        assert_eq!(invoice.total, dec!(484.93));

        // Finalize with an allocated number.
        InvoiceService::validate_for_finalization(&invoice).unwrap();
        invoice.invoice_number = Some("RE-2026-0001".to_string());
        let action = LifecycleService::finalize(&invoice, &actor()).unwrap();
        invoice.status = action.new_status;
        assert_eq!(invoice.status, InvoiceStatus::Sent);

        // A partial payment, then the remainder.
        pay(&mut invoice, dec!(200.00), date(2026, 1, 20));
        assert_eq!(invoice.status, InvoiceStatus::Partial);
        assert_eq!(invoice.outstanding_amount(), dec!(284.93));

        pay(&mut invoice, dec!(284.93), date(2026, 2, 1));
        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert!(invoice.is_paid());
        assert_eq!(invoice.outstanding_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_finalized_invoice_rejects_line_changes() {
        let mut invoice = draft(vec![line(1, dec!(1), dec!(100.00), dec!(0))]);
        invoice.invoice_number = Some("RE-2026-0002".to_string());
        invoice.status = LifecycleService::finalize(&invoice, &actor())
            .unwrap()
            .new_status;

        assert_eq!(
            InvoiceService::ensure_mutable(invoice.status, "line_items"),
            Err(InvoiceError::ImmutableLedgerEntry {
                field: "line_items",
                status: InvoiceStatus::Sent
            })
        );
        // Totals are frozen with the lines.
        assert!(InvoiceService::recompute_totals(&mut invoice).is_err());
    }

    #[test]
    fn test_overpayment_rejected_whole_leaves_state_intact() {
        let mut invoice = draft(vec![line(1, dec!(1), dec!(100.00), dec!(0))]);
        invoice.invoice_number = Some("RE-2026-0003".to_string());
        invoice.status = InvoiceStatus::Sent;
        pay(&mut invoice, dec!(60.00), date(2026, 1, 15));

        let err = InvoiceService::validate_payment(&invoice, dec!(100.00)).unwrap_err();
        assert!(matches!(
            err,
            InvoiceError::PaymentExceedsOutstanding { .. }
        ));
        assert_eq!(invoice.paid_amount(), dec!(60.00));
        assert_eq!(invoice.status, InvoiceStatus::Partial);
    }

    #[test]
    fn test_overdue_resolves_to_paid_not_back_to_sent() {
        let mut invoice = draft(vec![line(1, dec!(1), dec!(100.00), dec!(0))]);
        invoice.invoice_number = Some("RE-2026-0004".to_string());
        invoice.status = InvoiceStatus::Sent;

        // Past due with nothing paid.
        let action = LifecycleService::reevaluate(&invoice, date(2026, 3, 1)).unwrap();
        invoice.status = action.new_status;
        assert_eq!(invoice.status, InvoiceStatus::Overdue);

        // Full payment while overdue.
        pay(&mut invoice, dec!(119.00), date(2026, 3, 5));
        assert_eq!(invoice.status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_cancelled_invoice_accepts_no_payments() {
        let mut invoice = draft(vec![line(1, dec!(1), dec!(100.00), dec!(0))]);
        invoice.invoice_number = Some("RE-2026-0005".to_string());
        invoice.status = InvoiceStatus::Sent;
        invoice.status = LifecycleService::cancel(&invoice, &actor())
            .unwrap()
            .new_status;

        assert_eq!(
            InvoiceService::validate_payment(&invoice, dec!(10.00)),
            Err(InvoiceError::PaymentNotAllowed {
                status: InvoiceStatus::Cancelled
            })
        );
    }

    // ========================================================================
    // Snapshot Diff Tests
    // ========================================================================

    #[test]
    fn test_update_diff_records_changed_fields_only() {
        let old = json!({"due_date": "2026-02-09", "notes": null, "total": "484.93"});
        let new = json!({"due_date": "2026-03-09", "notes": null, "total": "484.93"});

        let change = diff_snapshots(&old, &new).unwrap().unwrap();
        assert_eq!(change.old_values, json!({"due_date": "2026-02-09"}));
        assert_eq!(change.new_values, json!({"due_date": "2026-03-09"}));
    }

    #[test]
    fn test_noop_update_produces_no_change_set() {
        let snapshot = json!({"due_date": "2026-02-09", "notes": "unchanged"});
        assert!(diff_snapshots(&snapshot, &snapshot).unwrap().is_none());
    }

    #[test]
    fn test_line_item_edit_audits_the_changed_rows() {
        // A description edit leaves the totals untouched; the audit entry
        // must still carry the differing row, old and new side by side.
        let before = vec![
            line(1, dec!(2), dec!(85.00), dec!(0)),
            line(2, dec!(1), dec!(250.00), dec!(5)),
        ];
        let mut after = before.clone();
        after[1].description = "Beratung März".to_string();

        assert!(lines_domain_differ(&before, &after));
        let change = line_change_set(&before, &after);
        let old = change.old_values["line_items"].as_array().unwrap();
        let new = change.new_values["line_items"].as_array().unwrap();

        // Only the edited position is recorded.
        assert_eq!(old.len(), 1);
        assert_eq!(new.len(), 1);
        assert_eq!(old[0]["position"], json!(2));
        assert_eq!(old[0]["description"], json!("Position 2"));
        assert_eq!(new[0]["description"], json!("Beratung März"));
        assert_ne!(change.old_values, change.new_values);
    }

    #[test]
    fn test_line_item_removal_diffs_against_null() {
        let before = vec![
            line(1, dec!(1), dec!(100.00), dec!(0)),
            line(2, dec!(1), dec!(50.00), dec!(0)),
        ];
        let after = vec![before[0].clone()];

        let change = line_change_set(&before, &after);
        assert_eq!(change.old_values["line_items"][0]["position"], json!(2));
        assert_eq!(change.new_values["line_items"][0], json!(null));
    }

    #[test]
    fn test_line_item_reorder_without_edit_is_not_a_change() {
        // IDs regenerate on every replacement and the vec order is not
        // content; only field-level differences count.
        let before = vec![
            line(1, dec!(1), dec!(100.00), dec!(0)),
            line(2, dec!(1), dec!(50.00), dec!(0)),
        ];
        let after = vec![before[1].clone(), before[0].clone()];
        assert!(!lines_domain_differ(&before, &after));
    }

    // ========================================================================
    // Property Tests
    // ========================================================================

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// A payment is accepted exactly when it fits the outstanding
        /// balance, so the paid amount can never exceed the total.
        #[test]
        fn prop_payments_never_exceed_total(
            total in amount_strategy(),
            attempt in amount_strategy(),
        ) {
            let mut invoice = draft(vec![line(1, dec!(1), total, dec!(0))]);
            invoice.invoice_number = Some("RE-2026-0001".to_string());
            invoice.status = InvoiceStatus::Sent;
            invoice.tax_amount = Decimal::ZERO;
            invoice.total = invoice.subtotal;

            let accepted = InvoiceService::validate_payment(&invoice, attempt).is_ok();
            prop_assert_eq!(accepted, attempt <= invoice.total);
        }

        /// The derived status partitions cleanly: paid beats overdue beats
        /// partial beats sent.
        #[test]
        fn prop_derived_status_partition(
            total in amount_strategy(),
            paid_percent in 0u32..150u32,
            days_past_due in -30i64..30i64,
        ) {
            let paid = total * Decimal::from(paid_percent) / dec!(100);
            let due = date(2026, 2, 9);
            let today = due + chrono::Duration::days(days_past_due);

            let status = LifecycleService::derive_payment_status(total, paid, due, today);
            if paid >= total {
                prop_assert_eq!(status, InvoiceStatus::Paid);
            } else if today > due {
                prop_assert_eq!(status, InvoiceStatus::Overdue);
            } else if paid > Decimal::ZERO {
                prop_assert_eq!(status, InvoiceStatus::Partial);
            } else {
                prop_assert_eq!(status, InvoiceStatus::Sent);
            }
        }
    }
}
