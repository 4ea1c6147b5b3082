//! Property-based tests for the status state machine.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use kontor_shared::actor::ActorContext;

use super::service::LifecycleService;
use crate::invoice::service::tests_support::invoice_with_total;
use crate::invoice::types::InvoiceStatus;

fn any_status() -> impl Strategy<Value = InvoiceStatus> {
    prop_oneof![
        Just(InvoiceStatus::Draft),
        Just(InvoiceStatus::Sent),
        Just(InvoiceStatus::Paid),
        Just(InvoiceStatus::Partial),
        Just(InvoiceStatus::Overdue),
        Just(InvoiceStatus::Cancelled),
    ]
}

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..3650u64).prop_map(|days| {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Days::new(days)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Cancellation succeeds from exactly the non-terminal states.
    #[test]
    fn prop_cancel_only_from_non_terminal(status in any_status()) {
        let mut invoice = invoice_with_total(Decimal::ONE_HUNDRED);
        invoice.status = status;
        let result = LifecycleService::cancel(&invoice, &ActorContext::system());
        prop_assert_eq!(result.is_ok(), !status.is_terminal());
    }

    /// A user can never move an invoice into a payment-derived status.
    #[test]
    fn prop_derived_statuses_unreachable_by_user(
        from in any_status(),
        to in prop_oneof![
            Just(InvoiceStatus::Paid),
            Just(InvoiceStatus::Partial),
            Just(InvoiceStatus::Overdue),
        ],
    ) {
        let mut invoice = invoice_with_total(Decimal::ONE_HUNDRED);
        invoice.status = from;
        prop_assert!(
            LifecycleService::transition(&invoice, to, &ActorContext::system()).is_err()
        );
    }

    /// The derived status is a function: paid wins over overdue, overdue
    /// wins over partial, and an untouched invoice stays sent.
    #[test]
    fn prop_derive_payment_status_total_order(
        total_cents in 1i64..10_000_000i64,
        paid_cents in 0i64..10_000_000i64,
        due in any_date(),
        today in any_date(),
    ) {
        let total = Decimal::new(total_cents, 2);
        let paid = Decimal::new(paid_cents, 2);
        let derived = LifecycleService::derive_payment_status(total, paid, due, today);

        if paid >= total {
            prop_assert_eq!(derived, InvoiceStatus::Paid);
        } else if today > due {
            prop_assert_eq!(derived, InvoiceStatus::Overdue);
        } else if paid > Decimal::ZERO {
            prop_assert_eq!(derived, InvoiceStatus::Partial);
        } else {
            prop_assert_eq!(derived, InvoiceStatus::Sent);
        }
    }

    /// Reevaluation is idempotent: applying the derived status and
    /// reevaluating again yields no further transition.
    #[test]
    fn prop_reevaluate_is_idempotent(
        paid_cents in 0i64..20_000i64,
        today in any_date(),
    ) {
        let mut invoice = invoice_with_total(Decimal::new(10_000, 2));
        invoice.status = InvoiceStatus::Sent;
        if paid_cents > 0 {
            invoice.payments.push(crate::invoice::types::Payment {
                id: kontor_shared::types::PaymentId::new(),
                invoice_id: invoice.id,
                amount: Decimal::new(paid_cents.min(10_000), 2),
                payment_date: today,
                method: None,
                reference: None,
            });
        }

        if let Some(action) = LifecycleService::reevaluate(&invoice, today) {
            invoice.status = action.new_status;
            prop_assert!(LifecycleService::reevaluate(&invoice, today).is_none());
        }
    }
}
