//! Property-based tests for derived totals and payment invariants.

use proptest::prelude::*;
use rust_decimal::Decimal;

use kontor_shared::types::{InvoiceId, LineItemId};

use super::service::InvoiceService;
use super::service::tests_support::invoice_with_total;
use super::totals::{compute_invoice_totals, compute_line_totals};
use super::types::LineItem;

/// Strategy for a plausible quantity: 0.01 .. 1000.00.
fn quantity() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for a unit price: 0.00 .. 10,000.00.
fn unit_price() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for a tax rate: 0 .. 25.00 percent.
fn tax_rate() -> impl Strategy<Value = Decimal> {
    (0i64..2500i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for a discount: 0 .. 100.00 percent.
fn discount() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn line_strategy(position: u32) -> impl Strategy<Value = LineItem> {
    (quantity(), unit_price(), tax_rate(), discount()).prop_map(
        move |(quantity, unit_price, tax_rate, discount_percent)| LineItem {
            id: LineItemId::new(),
            invoice_id: InvoiceId::new(),
            position,
            description: String::new(),
            quantity,
            unit_price,
            tax_rate,
            discount_percent,
        },
    )
}

fn lines_strategy() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(line_strategy(1), 1..8).prop_map(|mut lines| {
        for (index, line) in lines.iter_mut().enumerate() {
            line.position = u32::try_from(index).unwrap() + 1;
        }
        lines
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any line item, `total == subtotal_after_discount + tax_amount`
    /// and `subtotal_after_discount == subtotal - discount_amount`.
    #[test]
    fn prop_line_totals_are_internally_consistent(line in line_strategy(1)) {
        let totals = compute_line_totals(&line);
        prop_assert_eq!(totals.total, totals.subtotal_after_discount + totals.tax_amount);
        prop_assert_eq!(
            totals.subtotal_after_discount,
            totals.subtotal - totals.discount_amount
        );
        prop_assert!(totals.discount_amount >= Decimal::ZERO);
        prop_assert!(totals.tax_amount >= Decimal::ZERO);
        prop_assert!(totals.subtotal_after_discount >= Decimal::ZERO);
    }

    /// For any invoice, `total == subtotal + tax_amount`,
    /// `subtotal == Σ line.subtotal_after_discount` and
    /// `tax_amount == Σ line.tax_amount`.
    #[test]
    fn prop_invoice_totals_are_line_sums(lines in lines_strategy()) {
        let totals = compute_invoice_totals(&lines);
        let expected_subtotal: Decimal = lines
            .iter()
            .map(|l| compute_line_totals(l).subtotal_after_discount)
            .sum();
        let expected_tax: Decimal = lines
            .iter()
            .map(|l| compute_line_totals(l).tax_amount)
            .sum();

        prop_assert_eq!(totals.subtotal, expected_subtotal);
        prop_assert_eq!(totals.tax_amount, expected_tax);
        prop_assert_eq!(totals.total, totals.subtotal + totals.tax_amount);
        prop_assert!(totals.total >= Decimal::ZERO);
    }

    /// Validation accepts any generated line set (the strategies only
    /// produce in-range values with dense positions).
    #[test]
    fn prop_generated_lines_validate(lines in lines_strategy()) {
        prop_assert!(InvoiceService::validate_line_items(&lines).is_ok());
    }

    /// A payment above the outstanding amount is always rejected; one at or
    /// below it is always accepted.
    #[test]
    fn prop_payment_never_exceeds_total(
        total_cents in 1i64..10_000_000i64,
        attempt_cents in 1i64..20_000_000i64,
    ) {
        let total = Decimal::new(total_cents, 2);
        let attempt = Decimal::new(attempt_cents, 2);
        let invoice = invoice_with_total(total);

        let result = InvoiceService::validate_payment(&invoice, attempt);
        if attempt > total {
            prop_assert!(result.is_err());
        } else {
            prop_assert!(result.is_ok());
        }
    }
}
