//! Invoice service: draft validation, mutability windows, payment rules.
//!
//! This service contains pure business logic with no database dependencies.
//! The repository layer calls it before every persisted mutation.

use rust_decimal::Decimal;

use super::error::InvoiceError;
use super::totals::compute_invoice_totals;
use super::types::{Invoice, InvoiceStatus, LineItem};

/// Fields frozen once an invoice leaves `draft`.
///
/// Notes and internal annotations stay mutable in every status; everything
/// financially relevant is guarded through [`InvoiceService::ensure_mutable`].
pub const FROZEN_FIELDS: &[&str] = &[
    "invoice_number",
    "line_items",
    "subtotal",
    "tax_amount",
    "total",
    "issued_date",
    "currency",
];

/// Stateless service enforcing ledger entity rules.
pub struct InvoiceService;

impl InvoiceService {
    /// Validates a set of line items for a draft invoice.
    ///
    /// Checks value ranges and that positions are dense 1..N in order.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate_line_items(lines: &[LineItem]) -> Result<(), InvoiceError> {
        for (index, line) in lines.iter().enumerate() {
            let expected = u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1);
            if line.position != expected {
                return Err(InvoiceError::NonDensePositions {
                    found: line.position,
                    index,
                });
            }
            if line.quantity <= Decimal::ZERO {
                return Err(InvoiceError::NonPositiveQuantity {
                    position: line.position,
                });
            }
            if line.unit_price < Decimal::ZERO {
                return Err(InvoiceError::NegativeUnitPrice {
                    position: line.position,
                });
            }
            if line.tax_rate < Decimal::ZERO {
                return Err(InvoiceError::NegativeTaxRate {
                    position: line.position,
                });
            }
            if line.discount_percent < Decimal::ZERO
                || line.discount_percent > Decimal::ONE_HUNDRED
            {
                return Err(InvoiceError::DiscountOutOfRange {
                    position: line.position,
                });
            }
        }
        Ok(())
    }

    /// Guards mutation of a financial field against the status window.
    ///
    /// In `draft` every field is mutable; at and after `sent` only notes and
    /// status-machine-driven status changes are allowed.
    ///
    /// # Errors
    ///
    /// Returns `ImmutableLedgerEntry` naming the rejected field. The denial
    /// is also logged for security review (outside the financial audit log).
    pub fn ensure_mutable(status: InvoiceStatus, field: &'static str) -> Result<(), InvoiceError> {
        if status.is_editable() {
            return Ok(());
        }
        tracing::warn!(field, status = status.as_str(), "rejected mutation of frozen field");
        Err(InvoiceError::ImmutableLedgerEntry { field, status })
    }

    /// Recomputes and stores the invoice totals from its line items.
    ///
    /// # Errors
    ///
    /// Fails when the invoice is no longer editable — totals of a finalized
    /// invoice never change.
    pub fn recompute_totals(invoice: &mut Invoice) -> Result<(), InvoiceError> {
        Self::ensure_mutable(invoice.status, "total")?;
        let totals = compute_invoice_totals(&invoice.line_items);
        invoice.subtotal = totals.subtotal;
        invoice.tax_amount = totals.tax_amount;
        invoice.total = totals.total;
        Ok(())
    }

    /// Validates that a payment may be recorded against the invoice.
    ///
    /// # Errors
    ///
    /// - `PaymentNotAllowed` unless the invoice is sent/partial/overdue
    /// - `NonPositivePayment` for amounts <= 0
    /// - `PaymentExceedsOutstanding` if the payment would overdraw the
    ///   invoice (rejected whole, never truncated)
    pub fn validate_payment(invoice: &Invoice, amount: Decimal) -> Result<(), InvoiceError> {
        match invoice.status {
            InvoiceStatus::Sent | InvoiceStatus::Partial | InvoiceStatus::Overdue => {}
            status => return Err(InvoiceError::PaymentNotAllowed { status }),
        }

        if amount <= Decimal::ZERO {
            return Err(InvoiceError::NonPositivePayment);
        }

        let outstanding = invoice.outstanding_amount();
        if amount > outstanding {
            return Err(InvoiceError::PaymentExceedsOutstanding {
                amount,
                outstanding,
                invoice: invoice
                    .invoice_number
                    .clone()
                    .unwrap_or_else(|| invoice.id.to_string()),
            });
        }

        Ok(())
    }

    /// Validates an invoice for finalization: it must carry at least one
    /// valid line item.
    pub fn validate_for_finalization(invoice: &Invoice) -> Result<(), InvoiceError> {
        if invoice.line_items.is_empty() {
            return Err(InvoiceError::NoLineItems);
        }
        Self::validate_line_items(&invoice.line_items)
    }
}


#[cfg(test)]
mod tests {
    use super::tests_support::{draft_invoice, invoice_with_total, line_item};
    use super::*;
    use chrono::NaiveDate;
    use kontor_shared::types::PaymentId;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use crate::invoice::types::Payment;

    fn payment(invoice: &Invoice, amount: Decimal) -> Payment {
        Payment {
            id: PaymentId::new(),
            invoice_id: invoice.id,
            amount,
            payment_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            method: None,
            reference: None,
        }
    }

    #[test]
    fn test_valid_line_items_pass() {
        let lines = vec![
            line_item(1, dec!(2), dec!(85.00), dec!(19), dec!(0)),
            line_item(2, dec!(1), dec!(250.00), dec!(19), dec!(5)),
        ];
        assert!(InvoiceService::validate_line_items(&lines).is_ok());
    }

    #[rstest]
    #[case::zero_quantity(dec!(0), dec!(10), dec!(19), dec!(0))]
    #[case::negative_quantity(dec!(-1), dec!(10), dec!(19), dec!(0))]
    fn test_non_positive_quantity_rejected(
        #[case] quantity: Decimal,
        #[case] unit_price: Decimal,
        #[case] tax_rate: Decimal,
        #[case] discount: Decimal,
    ) {
        let lines = vec![line_item(1, quantity, unit_price, tax_rate, discount)];
        assert_eq!(
            InvoiceService::validate_line_items(&lines),
            Err(InvoiceError::NonPositiveQuantity { position: 1 })
        );
    }

    #[test]
    fn test_negative_unit_price_rejected() {
        let lines = vec![line_item(1, dec!(1), dec!(-0.01), dec!(19), dec!(0))];
        assert_eq!(
            InvoiceService::validate_line_items(&lines),
            Err(InvoiceError::NegativeUnitPrice { position: 1 })
        );
    }

    #[rstest]
    #[case(dec!(-1))]
    #[case(dec!(100.01))]
    fn test_discount_out_of_range_rejected(#[case] discount: Decimal) {
        let lines = vec![line_item(1, dec!(1), dec!(10), dec!(19), discount)];
        assert_eq!(
            InvoiceService::validate_line_items(&lines),
            Err(InvoiceError::DiscountOutOfRange { position: 1 })
        );
    }

    #[test]
    fn test_non_dense_positions_rejected() {
        let lines = vec![
            line_item(1, dec!(1), dec!(10), dec!(19), dec!(0)),
            line_item(3, dec!(1), dec!(10), dec!(19), dec!(0)),
        ];
        assert_eq!(
            InvoiceService::validate_line_items(&lines),
            Err(InvoiceError::NonDensePositions { found: 3, index: 1 })
        );
    }

    #[test]
    fn test_draft_fields_are_mutable() {
        assert!(InvoiceService::ensure_mutable(InvoiceStatus::Draft, "line_items").is_ok());
    }

    #[rstest]
    #[case(InvoiceStatus::Sent)]
    #[case(InvoiceStatus::Partial)]
    #[case(InvoiceStatus::Paid)]
    #[case(InvoiceStatus::Cancelled)]
    fn test_frozen_after_sent(#[case] status: InvoiceStatus) {
        let err = InvoiceService::ensure_mutable(status, "total").unwrap_err();
        assert_eq!(
            err,
            InvoiceError::ImmutableLedgerEntry {
                field: "total",
                status
            }
        );
    }

    #[test]
    fn test_recompute_totals_on_sent_invoice_fails() {
        let mut invoice = invoice_with_total(dec!(100));
        assert!(matches!(
            InvoiceService::recompute_totals(&mut invoice),
            Err(InvoiceError::ImmutableLedgerEntry { field: "total", .. })
        ));
    }

    #[test]
    fn test_payment_within_outstanding_accepted() {
        let invoice = invoice_with_total(dec!(497.43));
        assert!(InvoiceService::validate_payment(&invoice, dec!(497.43)).is_ok());
    }

    #[test]
    fn test_overpayment_rejected_not_truncated() {
        let mut invoice = invoice_with_total(dec!(100.00));
        invoice.payments.push(payment(&invoice, dec!(60.00)));

        let err = InvoiceService::validate_payment(&invoice, dec!(40.01)).unwrap_err();
        assert_eq!(
            err,
            InvoiceError::PaymentExceedsOutstanding {
                amount: dec!(40.01),
                outstanding: dec!(40.00),
                invoice: "RE-2026-0001".to_string(),
            }
        );
        // paid_amount unchanged by the rejected attempt
        assert_eq!(invoice.paid_amount(), dec!(60.00));
    }

    #[test]
    fn test_payment_on_draft_rejected() {
        let invoice = draft_invoice(vec![line_item(1, dec!(1), dec!(10), dec!(19), dec!(0))]);
        assert_eq!(
            InvoiceService::validate_payment(&invoice, dec!(5)),
            Err(InvoiceError::PaymentNotAllowed {
                status: InvoiceStatus::Draft
            })
        );
    }

    #[test]
    fn test_zero_payment_rejected() {
        let invoice = invoice_with_total(dec!(100));
        assert_eq!(
            InvoiceService::validate_payment(&invoice, dec!(0)),
            Err(InvoiceError::NonPositivePayment)
        );
    }

    #[test]
    fn test_finalization_requires_line_items() {
        let invoice = draft_invoice(Vec::new());
        assert_eq!(
            InvoiceService::validate_for_finalization(&invoice),
            Err(InvoiceError::NoLineItems)
        );
    }
}
