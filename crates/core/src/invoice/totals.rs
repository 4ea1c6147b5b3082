//! Derived totals for line items and invoices.
//!
//! Totals are recomputed from line items on every mutation — they are never
//! edited independently. Each derived amount is rounded with the system rule
//! (half away from zero, 2 dp) at the point it is produced, so the invariants
//!
//! - `line.total == line.subtotal_after_discount + line.tax_amount`
//! - `invoice.total == invoice.subtotal + invoice.tax_amount`
//! - `invoice.subtotal == Σ line.subtotal_after_discount`
//!
//! hold bit-for-bit by construction.

use rust_decimal::Decimal;

use kontor_shared::types::money::round_money;

use super::types::{InvoiceTotals, LineItem, LineItemTotals};

const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Computes the derived amounts for a single line item.
#[must_use]
pub fn compute_line_totals(line: &LineItem) -> LineItemTotals {
    let subtotal = round_money(line.quantity * line.unit_price);
    let discount_amount = round_money(subtotal * line.discount_percent / HUNDRED);
    let subtotal_after_discount = subtotal - discount_amount;
    let tax_amount = round_money(subtotal_after_discount * line.tax_rate / HUNDRED);
    let total = subtotal_after_discount + tax_amount;

    LineItemTotals {
        subtotal,
        discount_amount,
        subtotal_after_discount,
        tax_amount,
        total,
    }
}

/// Computes invoice totals as the sum of its line item totals.
#[must_use]
pub fn compute_invoice_totals(lines: &[LineItem]) -> InvoiceTotals {
    let mut subtotal = Decimal::ZERO;
    let mut tax_amount = Decimal::ZERO;

    for line in lines {
        let totals = compute_line_totals(line);
        subtotal += totals.subtotal_after_discount;
        tax_amount += totals.tax_amount;
    }

    InvoiceTotals {
        subtotal,
        tax_amount,
        total: subtotal + tax_amount,
    }
}
