//! Domain types for ledger entities.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use kontor_shared::types::{
    BankAccountId, CustomerId, ExpenseId, InvoiceId, LineItemId, OrganizationId, PaymentId,
    ProjectId,
};
use kontor_shared::types::money::Currency;

/// Document type of an invoice-class record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Outgoing invoice.
    Invoice,
    /// Compensating credit note.
    CreditNote,
    /// Non-binding quote.
    Quote,
}

impl DocumentType {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::CreditNote => "credit_note",
            Self::Quote => "quote",
        }
    }

    /// Parses a document type from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "invoice" => Some(Self::Invoice),
            "credit_note" => Some(Self::CreditNote),
            "quote" => Some(Self::Quote),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Invoice status lifecycle.
///
/// The valid transitions are owned by the compliance state machine
/// (`crate::lifecycle`):
/// - Draft → Sent (finalize; allocates the document number)
/// - Sent → Paid | Partial | Overdue (derived from payment state)
/// - Partial ↔ Overdue (due-date reevaluation)
/// - any non-terminal → Cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Fully mutable; no document number assigned yet.
    Draft,
    /// Finalized and sent; financial fields are frozen.
    Sent,
    /// Outstanding amount is zero.
    Paid,
    /// Partially paid, not yet due.
    Partial,
    /// Due date passed with an outstanding amount.
    Overdue,
    /// Terminal state.
    Cancelled,
}

impl InvoiceStatus {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Partial => "partial",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "sent" => Some(Self::Sent),
            "paid" => Some(Self::Paid),
            "partial" => Some(Self::Partial),
            "overdue" => Some(Self::Overdue),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if financial fields (number, line items, totals) may
    /// still be mutated.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if no further transition is permitted.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns true if the status is derived from payment state rather than
    /// set by a user action.
    #[must_use]
    pub fn is_payment_derived(&self) -> bool {
        matches!(self, Self::Paid | Self::Partial | Self::Overdue)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An invoice line item. Position defines print order and must be dense 1..N.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Line item ID.
    pub id: LineItemId,
    /// Owning invoice.
    pub invoice_id: InvoiceId,
    /// 1-based position within the invoice.
    pub position: u32,
    /// Human-readable description.
    pub description: String,
    /// Quantity (must be > 0).
    pub quantity: Decimal,
    /// Price per unit (must be >= 0).
    pub unit_price: Decimal,
    /// Tax rate in percent (must be >= 0).
    pub tax_rate: Decimal,
    /// Discount in percent (0..=100).
    pub discount_percent: Decimal,
}

/// Derived amounts for a single line item.
///
/// Never stored independently of recomputation; every value carries the
/// system rounding rule (half away from zero, 2 dp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemTotals {
    /// `quantity * unit_price`.
    pub subtotal: Decimal,
    /// `subtotal * discount_percent / 100`.
    pub discount_amount: Decimal,
    /// `subtotal - discount_amount`.
    pub subtotal_after_discount: Decimal,
    /// `subtotal_after_discount * tax_rate / 100`.
    pub tax_amount: Decimal,
    /// `subtotal_after_discount + tax_amount`.
    pub total: Decimal,
}

/// Derived totals for a whole invoice: the sums of its line item totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of line `subtotal_after_discount`.
    pub subtotal: Decimal,
    /// Sum of line `tax_amount`.
    pub tax_amount: Decimal,
    /// `subtotal + tax_amount`.
    pub total: Decimal,
}

/// An invoice ledger entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice ID.
    pub id: InvoiceId,
    /// Owning tenant.
    pub organization_id: OrganizationId,
    /// Owning customer (required).
    pub customer_id: CustomerId,
    /// Optional project association.
    pub project_id: Option<ProjectId>,
    /// Document type.
    pub document_type: DocumentType,
    /// Sequential document number; `None` until finalized.
    pub invoice_number: Option<String>,
    /// Lifecycle status.
    pub status: InvoiceStatus,
    /// Date the document was issued.
    pub issued_date: NaiveDate,
    /// Date payment is due.
    pub due_date: NaiveDate,
    /// Currency of all monetary fields.
    pub currency: Currency,
    /// Derived: sum of line `subtotal_after_discount`.
    pub subtotal: Decimal,
    /// Derived: sum of line `tax_amount`.
    pub tax_amount: Decimal,
    /// Derived: `subtotal + tax_amount`.
    pub total: Decimal,
    /// Customer-visible notes (mutable in any status).
    pub notes: Option<String>,
    /// Internal annotations (mutable in any status).
    pub internal_note: Option<String>,
    /// Ordered line items.
    pub line_items: Vec<LineItem>,
    /// Recorded payments.
    pub payments: Vec<Payment>,
    /// Soft-delete marker; the row persists for the retention period.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last row update time.
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Sum of recorded payment amounts.
    #[must_use]
    pub fn paid_amount(&self) -> Decimal {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// `total - paid_amount`.
    #[must_use]
    pub fn outstanding_amount(&self) -> Decimal {
        self.total - self.paid_amount()
    }

    /// True once the outstanding amount reaches zero.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.outstanding_amount() <= Decimal::ZERO
    }
}

/// Payment method classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// SEPA / wire transfer.
    #[default]
    BankTransfer,
    /// Direct debit mandate.
    DirectDebit,
    /// Card payment.
    Card,
    /// Cash.
    Cash,
    /// Anything else.
    Other,
}

impl PaymentMethod {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BankTransfer => "bank_transfer",
            Self::DirectDebit => "direct_debit",
            Self::Card => "card",
            Self::Cash => "cash",
            Self::Other => "other",
        }
    }

    /// Parses a payment method from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bank_transfer" => Some(Self::BankTransfer),
            "direct_debit" => Some(Self::DirectDebit),
            "card" => Some(Self::Card),
            "cash" => Some(Self::Cash),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// A payment recorded against an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment ID.
    pub id: PaymentId,
    /// Invoice this payment belongs to.
    pub invoice_id: InvoiceId,
    /// Amount (must be > 0).
    pub amount: Decimal,
    /// Value date of the payment.
    pub payment_date: NaiveDate,
    /// Optional payment method.
    pub method: Option<PaymentMethod>,
    /// Optional external reference (e.g., bank statement line).
    pub reference: Option<String>,
}

/// A standalone expense: an outflow ledger entity used as a reconciliation
/// target for outgoing bank transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// Owning tenant.
    pub organization_id: OrganizationId,
    /// What was paid for.
    pub description: String,
    /// Amount (must be > 0).
    pub amount: Decimal,
    /// Date of the expense.
    pub expense_date: NaiveDate,
    /// Optional receipt/voucher number used for reconciliation matching.
    pub receipt_number: Option<String>,
    /// Bank account the expense was paid from, if known.
    pub bank_account_id: Option<BankAccountId>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}
