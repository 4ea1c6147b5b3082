//! Bank reconciliation domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use kontor_shared::types::{BankAccountId, BankTransactionId, ExpenseId, InvoiceId, PaymentId};

/// Reconciliation lifecycle of an imported bank transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    /// Not linked to any ledger object yet.
    Unmatched,
    /// Linked automatically or manually, awaiting human confirmation.
    Matched,
    /// Match confirmed by a person. Confirmation is always explicit.
    Confirmed,
    /// Marked as not reconcilable (e.g., internal transfer).
    Ignored,
}

impl ReconciliationStatus {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unmatched => "unmatched",
            Self::Matched => "matched",
            Self::Confirmed => "confirmed",
            Self::Ignored => "ignored",
        }
    }

    /// Parses a status from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unmatched" => Some(Self::Unmatched),
            "matched" => Some(Self::Matched),
            "confirmed" => Some(Self::Confirmed),
            "ignored" => Some(Self::Ignored),
            _ => None,
        }
    }
}

impl fmt::Display for ReconciliationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An imported bank statement line.
///
/// `amount` is signed: positive is an inflow (candidate payments), negative
/// an outflow (candidate expenses). `reference` carries the bank-supplied
/// transaction id and is unique per account, which makes statement imports
/// idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTransaction {
    /// Transaction ID.
    pub id: BankTransactionId,
    /// Account the statement line belongs to.
    pub bank_account_id: BankAccountId,
    /// Signed amount, positive = inflow.
    pub amount: Decimal,
    /// Booking date from the statement.
    pub booking_date: NaiveDate,
    /// Free-text purpose/subject line, searched for document numbers.
    pub purpose: String,
    /// Counterparty name as reported by the bank.
    pub counterparty: Option<String>,
    /// Bank-supplied transaction id, unique per account.
    pub reference: String,
    /// Current reconciliation status.
    pub reconciliation_status: ReconciliationStatus,
    /// Linked payment, mutually exclusive with `matched_expense_id`.
    pub matched_payment_id: Option<PaymentId>,
    /// Linked expense, mutually exclusive with `matched_payment_id`.
    pub matched_expense_id: Option<ExpenseId>,
}

impl BankTransaction {
    /// True when the transaction links to at most one ledger object.
    #[must_use]
    pub fn link_is_consistent(&self) -> bool {
        !(self.matched_payment_id.is_some() && self.matched_expense_id.is_some())
    }
}

/// The ledger object a candidate points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CandidateRef {
    /// An open invoice; matching records a payment against it.
    Invoice(InvoiceId),
    /// A standalone expense.
    Expense(ExpenseId),
}

/// A ledger object offered to the scoring engine.
///
/// The caller flattens whatever it loaded (open invoices for inflows,
/// expenses for outflows) into this shape: an identifying reference string,
/// the expected amount (always positive) and the relevant date (due date or
/// expense date).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate {
    /// What this candidate is.
    pub target: CandidateRef,
    /// Document number or receipt number searched for in the purpose text.
    pub reference: String,
    /// Expected amount, positive.
    pub amount: Decimal,
    /// Due date or expense date, used for the proximity signal.
    pub date: NaiveDate,
}

/// A candidate with its computed confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    /// The scored candidate.
    pub candidate: MatchCandidate,
    /// Combined confidence.
    pub confidence: Decimal,
}

/// Outcome of an auto-reconcile pass over one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// Best candidate reached the threshold; the transaction should move to
    /// `matched` (never `confirmed`) with this link.
    Matched {
        /// The linked ledger object.
        target: CandidateRef,
        /// Confidence of the winning candidate.
        confidence: Decimal,
    },
    /// No candidate reached the threshold; the transaction stays
    /// `unmatched` and the ranked suggestions are surfaced instead.
    Unmatched {
        /// Ranked below-threshold suggestions, best first.
        suggestions: Vec<ScoredCandidate>,
    },
}
