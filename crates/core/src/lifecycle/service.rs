//! State machine logic for invoice status transitions.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use kontor_shared::actor::ActorContext;

use super::error::LifecycleError;
use super::types::TransitionAction;
use crate::invoice::types::{Invoice, InvoiceStatus};

/// Stateless service validating and executing status transitions.
///
/// Direct user actions are `finalize` and `cancel`; the payment-derived
/// statuses (paid/partial/overdue) only change through [`LifecycleService::reevaluate`].
pub struct LifecycleService;

impl LifecycleService {
    /// Validates a user-requested transition to `target`.
    ///
    /// # Errors
    ///
    /// - `DerivedStatus` when the target is payment-derived
    /// - `InvalidTransition` for any edge outside the allowed set
    /// - `NumberMissing` when finalizing without an allocated number
    pub fn transition(
        invoice: &Invoice,
        target: InvoiceStatus,
        actor: &ActorContext,
    ) -> Result<TransitionAction, LifecycleError> {
        if target.is_payment_derived() {
            return Err(LifecycleError::DerivedStatus { to: target });
        }

        match target {
            InvoiceStatus::Sent => Self::finalize(invoice, actor),
            InvoiceStatus::Cancelled => Self::cancel(invoice, actor),
            _ => Err(LifecycleError::InvalidTransition {
                from: invoice.status,
                to: target,
            }),
        }
    }

    /// Finalizes a draft invoice: the irrevocable compliance boundary.
    ///
    /// The caller must have allocated the document number first; a failed
    /// allocation aborts the whole transition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the invoice is a draft, and
    /// `NumberMissing` when no number has been assigned.
    pub fn finalize(
        invoice: &Invoice,
        actor: &ActorContext,
    ) -> Result<TransitionAction, LifecycleError> {
        if invoice.status != InvoiceStatus::Draft {
            return Err(LifecycleError::InvalidTransition {
                from: invoice.status,
                to: InvoiceStatus::Sent,
            });
        }
        if invoice.invoice_number.is_none() {
            return Err(LifecycleError::NumberMissing);
        }

        Ok(TransitionAction {
            old_status: InvoiceStatus::Draft,
            new_status: InvoiceStatus::Sent,
            actor: actor.clone(),
            occurred_at: Utc::now(),
        })
    }

    /// Cancels an invoice. Permitted from any non-terminal state.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when the invoice is already cancelled.
    pub fn cancel(
        invoice: &Invoice,
        actor: &ActorContext,
    ) -> Result<TransitionAction, LifecycleError> {
        if invoice.status.is_terminal() {
            return Err(LifecycleError::InvalidTransition {
                from: invoice.status,
                to: InvoiceStatus::Cancelled,
            });
        }

        Ok(TransitionAction {
            old_status: invoice.status,
            new_status: InvoiceStatus::Cancelled,
            actor: actor.clone(),
            occurred_at: Utc::now(),
        })
    }

    /// Derives the payment status from totals and due date.
    ///
    /// Only meaningful for finalized invoices; drafts and cancelled
    /// invoices are never reevaluated.
    #[must_use]
    pub fn derive_payment_status(
        total: Decimal,
        paid_amount: Decimal,
        due_date: NaiveDate,
        today: NaiveDate,
    ) -> InvoiceStatus {
        if paid_amount >= total {
            InvoiceStatus::Paid
        } else if today > due_date {
            InvoiceStatus::Overdue
        } else if paid_amount > Decimal::ZERO {
            InvoiceStatus::Partial
        } else {
            InvoiceStatus::Sent
        }
    }

    /// Reevaluates the payment-derived status of a finalized invoice.
    ///
    /// Returns `None` when nothing changes (no transition, no audit entry),
    /// otherwise a system-actor transition to persist.
    #[must_use]
    pub fn reevaluate(invoice: &Invoice, today: NaiveDate) -> Option<TransitionAction> {
        match invoice.status {
            InvoiceStatus::Sent | InvoiceStatus::Partial | InvoiceStatus::Overdue => {}
            _ => return None,
        }

        let derived =
            Self::derive_payment_status(invoice.total, invoice.paid_amount(), invoice.due_date, today);
        if derived == invoice.status {
            return None;
        }

        Some(TransitionAction {
            old_status: invoice.status,
            new_status: derived,
            actor: ActorContext::system(),
            occurred_at: Utc::now(),
        })
    }
}
