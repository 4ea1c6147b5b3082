//! Transition actions produced by the state machine.

use chrono::{DateTime, Utc};

use kontor_shared::actor::ActorContext;

use crate::invoice::types::InvoiceStatus;

/// A validated status transition with its audit trail data.
///
/// The repository applies the status change and writes exactly one
/// `status_change` audit entry from this action, inside one database
/// transaction — both succeed or both roll back.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionAction {
    /// Status before the transition.
    pub old_status: InvoiceStatus,
    /// Status after the transition.
    pub new_status: InvoiceStatus,
    /// Actor who triggered the transition (system for derived reevaluation).
    pub actor: ActorContext,
    /// When the transition was decided.
    pub occurred_at: DateTime<Utc>,
}

impl TransitionAction {
    /// True if the action actually changes the status.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.old_status == self.new_status
    }
}
