//! Audit journal domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use kontor_shared::actor::ActorContext;
use kontor_shared::types::AuditEntryId;

/// Closed set of auditable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Entity created.
    Create,
    /// Fields updated.
    Update,
    /// Entity deleted (soft delete, or the final entry before a purge).
    Delete,
    /// Status machine transition.
    StatusChange,
}

impl AuditAction {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::StatusChange => "status_change",
        }
    }

    /// Parses an action; anything outside the closed set is rejected by
    /// [`AuditAction::try_parse`] with `InvalidAction`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            "status_change" => Some(Self::StatusChange),
            _ => None,
        }
    }

    /// Parses an action, failing with [`super::AuditError::InvalidAction`].
    pub fn try_parse(s: &str) -> Result<Self, super::AuditError> {
        Self::parse(s).ok_or_else(|| super::AuditError::InvalidAction {
            action: s.to_string(),
        })
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Entity types the audit journal covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntityType {
    /// Invoice-class document.
    Invoice,
    /// Invoice line item.
    LineItem,
    /// Payment against an invoice.
    Payment,
    /// Standalone expense.
    Expense,
    /// Imported bank transaction.
    BankTransaction,
}

impl AuditEntityType {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::LineItem => "line_item",
            Self::Payment => "payment",
            Self::Expense => "expense",
            Self::BankTransaction => "bank_transaction",
        }
    }

    /// Parses an entity type from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "invoice" => Some(Self::Invoice),
            "line_item" => Some(Self::LineItem),
            "payment" => Some(Self::Payment),
            "expense" => Some(Self::Expense),
            "bank_transaction" => Some(Self::BankTransaction),
            _ => None,
        }
    }
}

impl fmt::Display for AuditEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable audit journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Entry ID.
    pub id: AuditEntryId,
    /// Type of the mutated entity.
    pub entity_type: AuditEntityType,
    /// ID of the mutated entity.
    pub entity_id: Uuid,
    /// What happened.
    pub action: AuditAction,
    /// Changed fields before the mutation (JSON object), if any.
    pub old_values: Option<Value>,
    /// Changed fields after the mutation (JSON object), if any.
    pub new_values: Option<Value>,
    /// When the entry was recorded (commit order per entity).
    pub recorded_at: DateTime<Utc>,
    /// Actor that caused the mutation.
    pub actor: ActorContext,
}

impl AuditEntry {
    /// Builds a new entry with a fresh ID and the current timestamp.
    #[must_use]
    pub fn new(
        entity_type: AuditEntityType,
        entity_id: Uuid,
        action: AuditAction,
        old_values: Option<Value>,
        new_values: Option<Value>,
        actor: ActorContext,
    ) -> Self {
        Self {
            id: AuditEntryId::new(),
            entity_type,
            entity_id,
            action,
            old_values,
            new_values,
            recorded_at: Utc::now(),
            actor,
        }
    }

    /// The entry written for a successful status transition: old and new
    /// values each carry exactly the `status` field.
    #[must_use]
    pub fn status_change(
        entity_type: AuditEntityType,
        entity_id: Uuid,
        old_status: &str,
        new_status: &str,
        actor: ActorContext,
    ) -> Self {
        Self::new(
            entity_type,
            entity_id,
            AuditAction::StatusChange,
            Some(serde_json::json!({ "status": old_status })),
            Some(serde_json::json!({ "status": new_status })),
            actor,
        )
    }
}

/// Filters for listing the audit journal.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Restrict to one entity type.
    pub entity_type: Option<AuditEntityType>,
    /// Restrict to one entity.
    pub entity_id: Option<Uuid>,
    /// Restrict to one action.
    pub action: Option<AuditAction>,
    /// Entries recorded on or after this date.
    pub from_date: Option<NaiveDate>,
    /// Entries recorded on or before this date.
    pub to_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_roundtrip_and_closed_set() {
        for action in [
            AuditAction::Create,
            AuditAction::Update,
            AuditAction::Delete,
            AuditAction::StatusChange,
        ] {
            assert_eq!(AuditAction::parse(action.as_str()), Some(action));
        }
        assert!(AuditAction::try_parse("upsert").is_err());
    }

    #[test]
    fn test_entity_type_roundtrip() {
        for entity_type in [
            AuditEntityType::Invoice,
            AuditEntityType::LineItem,
            AuditEntityType::Payment,
            AuditEntityType::Expense,
            AuditEntityType::BankTransaction,
        ] {
            assert_eq!(AuditEntityType::parse(entity_type.as_str()), Some(entity_type));
        }
    }

    #[test]
    fn test_status_change_entry_shape() {
        let entry = AuditEntry::status_change(
            AuditEntityType::Invoice,
            Uuid::now_v7(),
            "draft",
            "sent",
            ActorContext::system(),
        );
        assert_eq!(entry.action, AuditAction::StatusChange);
        assert_eq!(
            entry.old_values,
            Some(serde_json::json!({ "status": "draft" }))
        );
        assert_eq!(
            entry.new_values,
            Some(serde_json::json!({ "status": "sent" }))
        );
    }
}
