//! Actor context and capability-based authorization.
//!
//! Permissions are a closed enumeration checked through [`authorize`] — never
//! inferred from role strings or object attributes at runtime. Every audit log
//! write receives the [`ActorContext`] of the request that caused it.

use serde::{Deserialize, Serialize};

use crate::types::id::UserId;

/// Identity of the actor performing an operation, as passed into every
/// audit log write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    /// The acting user, if authenticated.
    pub user_id: Option<UserId>,
    /// Source IP address of the request, if known.
    pub ip_address: Option<String>,
}

impl ActorContext {
    /// Creates an actor context for an authenticated user.
    #[must_use]
    pub fn user(user_id: UserId, ip_address: Option<String>) -> Self {
        Self {
            user_id: Some(user_id),
            ip_address,
        }
    }

    /// Creates an actor context for a system-internal job (retention purge,
    /// scheduled reconciliation).
    #[must_use]
    pub const fn system() -> Self {
        Self {
            user_id: None,
            ip_address: None,
        }
    }
}

/// Closed set of capabilities an actor may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create and edit draft invoices.
    InvoiceWrite,
    /// Finalize (send) and cancel invoices.
    InvoiceFinalize,
    /// Record payments against invoices.
    PaymentWrite,
    /// Import and reconcile bank transactions.
    ReconciliationWrite,
    /// Read the audit log.
    AuditRead,
    /// Produce compliance exports and run retention purges.
    ComplianceAdmin,
}

impl Capability {
    /// Stable string form used in logs and config.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvoiceWrite => "invoice_write",
            Self::InvoiceFinalize => "invoice_finalize",
            Self::PaymentWrite => "payment_write",
            Self::ReconciliationWrite => "reconciliation_write",
            Self::AuditRead => "audit_read",
            Self::ComplianceAdmin => "compliance_admin",
        }
    }
}

/// The set of capabilities granted to an actor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet(Vec<Capability>);

impl CapabilitySet {
    /// Creates a capability set from a list of grants.
    #[must_use]
    pub fn new(capabilities: Vec<Capability>) -> Self {
        Self(capabilities)
    }

    /// Returns true if the set contains the given capability.
    #[must_use]
    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }
}

/// Result of a denied authorization check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("access denied: missing capability '{missing}'")]
pub struct AccessDenied {
    /// The capability the actor lacked.
    pub missing: &'static str,
}

/// Checks that the actor holds every required capability.
///
/// Denied attempts are logged at `warn` level for security review. This log
/// is deliberately separate from the financial audit log, which records only
/// successful ledger mutations.
pub fn authorize(
    actor: &ActorContext,
    granted: &CapabilitySet,
    required: &[Capability],
) -> Result<(), AccessDenied> {
    for capability in required {
        if !granted.contains(*capability) {
            tracing::warn!(
                actor = ?actor.user_id,
                ip = ?actor.ip_address,
                capability = capability.as_str(),
                "authorization denied"
            );
            return Err(AccessDenied {
                missing: capability.as_str(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> ActorContext {
        ActorContext::user(UserId::new(), Some("10.0.0.7".to_string()))
    }

    #[test]
    fn test_authorize_allows_granted_capability() {
        let granted = CapabilitySet::new(vec![Capability::InvoiceWrite, Capability::AuditRead]);
        assert!(authorize(&actor(), &granted, &[Capability::InvoiceWrite]).is_ok());
    }

    #[test]
    fn test_authorize_denies_missing_capability_with_reason() {
        let granted = CapabilitySet::new(vec![Capability::InvoiceWrite]);
        let err = authorize(&actor(), &granted, &[Capability::ComplianceAdmin]).unwrap_err();
        assert_eq!(err.missing, "compliance_admin");
    }

    #[test]
    fn test_authorize_requires_all_capabilities() {
        let granted = CapabilitySet::new(vec![Capability::InvoiceWrite]);
        let result = authorize(
            &actor(),
            &granted,
            &[Capability::InvoiceWrite, Capability::InvoiceFinalize],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_requirement_always_allowed() {
        let granted = CapabilitySet::default();
        assert!(authorize(&ActorContext::system(), &granted, &[]).is_ok());
    }
}
