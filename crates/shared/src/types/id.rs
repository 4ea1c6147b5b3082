//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `PaymentId` where an
//! `InvoiceId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user (audit actor).");
typed_id!(OrganizationId, "Unique identifier for a tenant organization.");
typed_id!(CustomerId, "Unique identifier for a customer.");
typed_id!(ProjectId, "Unique identifier for a project.");
typed_id!(InvoiceId, "Unique identifier for an invoice.");
typed_id!(LineItemId, "Unique identifier for an invoice line item.");
typed_id!(PaymentId, "Unique identifier for a payment.");
typed_id!(ExpenseId, "Unique identifier for an expense.");
typed_id!(BankAccountId, "Unique identifier for a bank account.");
typed_id!(BankTransactionId, "Unique identifier for an imported bank transaction.");
typed_id!(DocumentId, "Unique identifier for a generated document artifact.");
typed_id!(AuditEntryId, "Unique identifier for an audit log entry.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_ids_are_unique() {
        let a = InvoiceId::new();
        let b = InvoiceId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_roundtrip_through_string() {
        let id = PaymentId::new();
        let parsed = PaymentId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_id_from_uuid() {
        let uuid = uuid::Uuid::now_v7();
        let id = CustomerId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
    }

    #[test]
    fn test_invalid_string_rejected() {
        assert!(InvoiceId::from_str("not-a-uuid").is_err());
    }
}
