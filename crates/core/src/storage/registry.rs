//! Registry records for stored artifacts.
//!
//! Every generated document gets one registry entry linking it to the
//! ledger entity it was rendered for. The link is a tagged reference, never
//! a bare UUID whose type is guessed at read time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

use kontor_shared::types::{DocumentId, ExpenseId, InvoiceId};

/// Kind discriminant of a registry link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Invoice-class document.
    Invoice,
    /// Expense receipt.
    Expense,
}

impl EntityKind {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Expense => "expense",
        }
    }

    /// Parses a kind from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "invoice" => Some(Self::Invoice),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed reference to the entity an artifact belongs to. Resolution is an
/// explicit lookup per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// What the ID refers to.
    pub kind: EntityKind,
    /// The referenced entity's ID.
    pub id: Uuid,
}

impl EntityRef {
    /// Reference to an invoice.
    #[must_use]
    pub fn invoice(id: InvoiceId) -> Self {
        Self {
            kind: EntityKind::Invoice,
            id: id.into_inner(),
        }
    }

    /// Reference to an expense.
    #[must_use]
    pub fn expense(id: ExpenseId) -> Self {
        Self {
            kind: EntityKind::Expense,
            id: id.into_inner(),
        }
    }
}

/// One stored artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Registry entry ID.
    pub id: DocumentId,
    /// Human-readable title, e.g. the document number plus extension.
    pub title: String,
    /// Storage key the bytes live under.
    pub path: String,
    /// SHA-256 of the stored bytes, hex-encoded.
    pub checksum: String,
    /// Entity the artifact was generated for.
    pub linked_entity: EntityRef,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Builds a registry record for freshly rendered bytes.
    #[must_use]
    pub fn new(title: String, path: String, bytes: &[u8], linked_entity: EntityRef) -> Self {
        Self {
            id: DocumentId::new(),
            title,
            path,
            checksum: sha256_hex(bytes),
            linked_entity,
            created_at: Utc::now(),
        }
    }

    /// True when `bytes` still hash to the recorded checksum.
    #[must_use]
    pub fn verify(&self, bytes: &[u8]) -> bool {
        sha256_hex(bytes) == self.checksum
    }
}

/// Hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(64);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(out, "{byte:02x}");
    }
    out
}
