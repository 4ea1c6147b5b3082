//! Common value types shared across crates.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::{
    AuditEntryId, BankAccountId, BankTransactionId, CustomerId, DocumentId, ExpenseId, InvoiceId,
    LineItemId, OrganizationId, PaymentId, ProjectId, UserId,
};
pub use money::{Currency, Money, round_money};
pub use pagination::{PageMeta, PageRequest, PageResponse};
