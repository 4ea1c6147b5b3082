//! Compliance state machine for invoice status transitions.
//!
//! Governs which transitions are legal, which fields stay mutable in each
//! status window, and produces the audit payload the repository persists
//! atomically with the entity update.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LifecycleError;
pub use service::LifecycleService;
pub use types::TransitionAction;
