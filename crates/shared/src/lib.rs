//! Shared types, errors, and configuration for Kontor.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision and the system-wide rounding rule
//! - Typed IDs for type-safe entity references
//! - Pagination types for list queries
//! - Actor context and capability checks
//! - Application-wide error types
//! - Configuration management

pub mod actor;
pub mod config;
pub mod error;
pub mod types;

pub use actor::{ActorContext, Capability, CapabilitySet};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
