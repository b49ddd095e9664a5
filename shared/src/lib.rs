//! Shared domain types for the Comanda front-of-house engine.
//!
//! This crate carries the entities and status machines that both the core
//! engine and any embedding host need to agree on:
//!
//! - **models**: dining tables and catalog snapshot types
//! - **order**: orders, items, bills, payments, sessions, domain events
//! - **error**: the unified [`OrderError`] type with retryability classing
//!
//! No engine logic lives here; totals computation, locking and audit
//! emission belong to `comanda-core`.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

pub use error::{ErrorKind, OrderError};
