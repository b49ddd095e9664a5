//! Comanda core - order/billing consistency engine
//!
//! The engine owns order and order-item status transitions, recomputes
//! monetary totals under concurrent mutation, and reconciles payments
//! against immutable bill snapshots:
//!
//! - **money**: decimal arithmetic and the totals formula (banker's
//!   rounding, once per field)
//! - **engine**: the [`OrderEngine`] with a per-order keyed lock registry
//!   and one action module per operation
//! - **audit**: fire-and-forget audit emission through an mpsc worker
//! - **catalog**: the read-only menu collaborator trait
//!
//! # Mutation Flow
//!
//! ```text
//! engine.op(...)
//!     ├─ 1. Validate input (no state touched)
//!     ├─ 2. Resolve collaborators (catalog lookup, outside the lock)
//!     ├─ 3. try_lock_for(lock_timeout)  → OrderBusy on timeout
//!     ├─ 4. Execute action: check transition table, mutate, recompute
//!     ├─ 5. Stamp event sequence, release lock
//!     └─ 6. Broadcast events + emit audit (never under the lock)
//! ```

pub mod audit;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod money;

pub use catalog::{Catalog, CatalogError, StaticCatalog};
pub use config::EngineConfig;
pub use engine::OrderEngine;

// Re-export shared types for convenience
pub use shared::error::{ErrorKind, OrderError};
pub use shared::order::{
    Actor, Bill, BillPaidStatus, EventPayload, ItemRequest, Order, OrderChannel, OrderEvent,
    OrderEventType, OrderItem, OrderItemStatus, OrderStatus, Payment, PaymentInput, PaymentMethod,
    TableSession,
};
