//! Unified error system for the Comanda engine
//!
//! Every rejected mutation maps to exactly one [`OrderError`] variant naming
//! the violated rule. Errors are classified by [`ErrorKind`]:
//!
//! - `Validation`: malformed input, rejected before any state is touched
//! - `StateConflict`: the transition is not permitted from the current status
//! - `Contention`: the per-order lock could not be acquired; safe to retry
//! - `NotFound`: the referenced entity does not exist
//! - `Collaborator`: an external collaborator (catalog) refused the request
//!
//! No variant is ever swallowed; a rejected operation leaves prior state
//! completely unchanged.

use crate::order::{BillPaidStatus, OrderItemStatus, OrderStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error classification by caller-visible consequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Validation,
    StateConflict,
    Contention,
    NotFound,
    Collaborator,
}

/// Engine errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    // ═══ Validation ═══
    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(i32),

    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(f64),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    // ═══ State conflicts ═══
    #[error("order {order_id} is not mutable in {status} status")]
    OrderNotMutable {
        order_id: String,
        status: OrderStatus,
    },

    #[error("item transition {from} -> {to} is not permitted")]
    InvalidItemTransition {
        from: OrderItemStatus,
        to: OrderItemStatus,
    },

    #[error("item {0} has already been served")]
    ItemAlreadyServed(String),

    #[error("order {0} has no billable items")]
    EmptyOrder(String),

    #[error("discount {amount:.2} exceeds subtotal {subtotal:.2}")]
    DiscountExceedsSubtotal { amount: f64, subtotal: f64 },

    #[error("order {order_id} is not ready for billing ({status})")]
    OrderNotReady {
        order_id: String,
        status: OrderStatus,
    },

    #[error("order {order_id} already has an active bill {bill_id}")]
    BillAlreadyExists { order_id: String, bill_id: String },

    #[error("bill {bill_id} is not payable ({status})")]
    BillNotPayable {
        bill_id: String,
        status: BillPaidStatus,
    },

    #[error("payment of {attempted:.2} would exceed the {remaining:.2} remaining on the bill")]
    OverpaymentNotAllowed { attempted: f64, remaining: f64 },

    #[error("table {0} is already occupied")]
    TableAlreadyOccupied(String),

    #[error("session {session_id} cannot close while its order is {status}")]
    SessionStillActive {
        session_id: String,
        status: OrderStatus,
    },

    // ═══ Contention ═══
    #[error("order {0} is busy, retry later")]
    OrderBusy(String),

    // ═══ Not found ═══
    #[error("order not found: {0}")]
    OrderNotFound(String),

    #[error("item not found: {0}")]
    ItemNotFound(String),

    #[error("bill not found: {0}")]
    BillNotFound(String),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    // ═══ Collaborators ═══
    #[error("menu item unavailable: {0}")]
    MenuItemUnavailable(String),
}

impl OrderError {
    /// Classify this error for retry/reporting decisions.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::InvalidQuantity(_)
            | OrderError::NonPositiveAmount(_)
            | OrderError::InvalidOperation(_) => ErrorKind::Validation,

            OrderError::OrderNotMutable { .. }
            | OrderError::InvalidItemTransition { .. }
            | OrderError::ItemAlreadyServed(_)
            | OrderError::EmptyOrder(_)
            | OrderError::DiscountExceedsSubtotal { .. }
            | OrderError::OrderNotReady { .. }
            | OrderError::BillAlreadyExists { .. }
            | OrderError::BillNotPayable { .. }
            | OrderError::OverpaymentNotAllowed { .. }
            | OrderError::TableAlreadyOccupied(_)
            | OrderError::SessionStillActive { .. } => ErrorKind::StateConflict,

            OrderError::OrderBusy(_) => ErrorKind::Contention,

            OrderError::OrderNotFound(_)
            | OrderError::ItemNotFound(_)
            | OrderError::BillNotFound(_)
            | OrderError::SessionNotFound(_) => ErrorKind::NotFound,

            OrderError::MenuItemUnavailable(_) => ErrorKind::Collaborator,
        }
    }

    /// Contention errors carry no partial effect and may be retried as-is.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Contention
    }
}
