//! Status enums and their transition tables
//!
//! Each status domain is a closed enum with an explicit transition check;
//! the engine consults these tables before any mutation, never implicit
//! flag combinations.

use serde::{Deserialize, Serialize};

/// Order status
///
/// Forward chain `OPEN -> SUBMITTED -> PARTIAL_READY -> READY -> SERVED ->
/// BILLED -> PAID`. `CANCELLED` is reachable from any status strictly before
/// `BILLED`. The readiness band (SUBMITTED / PARTIAL_READY / READY) is
/// derived from the item set and may move freely within itself; `SERVED`
/// is a ratchet. `BILLED -> SERVED` exists only as the bill-void revert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Open,
    Submitted,
    PartialReady,
    Ready,
    Served,
    Billed,
    Paid,
    Cancelled,
}

impl OrderStatus {
    /// Whether `self -> to` is a permitted order transition.
    pub fn can_transition(self, to: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, to) {
            // submit
            (Open, Submitted) => true,
            // derived readiness band, plus the ratchet into SERVED
            (Submitted, PartialReady | Ready | Served) => true,
            (PartialReady, Submitted | Ready | Served) => true,
            (Ready, Submitted | PartialReady | Served) => true,
            // billing and settlement
            (Served, Billed) => true,
            (Billed, Paid) => true,
            // bill void reverts the order so a corrected bill can be issued
            (Billed, Served) => true,
            // cancellation, only strictly before BILLED
            (Open | Submitted | PartialReady | Ready | Served, Cancelled) => true,
            _ => false,
        }
    }

    /// Terminal statuses admit no further mutation of any kind.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Cancelled)
    }

    /// Statuses in the kitchen-derived readiness band.
    pub fn is_derived_band(self) -> bool {
        matches!(
            self,
            OrderStatus::Submitted | OrderStatus::PartialReady | OrderStatus::Ready
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Open => "OPEN",
            OrderStatus::Submitted => "SUBMITTED",
            OrderStatus::PartialReady => "PARTIAL_READY",
            OrderStatus::Ready => "READY",
            OrderStatus::Served => "SERVED",
            OrderStatus::Billed => "BILLED",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

/// Order item status
///
/// Kitchen lifecycle `PENDING -> COOKING -> READY -> SERVED`, with
/// `PENDING | COOKING -> VOID`. `SERVED` and `VOID` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderItemStatus {
    #[default]
    Pending,
    Cooking,
    Ready,
    Served,
    Void,
}

impl OrderItemStatus {
    /// Whether `self -> to` is a permitted item transition.
    pub fn can_transition(self, to: OrderItemStatus) -> bool {
        use OrderItemStatus::*;
        matches!(
            (self, to),
            (Pending, Cooking) | (Cooking, Ready) | (Ready, Served) | (Pending | Cooking, Void)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderItemStatus::Served | OrderItemStatus::Void)
    }
}

impl std::fmt::Display for OrderItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderItemStatus::Pending => "PENDING",
            OrderItemStatus::Cooking => "COOKING",
            OrderItemStatus::Ready => "READY",
            OrderItemStatus::Served => "SERVED",
            OrderItemStatus::Void => "VOID",
        };
        write!(f, "{s}")
    }
}
