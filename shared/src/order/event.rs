//! Order events - immutable facts broadcast after each accepted mutation
//!
//! Events are produced while the per-order lock is held, stamped with a
//! global sequence, and dispatched (broadcast + audit) only after the lock
//! is released. They are facts, not commands: consumers (kitchen displays,
//! printers, audit) must never feed them back as mutations.

use super::status::{OrderItemStatus, OrderStatus};
use super::types::{Actor, OrderItem};
use super::{OrderChannel, PaymentMethod};
use crate::util::{new_id, now_millis};
use serde::{Deserialize, Serialize};

/// Order event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderEvent {
    /// Event unique ID
    pub event_id: String,
    /// Global sequence number, assigned by the engine
    pub sequence: u64,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Actor who triggered this event
    pub actor_id: String,
    /// Actor name (snapshot for audit)
    pub actor_name: String,
    /// Event type discriminant
    pub event_type: OrderEventType,
    /// Event payload
    pub payload: EventPayload,
}

impl OrderEvent {
    /// Build an unsequenced event; the engine stamps `sequence` before
    /// dispatch.
    pub fn new(actor: &Actor, payload: EventPayload) -> Self {
        Self {
            event_id: new_id(),
            sequence: 0,
            timestamp: now_millis(),
            actor_id: actor.id.clone(),
            actor_name: actor.name.clone(),
            event_type: payload.event_type(),
            payload,
        }
    }
}

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    // Lifecycle
    OrderOpened,
    OrderSubmitted,
    OrderStatusChanged,
    OrderCancelled,

    // Items
    ItemAdded,
    ItemStatusChanged,
    ItemVoided,
    ItemPrinted,

    // Order-level adjustments
    DiscountApplied,
    OrderNoteAdded,

    // Billing
    BillCreated,
    PaymentRecorded,
    BillPaid,
    BillVoided,

    // Sessions
    SessionOpened,
    OrderAttached,
    SessionClosed,
    TableReleased,
}

impl std::fmt::Display for OrderEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderEventType::OrderOpened => "ORDER_OPENED",
            OrderEventType::OrderSubmitted => "ORDER_SUBMITTED",
            OrderEventType::OrderStatusChanged => "ORDER_STATUS_CHANGED",
            OrderEventType::OrderCancelled => "ORDER_CANCELLED",
            OrderEventType::ItemAdded => "ITEM_ADDED",
            OrderEventType::ItemStatusChanged => "ITEM_STATUS_CHANGED",
            OrderEventType::ItemVoided => "ITEM_VOIDED",
            OrderEventType::ItemPrinted => "ITEM_PRINTED",
            OrderEventType::DiscountApplied => "DISCOUNT_APPLIED",
            OrderEventType::OrderNoteAdded => "ORDER_NOTE_ADDED",
            OrderEventType::BillCreated => "BILL_CREATED",
            OrderEventType::PaymentRecorded => "PAYMENT_RECORDED",
            OrderEventType::BillPaid => "BILL_PAID",
            OrderEventType::BillVoided => "BILL_VOIDED",
            OrderEventType::SessionOpened => "SESSION_OPENED",
            OrderEventType::OrderAttached => "ORDER_ATTACHED",
            OrderEventType::SessionClosed => "SESSION_CLOSED",
            OrderEventType::TableReleased => "TABLE_RELEASED",
        };
        write!(f, "{s}")
    }
}

/// Event payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    OrderOpened {
        order_id: String,
        table_id: Option<String>,
        channel: OrderChannel,
    },
    OrderSubmitted {
        order_id: String,
    },
    OrderStatusChanged {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },
    OrderCancelled {
        order_id: String,
        reason: String,
    },
    ItemAdded {
        order_id: String,
        item: OrderItem,
    },
    ItemStatusChanged {
        order_id: String,
        item_id: String,
        from: OrderItemStatus,
        to: OrderItemStatus,
    },
    ItemVoided {
        order_id: String,
        item_id: String,
        reason: String,
    },
    ItemPrinted {
        order_id: String,
        item_id: String,
    },
    DiscountApplied {
        order_id: String,
        amount: f64,
    },
    OrderNoteAdded {
        order_id: String,
        note: String,
    },
    BillCreated {
        order_id: String,
        bill_id: String,
        receipt_number: String,
        grand_total: f64,
    },
    PaymentRecorded {
        order_id: String,
        bill_id: String,
        payment_id: String,
        method: PaymentMethod,
        amount: f64,
        change: Option<f64>,
    },
    BillPaid {
        order_id: String,
        bill_id: String,
    },
    BillVoided {
        order_id: String,
        bill_id: String,
        reason: String,
    },
    SessionOpened {
        session_id: String,
        table_id: String,
    },
    OrderAttached {
        session_id: String,
        order_id: String,
    },
    SessionClosed {
        session_id: String,
        table_id: String,
    },
    TableReleased {
        table_id: String,
    },
}

impl EventPayload {
    pub fn event_type(&self) -> OrderEventType {
        match self {
            EventPayload::OrderOpened { .. } => OrderEventType::OrderOpened,
            EventPayload::OrderSubmitted { .. } => OrderEventType::OrderSubmitted,
            EventPayload::OrderStatusChanged { .. } => OrderEventType::OrderStatusChanged,
            EventPayload::OrderCancelled { .. } => OrderEventType::OrderCancelled,
            EventPayload::ItemAdded { .. } => OrderEventType::ItemAdded,
            EventPayload::ItemStatusChanged { .. } => OrderEventType::ItemStatusChanged,
            EventPayload::ItemVoided { .. } => OrderEventType::ItemVoided,
            EventPayload::ItemPrinted { .. } => OrderEventType::ItemPrinted,
            EventPayload::DiscountApplied { .. } => OrderEventType::DiscountApplied,
            EventPayload::OrderNoteAdded { .. } => OrderEventType::OrderNoteAdded,
            EventPayload::BillCreated { .. } => OrderEventType::BillCreated,
            EventPayload::PaymentRecorded { .. } => OrderEventType::PaymentRecorded,
            EventPayload::BillPaid { .. } => OrderEventType::BillPaid,
            EventPayload::BillVoided { .. } => OrderEventType::BillVoided,
            EventPayload::SessionOpened { .. } => OrderEventType::SessionOpened,
            EventPayload::OrderAttached { .. } => OrderEventType::OrderAttached,
            EventPayload::SessionClosed { .. } => OrderEventType::SessionClosed,
            EventPayload::TableReleased { .. } => OrderEventType::TableReleased,
        }
    }

    /// The order this event belongs to, if any.
    pub fn order_id(&self) -> Option<&str> {
        match self {
            EventPayload::OrderOpened { order_id, .. }
            | EventPayload::OrderSubmitted { order_id }
            | EventPayload::OrderStatusChanged { order_id, .. }
            | EventPayload::OrderCancelled { order_id, .. }
            | EventPayload::ItemAdded { order_id, .. }
            | EventPayload::ItemStatusChanged { order_id, .. }
            | EventPayload::ItemVoided { order_id, .. }
            | EventPayload::ItemPrinted { order_id, .. }
            | EventPayload::DiscountApplied { order_id, .. }
            | EventPayload::OrderNoteAdded { order_id, .. }
            | EventPayload::BillCreated { order_id, .. }
            | EventPayload::PaymentRecorded { order_id, .. }
            | EventPayload::BillPaid { order_id, .. }
            | EventPayload::BillVoided { order_id, .. }
            | EventPayload::OrderAttached { order_id, .. } => Some(order_id),
            EventPayload::SessionOpened { .. }
            | EventPayload::SessionClosed { .. }
            | EventPayload::TableReleased { .. } => None,
        }
    }

    /// Audited entity `(type, id)` for this event.
    pub fn entity(&self) -> (&'static str, &str) {
        match self {
            EventPayload::BillCreated { bill_id, .. }
            | EventPayload::PaymentRecorded { bill_id, .. }
            | EventPayload::BillPaid { bill_id, .. }
            | EventPayload::BillVoided { bill_id, .. } => ("bill", bill_id),
            EventPayload::SessionOpened { session_id, .. }
            | EventPayload::OrderAttached { session_id, .. }
            | EventPayload::SessionClosed { session_id, .. } => ("session", session_id),
            EventPayload::TableReleased { table_id } => ("table", table_id),
            other => ("order", other.order_id().unwrap_or_default()),
        }
    }
}
