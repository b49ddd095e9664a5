//! Audit log type definitions
//!
//! Every accepted state transition yields one [`AuditEntry`]. Entries are
//! immutable facts for compliance; the engine writes and never reads them
//! back.

use serde::{Deserialize, Serialize};
use shared::order::{EventPayload, OrderEvent};

/// Audit action type (closed enum, not free text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // ═══ Order lifecycle ═══
    OrderOpened,
    OrderSubmitted,
    OrderStatusChanged,
    OrderCancelled,

    // ═══ Items ═══
    ItemAdded,
    ItemStatusChanged,
    ItemVoided,
    ItemPrinted,

    // ═══ Adjustments ═══
    DiscountApplied,
    OrderNoteAdded,

    // ═══ Billing (financially critical) ═══
    BillCreated,
    PaymentRecorded,
    BillPaid,
    BillVoided,

    // ═══ Sessions ═══
    SessionOpened,
    OrderAttached,
    SessionClosed,
    TableReleased,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Audit log entry (immutable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Action type
    pub action: AuditAction,
    /// Entity type ("order", "bill", "session", "table")
    pub entity_type: String,
    /// Entity ID
    pub entity_id: String,
    /// Operator ID
    pub operator_id: String,
    /// Operator name snapshot
    pub operator_name: String,
    /// Structured details (the full event payload as JSON)
    pub details: serde_json::Value,
}

impl AuditEntry {
    /// Derive an audit entry from a domain event.
    pub fn from_event(event: &OrderEvent) -> Self {
        let (entity_type, entity_id) = event.payload.entity();
        Self {
            timestamp: event.timestamp,
            action: action_for(&event.payload),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            operator_id: event.actor_id.clone(),
            operator_name: event.actor_name.clone(),
            details: serde_json::to_value(&event.payload).unwrap_or_default(),
        }
    }
}

fn action_for(payload: &EventPayload) -> AuditAction {
    match payload {
        EventPayload::OrderOpened { .. } => AuditAction::OrderOpened,
        EventPayload::OrderSubmitted { .. } => AuditAction::OrderSubmitted,
        EventPayload::OrderStatusChanged { .. } => AuditAction::OrderStatusChanged,
        EventPayload::OrderCancelled { .. } => AuditAction::OrderCancelled,
        EventPayload::ItemAdded { .. } => AuditAction::ItemAdded,
        EventPayload::ItemStatusChanged { .. } => AuditAction::ItemStatusChanged,
        EventPayload::ItemVoided { .. } => AuditAction::ItemVoided,
        EventPayload::ItemPrinted { .. } => AuditAction::ItemPrinted,
        EventPayload::DiscountApplied { .. } => AuditAction::DiscountApplied,
        EventPayload::OrderNoteAdded { .. } => AuditAction::OrderNoteAdded,
        EventPayload::BillCreated { .. } => AuditAction::BillCreated,
        EventPayload::PaymentRecorded { .. } => AuditAction::PaymentRecorded,
        EventPayload::BillPaid { .. } => AuditAction::BillPaid,
        EventPayload::BillVoided { .. } => AuditAction::BillVoided,
        EventPayload::SessionOpened { .. } => AuditAction::SessionOpened,
        EventPayload::OrderAttached { .. } => AuditAction::OrderAttached,
        EventPayload::SessionClosed { .. } => AuditAction::SessionClosed,
        EventPayload::TableReleased { .. } => AuditAction::TableReleased,
    }
}
