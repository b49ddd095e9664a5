//! CancelOrder action
//!
//! Cancels an order before billing. All non-served items are voided with
//! the cancel reason; totals are left as last computed so the audit trail
//! shows what the order was worth when it died.

use super::{CommandMetadata, OrderAction};
use crate::engine::OrderCell;
use shared::order::{EventPayload, OrderEvent, OrderItemStatus, OrderStatus};
use shared::OrderError;

/// CancelOrder action
#[derive(Debug, Clone)]
pub(crate) struct CancelOrderAction {
    pub reason: String,
}

impl OrderAction for CancelOrderAction {
    fn execute(
        &self,
        cell: &mut OrderCell,
        meta: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        if self.reason.trim().is_empty() {
            return Err(OrderError::InvalidOperation(
                "cancel reason is required".to_string(),
            ));
        }
        if !cell.order.status.can_transition(OrderStatus::Cancelled) {
            return Err(OrderError::OrderNotMutable {
                order_id: cell.order.id.clone(),
                status: cell.order.status,
            });
        }

        // Bulk-void everything not yet served; the per-item table does not
        // apply to administrative cancellation.
        for item in &mut cell.order.items {
            if !matches!(item.status, OrderItemStatus::Served | OrderItemStatus::Void) {
                item.status = OrderItemStatus::Void;
                item.void_reason = Some(format!("order cancelled: {}", self.reason));
                item.updated_at = meta.timestamp;
            }
        }

        // Totals intentionally stay as last computed.
        cell.order.status = OrderStatus::Cancelled;
        cell.order.cancel_reason = Some(self.reason.clone());
        cell.order.closed_at = Some(meta.timestamp);
        cell.order.updated_at = meta.timestamp;

        Ok(vec![OrderEvent::new(
            &meta.actor,
            EventPayload::OrderCancelled {
                order_id: cell.order.id.clone(),
                reason: self.reason.clone(),
            },
        )])
    }
}
