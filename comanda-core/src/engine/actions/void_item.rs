//! VoidItem action
//!
//! Voids one item with a mandatory reason. The row is kept for audit; its
//! line total stops counting toward order totals and readiness.

use super::{refresh_after_item_mutation, CommandMetadata, OrderAction};
use crate::engine::OrderCell;
use shared::order::{EventPayload, OrderEvent, OrderItemStatus};
use shared::OrderError;

/// VoidItem action
#[derive(Debug, Clone)]
pub(crate) struct VoidItemAction {
    pub item_id: String,
    pub reason: String,
}

impl OrderAction for VoidItemAction {
    fn execute(
        &self,
        cell: &mut OrderCell,
        meta: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        if self.reason.trim().is_empty() {
            return Err(OrderError::InvalidOperation(
                "void reason is required".to_string(),
            ));
        }
        if !cell.order.is_mutable() {
            return Err(OrderError::OrderNotMutable {
                order_id: cell.order.id.clone(),
                status: cell.order.status,
            });
        }

        let order_id = cell.order.id.clone();
        let item = cell
            .order
            .item_mut(&self.item_id)
            .ok_or_else(|| OrderError::ItemNotFound(self.item_id.clone()))?;

        if item.status == OrderItemStatus::Served {
            return Err(OrderError::ItemAlreadyServed(self.item_id.clone()));
        }
        if !item.status.can_transition(OrderItemStatus::Void) {
            return Err(OrderError::InvalidItemTransition {
                from: item.status,
                to: OrderItemStatus::Void,
            });
        }

        item.status = OrderItemStatus::Void;
        item.void_reason = Some(self.reason.clone());
        item.updated_at = meta.timestamp;

        let mut events = vec![OrderEvent::new(
            &meta.actor,
            EventPayload::ItemVoided {
                order_id,
                item_id: self.item_id.clone(),
                reason: self.reason.clone(),
            },
        )];
        if let Some(ev) = refresh_after_item_mutation(cell, meta) {
            events.push(ev);
        }
        Ok(events)
    }
}
