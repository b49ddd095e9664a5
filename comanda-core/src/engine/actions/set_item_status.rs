//! SetItemStatus action
//!
//! Advances one item through the kitchen lifecycle, enforcing the item
//! transition table, then re-derives the order's readiness status.

use super::{refresh_after_item_mutation, CommandMetadata, OrderAction};
use crate::engine::OrderCell;
use shared::order::{EventPayload, OrderEvent, OrderItemStatus};
use shared::OrderError;

/// SetItemStatus action
#[derive(Debug, Clone)]
pub(crate) struct SetItemStatusAction {
    pub item_id: String,
    pub new_status: OrderItemStatus,
}

impl OrderAction for SetItemStatusAction {
    fn execute(
        &self,
        cell: &mut OrderCell,
        meta: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
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

        let from = item.status;
        if !from.can_transition(self.new_status) {
            return Err(OrderError::InvalidItemTransition {
                from,
                to: self.new_status,
            });
        }

        item.status = self.new_status;
        item.updated_at = meta.timestamp;

        let mut events = vec![OrderEvent::new(
            &meta.actor,
            EventPayload::ItemStatusChanged {
                order_id,
                item_id: self.item_id.clone(),
                from,
                to: self.new_status,
            },
        )];
        if let Some(ev) = refresh_after_item_mutation(cell, meta) {
            events.push(ev);
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use shared::order::OrderStatus;

    fn first_item_id(cell: &OrderCell) -> String {
        cell.order.items[0].id.clone()
    }

    fn set(cell: &mut OrderCell, item_id: &str, status: OrderItemStatus) -> Result<Vec<OrderEvent>, OrderError> {
        SetItemStatusAction {
            item_id: item_id.to_string(),
            new_status: status,
        }
        .execute(cell, &test_meta())
    }

    #[test]
    fn test_kitchen_progression() {
        let mut cell = submitted_cell(&[(10.0, 1)]);
        let id = first_item_id(&cell);

        set(&mut cell, &id, OrderItemStatus::Cooking).unwrap();
        set(&mut cell, &id, OrderItemStatus::Ready).unwrap();
        assert_eq!(cell.order.status, OrderStatus::Ready);

        set(&mut cell, &id, OrderItemStatus::Served).unwrap();
        assert_eq!(cell.order.status, OrderStatus::Served);
    }

    #[test]
    fn test_partial_ready_derivation() {
        let mut cell = submitted_cell(&[(10.0, 1), (20.0, 1)]);
        let first = cell.order.items[0].id.clone();

        set(&mut cell, &first, OrderItemStatus::Cooking).unwrap();
        assert_eq!(cell.order.status, OrderStatus::Submitted);

        let events = set(&mut cell, &first, OrderItemStatus::Ready).unwrap();
        assert_eq!(cell.order.status, OrderStatus::PartialReady);
        assert!(events.iter().any(|e| matches!(
            e.payload,
            EventPayload::OrderStatusChanged {
                to: OrderStatus::PartialReady,
                ..
            }
        )));
    }

    #[test]
    fn test_skip_transition_rejected() {
        let mut cell = submitted_cell(&[(10.0, 1)]);
        let id = first_item_id(&cell);

        let result = set(&mut cell, &id, OrderItemStatus::Served);
        assert_eq!(
            result,
            Err(OrderError::InvalidItemTransition {
                from: OrderItemStatus::Pending,
                to: OrderItemStatus::Served,
            })
        );
        // No partial effect
        assert_eq!(cell.order.items[0].status, OrderItemStatus::Pending);
        assert_eq!(cell.order.status, OrderStatus::Submitted);
    }

    #[test]
    fn test_unknown_item() {
        let mut cell = submitted_cell(&[(10.0, 1)]);
        let result = set(&mut cell, "nope", OrderItemStatus::Cooking);
        assert_eq!(result, Err(OrderError::ItemNotFound("nope".to_string())));
    }

    #[test]
    fn test_blocked_once_billed() {
        let (mut cell, _) = billed_cell(&[(10.0, 1)]);
        let id = first_item_id(&cell);
        let result = set(&mut cell, &id, OrderItemStatus::Cooking);
        assert!(matches!(result, Err(OrderError::OrderNotMutable { .. })));
    }

    #[test]
    fn test_void_through_status_change_excludes_from_totals() {
        let mut cell = submitted_cell(&[(10.0, 1), (20.0, 1)]);
        let first = cell.order.items[0].id.clone();

        set(&mut cell, &first, OrderItemStatus::Void).unwrap();

        assert_eq!(cell.order.subtotal, 20.0);
        // Row retained for audit
        assert_eq!(cell.order.items.len(), 2);
    }
}
