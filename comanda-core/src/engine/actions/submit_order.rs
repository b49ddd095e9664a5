//! SubmitOrder action
//!
//! Hands an OPEN order to the kitchen: OPEN -> SUBMITTED, then the usual
//! readiness derivation in case items already progressed.

use super::{refresh_after_item_mutation, CommandMetadata, OrderAction};
use crate::engine::OrderCell;
use shared::order::{EventPayload, OrderEvent, OrderStatus};
use shared::OrderError;

/// SubmitOrder action
#[derive(Debug, Clone, Copy)]
pub(crate) struct SubmitOrderAction;

impl OrderAction for SubmitOrderAction {
    fn execute(
        &self,
        cell: &mut OrderCell,
        meta: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        if cell.order.status != OrderStatus::Open {
            return Err(OrderError::InvalidOperation(format!(
                "cannot submit order in {} status",
                cell.order.status
            )));
        }
        if cell.order.non_void_items().count() == 0 {
            return Err(OrderError::EmptyOrder(cell.order.id.clone()));
        }

        cell.order.status = OrderStatus::Submitted;

        let mut events = vec![OrderEvent::new(
            &meta.actor,
            EventPayload::OrderSubmitted {
                order_id: cell.order.id.clone(),
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
    use super::super::{AddItemAction, VoidItemAction};
    use super::*;
    use shared::order::ItemRequest;

    #[test]
    fn test_submit_open_order() {
        let mut cell = open_cell();
        AddItemAction {
            snapshot: menu_snapshot("m-1", "Burger", 8.50),
            request: ItemRequest::new("m-1", 1),
        }
        .execute(&mut cell, &test_meta())
        .unwrap();

        SubmitOrderAction.execute(&mut cell, &test_meta()).unwrap();
        assert_eq!(cell.order.status, OrderStatus::Submitted);
    }

    #[test]
    fn test_submit_empty_order_rejected() {
        let mut cell = open_cell();
        let result = SubmitOrderAction.execute(&mut cell, &test_meta());
        assert_eq!(
            result,
            Err(OrderError::EmptyOrder(cell.order.id.clone()))
        );
        assert_eq!(cell.order.status, OrderStatus::Open);
    }

    #[test]
    fn test_submit_order_with_only_void_items_rejected() {
        let mut cell = open_cell();
        AddItemAction {
            snapshot: menu_snapshot("m-1", "Burger", 8.50),
            request: ItemRequest::new("m-1", 1),
        }
        .execute(&mut cell, &test_meta())
        .unwrap();
        let id = cell.order.items[0].id.clone();
        VoidItemAction {
            item_id: id,
            reason: "ordered by accident".to_string(),
        }
        .execute(&mut cell, &test_meta())
        .unwrap();

        let result = SubmitOrderAction.execute(&mut cell, &test_meta());
        assert!(matches!(result, Err(OrderError::EmptyOrder(_))));
    }

    #[test]
    fn test_double_submit_rejected() {
        let mut cell = submitted_cell(&[(10.0, 1)]);
        let result = SubmitOrderAction.execute(&mut cell, &test_meta());
        assert!(matches!(result, Err(OrderError::InvalidOperation(_))));
    }
}
