//! MarkItemPrinted action
//!
//! Flags a line item's kitchen ticket as printed. Idempotent: re-printing
//! an already-flagged item is a no-op with no events.

use super::{CommandMetadata, OrderAction};
use crate::engine::OrderCell;
use shared::order::{EventPayload, OrderEvent};
use shared::OrderError;

/// MarkItemPrinted action
#[derive(Debug, Clone)]
pub(crate) struct MarkItemPrintedAction {
    pub item_id: String,
}

impl OrderAction for MarkItemPrintedAction {
    fn execute(
        &self,
        cell: &mut OrderCell,
        meta: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        if cell.order.status.is_terminal() {
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

        if item.is_void() {
            return Err(OrderError::InvalidOperation(format!(
                "cannot print ticket for void item {}",
                self.item_id
            )));
        }
        if item.printed {
            return Ok(vec![]);
        }

        item.printed = true;
        item.updated_at = meta.timestamp;

        Ok(vec![OrderEvent::new(
            &meta.actor,
            EventPayload::ItemPrinted {
                order_id,
                item_id: self.item_id.clone(),
            },
        )])
    }
}
