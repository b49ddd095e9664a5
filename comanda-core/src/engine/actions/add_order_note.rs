//! AddOrderNote action

use super::{CommandMetadata, OrderAction};
use crate::engine::OrderCell;
use shared::order::{EventPayload, OrderEvent};
use shared::OrderError;

/// AddOrderNote action
#[derive(Debug, Clone)]
pub(crate) struct AddOrderNoteAction {
    pub note: String,
}

impl OrderAction for AddOrderNoteAction {
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
        if self.note.trim().is_empty() {
            return Err(OrderError::InvalidOperation(
                "note must not be empty".to_string(),
            ));
        }

        cell.order.note = Some(self.note.clone());
        cell.order.updated_at = meta.timestamp;

        Ok(vec![OrderEvent::new(
            &meta.actor,
            EventPayload::OrderNoteAdded {
                order_id: cell.order.id.clone(),
                note: self.note.clone(),
            },
        )])
    }
}
