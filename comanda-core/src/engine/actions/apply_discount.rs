//! ApplyDiscount action
//!
//! Sets the order-level discount amount and recomputes totals. The discount
//! can never exceed the current subtotal; zero resets it.

use super::{CommandMetadata, OrderAction};
use crate::engine::OrderCell;
use crate::money;
use shared::order::{EventPayload, OrderEvent};
use shared::OrderError;

/// ApplyDiscount action
#[derive(Debug, Clone)]
pub(crate) struct ApplyDiscountAction {
    pub amount: f64,
}

impl OrderAction for ApplyDiscountAction {
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
        money::validate_discount(self.amount, cell.order.subtotal)?;

        cell.order.discount_amount = self.amount;
        money::recalculate_totals(&mut cell.order);

        Ok(vec![OrderEvent::new(
            &meta.actor,
            EventPayload::DiscountApplied {
                order_id: cell.order.id.clone(),
                amount: self.amount,
            },
        )])
    }
}
