//! CreateBill action
//!
//! Freezes a SERVED order's totals into a new UNPAID bill and advances the
//! order to BILLED. At most one non-void bill may exist per order; a voided
//! bill may be superseded by a corrected one.

use super::{CommandMetadata, OrderAction};
use crate::engine::OrderCell;
use shared::order::{Bill, EventPayload, OrderEvent, OrderStatus};
use shared::OrderError;

/// CreateBill action
#[derive(Debug, Clone)]
pub(crate) struct CreateBillAction {
    /// Server-generated receipt number
    pub receipt_number: String,
}

impl OrderAction for CreateBillAction {
    fn execute(
        &self,
        cell: &mut OrderCell,
        meta: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        if cell.order.status != OrderStatus::Served {
            return Err(OrderError::OrderNotReady {
                order_id: cell.order.id.clone(),
                status: cell.order.status,
            });
        }
        if let Some(existing) = cell.active_bill() {
            return Err(OrderError::BillAlreadyExists {
                order_id: cell.order.id.clone(),
                bill_id: existing.id.clone(),
            });
        }

        let bill = Bill::snapshot_of(&cell.order, self.receipt_number.clone());
        let event = OrderEvent::new(
            &meta.actor,
            EventPayload::BillCreated {
                order_id: cell.order.id.clone(),
                bill_id: bill.id.clone(),
                receipt_number: bill.receipt_number.clone(),
                grand_total: bill.grand_total,
            },
        );
        cell.bills.push(bill);
        cell.order.status = OrderStatus::Billed;
        cell.order.updated_at = meta.timestamp;

        Ok(vec![event])
    }
}
