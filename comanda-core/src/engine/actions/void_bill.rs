//! VoidBill action
//!
//! Voids an UNPAID bill and reverts the owning order to SERVED so a
//! corrected bill can be issued.

use super::{CommandMetadata, OrderAction};
use crate::engine::OrderCell;
use shared::order::{BillPaidStatus, EventPayload, OrderEvent, OrderStatus};
use shared::OrderError;

/// VoidBill action
#[derive(Debug, Clone)]
pub(crate) struct VoidBillAction {
    pub bill_id: String,
    pub reason: String,
}

impl OrderAction for VoidBillAction {
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

        let order_id = cell.order.id.clone();
        let bill = cell
            .bill_mut(&self.bill_id)
            .ok_or_else(|| OrderError::BillNotFound(self.bill_id.clone()))?;

        if bill.paid_status != BillPaidStatus::Unpaid {
            return Err(OrderError::BillNotPayable {
                bill_id: bill.id.clone(),
                status: bill.paid_status,
            });
        }

        bill.paid_status = BillPaidStatus::Void;
        bill.void_reason = Some(self.reason.clone());
        bill.voided_at = Some(meta.timestamp);

        cell.order.status = OrderStatus::Served;
        cell.order.updated_at = meta.timestamp;

        Ok(vec![OrderEvent::new(
            &meta.actor,
            EventPayload::BillVoided {
                order_id,
                bill_id: self.bill_id.clone(),
                reason: self.reason.clone(),
            },
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::RecordPaymentAction;
    use super::*;

    #[test]
    fn test_void_reverts_order_to_served() {
        let (mut cell, bill) = billed_cell(&[(10.0, 1)]);
        VoidBillAction {
            bill_id: bill.id.clone(),
            reason: "wrong discount".to_string(),
        }
        .execute(&mut cell, &test_meta())
        .unwrap();

        assert_eq!(cell.bills[0].paid_status, BillPaidStatus::Void);
        assert!(cell.bills[0].voided_at.is_some());
        assert_eq!(cell.order.status, OrderStatus::Served);
    }

    #[test]
    fn test_void_paid_bill_rejected() {
        let (mut cell, bill) = billed_cell(&[(10.0, 1)]);
        RecordPaymentAction {
            bill_id: bill.id.clone(),
            input: shared::order::PaymentInput::new(shared::order::PaymentMethod::Card, 11.77),
            overpayment_tolerance: 0.0,
        }
        .execute(&mut cell, &test_meta())
        .unwrap();

        let result = VoidBillAction {
            bill_id: bill.id.clone(),
            reason: "no".to_string(),
        }
        .execute(&mut cell, &test_meta());

        assert_eq!(
            result,
            Err(OrderError::BillNotPayable {
                bill_id: bill.id,
                status: BillPaidStatus::Paid,
            })
        );
    }

    #[test]
    fn test_void_requires_reason() {
        let (mut cell, bill) = billed_cell(&[(10.0, 1)]);
        let result = VoidBillAction {
            bill_id: bill.id,
            reason: "".to_string(),
        }
        .execute(&mut cell, &test_meta());
        assert!(matches!(result, Err(OrderError::InvalidOperation(_))));
    }
}
