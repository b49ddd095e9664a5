//! RecordPayment action
//!
//! Appends a payment to an UNPAID bill. The running sum of payments may
//! never exceed the bill's grand total beyond the configured tolerance;
//! when it covers the total, bill and order settle atomically under the
//! same lock.

use super::{CommandMetadata, OrderAction};
use crate::engine::OrderCell;
use crate::money::{self, to_decimal, to_f64};
use rust_decimal::Decimal;
use shared::order::{
    BillPaidStatus, EventPayload, OrderEvent, OrderStatus, Payment, PaymentInput,
};
use shared::util::new_id;
use shared::OrderError;

/// RecordPayment action
#[derive(Debug, Clone)]
pub(crate) struct RecordPaymentAction {
    pub bill_id: String,
    pub input: PaymentInput,
    /// How far the running sum may exceed grand_total (cash-rounding policy)
    pub overpayment_tolerance: f64,
}

impl OrderAction for RecordPaymentAction {
    fn execute(
        &self,
        cell: &mut OrderCell,
        meta: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        // 1. Input validation (finite, positive, within bounds)
        money::validate_payment(&self.input)?;

        let order_id = cell.order.id.clone();
        let bill = cell
            .bill_mut(&self.bill_id)
            .ok_or_else(|| OrderError::BillNotFound(self.bill_id.clone()))?;

        // 2. Bill must still be open for payment
        if bill.paid_status != BillPaidStatus::Unpaid {
            return Err(OrderError::BillNotPayable {
                bill_id: bill.id.clone(),
                status: bill.paid_status,
            });
        }

        let amount = to_decimal(self.input.amount);

        // 3. Cash handling: tendered must cover the amount
        let change = match self.input.tendered {
            Some(t) => {
                let tendered = to_decimal(t);
                if tendered < amount {
                    return Err(OrderError::InvalidOperation(format!(
                        "tendered {:.2} is less than required {:.2}",
                        t, self.input.amount
                    )));
                }
                Some(to_f64((tendered - amount).max(Decimal::ZERO)))
            }
            None => None,
        };

        // 4. Overpayment guard against the running sum
        let grand_total = to_decimal(bill.grand_total);
        let prior = money::sum_payments(bill);
        let running = prior + amount;
        if running > grand_total + to_decimal(self.overpayment_tolerance) {
            return Err(OrderError::OverpaymentNotAllowed {
                attempted: self.input.amount,
                remaining: to_f64(grand_total - prior),
            });
        }

        // 5. Append the payment record
        let payment = Payment {
            id: new_id(),
            method: self.input.method,
            amount: self.input.amount,
            reference: self.input.reference.clone(),
            tendered: self.input.tendered,
            change,
            received_by: meta.actor.id.clone(),
            timestamp: meta.timestamp,
        };
        let payment_id = payment.id.clone();
        bill.payments.push(payment);

        let mut events = vec![OrderEvent::new(
            &meta.actor,
            EventPayload::PaymentRecorded {
                order_id: order_id.clone(),
                bill_id: bill.id.clone(),
                payment_id,
                method: self.input.method,
                amount: self.input.amount,
                change,
            },
        )];

        // 6. Settle when the running sum covers the total
        if running >= grand_total {
            bill.paid_status = BillPaidStatus::Paid;
            bill.paid_at = Some(meta.timestamp);
            let bill_id = bill.id.clone();

            cell.order.status = OrderStatus::Paid;
            cell.order.closed_at = Some(meta.timestamp);
            cell.order.updated_at = meta.timestamp;

            events.push(OrderEvent::new(
                &meta.actor,
                EventPayload::BillPaid { order_id, bill_id },
            ));
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use shared::order::PaymentMethod;

    fn pay(
        cell: &mut OrderCell,
        bill_id: &str,
        input: PaymentInput,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        RecordPaymentAction {
            bill_id: bill_id.to_string(),
            input,
            overpayment_tolerance: 0.0,
        }
        .execute(cell, &test_meta())
    }

    #[test]
    fn test_split_payment_settles_on_exact_cover() {
        // Reference scenario: 294.25 settled as 150.00 + 144.25
        let (mut cell, bill) = billed_cell(&[(100.0, 2), (50.0, 1)]);
        assert_eq!(bill.grand_total, 294.25);

        pay(
            &mut cell,
            &bill.id,
            PaymentInput::new(PaymentMethod::Card, 150.0),
        )
        .unwrap();
        assert_eq!(cell.bills[0].paid_status, BillPaidStatus::Unpaid);
        assert_eq!(cell.order.status, OrderStatus::Billed);
        assert_eq!(to_f64(money::remaining_due(&cell.bills[0])), 144.25);

        let events = pay(
            &mut cell,
            &bill.id,
            PaymentInput::new(PaymentMethod::Cash, 144.25),
        )
        .unwrap();

        assert_eq!(cell.bills[0].paid_status, BillPaidStatus::Paid);
        assert!(cell.bills[0].paid_at.is_some());
        assert_eq!(cell.order.status, OrderStatus::Paid);
        assert!(events
            .iter()
            .any(|e| matches!(e.payload, EventPayload::BillPaid { .. })));
    }

    #[test]
    fn test_overpayment_rejected() {
        // 300.00 against 294.25 must fail and leave the bill untouched
        let (mut cell, bill) = billed_cell(&[(100.0, 2), (50.0, 1)]);
        let result = pay(
            &mut cell,
            &bill.id,
            PaymentInput::new(PaymentMethod::Card, 300.0),
        );

        assert_eq!(
            result,
            Err(OrderError::OverpaymentNotAllowed {
                attempted: 300.0,
                remaining: 294.25,
            })
        );
        assert_eq!(cell.bills[0].paid_status, BillPaidStatus::Unpaid);
        assert!(cell.bills[0].payments.is_empty());
    }

    #[test]
    fn test_overpayment_within_tolerance_accepted() {
        let (mut cell, bill) = billed_cell(&[(100.0, 2), (50.0, 1)]);
        let events = RecordPaymentAction {
            bill_id: bill.id.clone(),
            input: PaymentInput::new(PaymentMethod::Cash, 295.0),
            overpayment_tolerance: 1.0,
        }
        .execute(&mut cell, &test_meta())
        .unwrap();

        assert_eq!(cell.bills[0].paid_status, BillPaidStatus::Paid);
        assert!(events
            .iter()
            .any(|e| matches!(e.payload, EventPayload::BillPaid { .. })));
    }

    #[test]
    fn test_cash_change_computed() {
        let (mut cell, bill) = billed_cell(&[(10.0, 1)]);
        // grand = 10 + 1 + round(11*0.07)=0.77 => 11.77
        assert_eq!(bill.grand_total, 11.77);

        pay(
            &mut cell,
            &bill.id,
            PaymentInput::new(PaymentMethod::Cash, 11.77).with_tendered(20.0),
        )
        .unwrap();

        let payment = &cell.bills[0].payments[0];
        assert_eq!(payment.change, Some(8.23));
    }

    #[test]
    fn test_insufficient_tender_rejected() {
        let (mut cell, bill) = billed_cell(&[(10.0, 1)]);
        let result = pay(
            &mut cell,
            &bill.id,
            PaymentInput::new(PaymentMethod::Cash, 11.77).with_tendered(10.0),
        );
        assert!(matches!(result, Err(OrderError::InvalidOperation(_))));
        assert!(cell.bills[0].payments.is_empty());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let (mut cell, bill) = billed_cell(&[(10.0, 1)]);
        let result = pay(
            &mut cell,
            &bill.id,
            PaymentInput::new(PaymentMethod::Card, 0.0),
        );
        assert_eq!(result, Err(OrderError::NonPositiveAmount(0.0)));
    }

    #[test]
    fn test_paid_bill_rejects_more_payments() {
        let (mut cell, bill) = billed_cell(&[(10.0, 1)]);
        pay(
            &mut cell,
            &bill.id,
            PaymentInput::new(PaymentMethod::Card, 11.77),
        )
        .unwrap();

        let result = pay(
            &mut cell,
            &bill.id,
            PaymentInput::new(PaymentMethod::Card, 1.0),
        );
        assert_eq!(
            result,
            Err(OrderError::BillNotPayable {
                bill_id: bill.id,
                status: BillPaidStatus::Paid,
            })
        );
    }

    #[test]
    fn test_unknown_bill() {
        let (mut cell, _) = billed_cell(&[(10.0, 1)]);
        let result = pay(
            &mut cell,
            "nope",
            PaymentInput::new(PaymentMethod::Card, 1.0),
        );
        assert_eq!(result, Err(OrderError::BillNotFound("nope".to_string())));
    }

    #[test]
    fn test_non_void_payment_sum_equals_grand_total_when_paid() {
        let (mut cell, bill) = billed_cell(&[(100.0, 2), (50.0, 1)]);
        pay(
            &mut cell,
            &bill.id,
            PaymentInput::new(PaymentMethod::Card, 150.0),
        )
        .unwrap();
        pay(
            &mut cell,
            &bill.id,
            PaymentInput::new(PaymentMethod::Cash, 144.25),
        )
        .unwrap();

        let paid = money::sum_payments(&cell.bills[0]);
        assert_eq!(to_f64(paid), cell.bills[0].grand_total);
    }
}
