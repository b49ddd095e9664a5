//! Bills and payments
//!
//! A bill is an immutable financial snapshot of an order taken at billing
//! time; later order mutation (impossible anyway once BILLED) can never
//! leak into it. Payments are append-only. The sum of non-void payments
//! equals `grand_total` exactly when `paid_status` is PAID and is strictly
//! less otherwise.

use super::Order;
use crate::util::{new_id, now_millis};
use serde::{Deserialize, Serialize};

/// Bill paid status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillPaidStatus {
    #[default]
    Unpaid,
    Paid,
    Void,
}

impl std::fmt::Display for BillPaidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BillPaidStatus::Unpaid => "UNPAID",
            BillPaidStatus::Paid => "PAID",
            BillPaidStatus::Void => "VOID",
        };
        write!(f, "{s}")
    }
}

/// Payment method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Mobile,
    Other,
}

/// Payment input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub method: PaymentMethod,
    pub amount: f64,
    /// External reference, e.g. a card terminal transaction id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Cash handed over; change is computed as `tendered - amount`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tendered: Option<f64>,
}

impl PaymentInput {
    pub fn new(method: PaymentMethod, amount: f64) -> Self {
        Self {
            method,
            amount,
            reference: None,
            tendered: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_tendered(mut self, tendered: f64) -> Self {
        self.tendered = Some(tendered);
        self
    }
}

/// Payment record - created on receipt of funds, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: String,
    pub method: PaymentMethod,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tendered: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    pub received_by: String,
    pub timestamp: i64,
}

/// Bill - immutable snapshot of an order presented for payment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bill {
    pub id: String,
    pub order_id: String,
    /// Server-generated receipt number, e.g. FAC2026080710001
    pub receipt_number: String,

    // === Financial snapshot, frozen at creation ===
    pub subtotal: f64,
    pub service_charge_amount: f64,
    pub vat_amount: f64,
    pub discount_amount: f64,
    pub grand_total: f64,

    pub paid_status: BillPaidStatus,
    pub payments: Vec<Payment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub void_reason: Option<String>,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voided_at: Option<i64>,
}

impl Bill {
    /// Snapshot an order's totals into a fresh UNPAID bill.
    pub fn snapshot_of(order: &Order, receipt_number: String) -> Self {
        Self {
            id: new_id(),
            order_id: order.id.clone(),
            receipt_number,
            subtotal: order.subtotal,
            service_charge_amount: order.service_charge_amount,
            vat_amount: order.vat_amount,
            discount_amount: order.discount_amount,
            grand_total: order.grand_total,
            paid_status: BillPaidStatus::Unpaid,
            payments: Vec::new(),
            void_reason: None,
            created_at: now_millis(),
            paid_at: None,
            voided_at: None,
        }
    }

    pub fn is_payable(&self) -> bool {
        self.paid_status == BillPaidStatus::Unpaid
    }
}
