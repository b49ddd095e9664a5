//! Order domain module
//!
//! This module provides the order aggregate and everything owned by it:
//!
//! - Status enums with closed transition tables ([`status`])
//! - Line items with immutable price snapshots ([`types`])
//! - Bills and payments ([`bill`])
//! - Table sessions ([`session`])
//! - Domain events broadcast after each accepted mutation ([`event`])
//!
//! The [`Order`] aggregate owns its items; bills reference an order but hold
//! a frozen copy of its totals. Monetary recomputation lives in
//! `comanda-core::money`, not here.

pub mod bill;
pub mod event;
pub mod session;
pub mod status;
pub mod types;

pub use bill::{Bill, BillPaidStatus, Payment, PaymentInput, PaymentMethod};
pub use event::{EventPayload, OrderEvent, OrderEventType};
pub use session::TableSession;
pub use status::{OrderItemStatus, OrderStatus};
pub use types::{Actor, ItemRequest, OptionChoice, OptionSelect, OrderItem};

use crate::util::{new_id, now_millis};
use serde::{Deserialize, Serialize};

/// Order channel - how the order entered the system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderChannel {
    /// 堂食
    #[default]
    DineIn,
    /// 外卖/打包
    Takeaway,
}

/// Order aggregate
///
/// Owns its items and all monetary totals. The totals obey
/// `grand_total = subtotal + service_charge_amount + vat_amount -
/// discount_amount` and are only ever written by the engine's
/// recomputation; they are never edited independently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    /// Bound table, None for staff-entered tabs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    pub channel: OrderChannel,
    pub status: OrderStatus,
    pub guest_count: i32,
    pub items: Vec<OrderItem>,

    // === Monetary totals (recomputed, never edited) ===
    pub subtotal: f64,
    /// Service charge fraction, e.g. 0.10 for 10%
    pub service_charge_pct: f64,
    pub service_charge_amount: f64,
    /// VAT fraction, e.g. 0.07 for 7%
    pub vat_pct: f64,
    pub vat_amount: f64,
    pub discount_amount: f64,
    pub grand_total: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    pub created_by: String,
    pub created_at: i64,
    pub updated_at: i64,
    /// Set when the order reaches PAID or CANCELLED
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<i64>,
}

impl Order {
    /// Create a new OPEN order with the given charge rates.
    pub fn new(
        table_id: Option<String>,
        channel: OrderChannel,
        guest_count: i32,
        service_charge_pct: f64,
        vat_pct: f64,
        created_by: String,
    ) -> Self {
        let now = now_millis();
        Self {
            id: new_id(),
            table_id,
            channel,
            status: OrderStatus::Open,
            guest_count,
            items: Vec::new(),
            subtotal: 0.0,
            service_charge_pct,
            service_charge_amount: 0.0,
            vat_pct,
            vat_amount: 0.0,
            discount_amount: 0.0,
            grand_total: 0.0,
            note: None,
            cancel_reason: None,
            created_by,
            created_at: now,
            updated_at: now,
            closed_at: None,
        }
    }

    /// Items that still count toward totals and readiness.
    pub fn non_void_items(&self) -> impl Iterator<Item = &OrderItem> {
        self.items
            .iter()
            .filter(|i| i.status != OrderItemStatus::Void)
    }

    pub fn item(&self, item_id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut OrderItem> {
        self.items.iter_mut().find(|i| i.id == item_id)
    }

    /// Whether items/discounts may still be mutated.
    pub fn is_mutable(&self) -> bool {
        !matches!(
            self.status,
            OrderStatus::Billed | OrderStatus::Paid | OrderStatus::Cancelled
        )
    }

    pub fn is_closed(&self) -> bool {
        self.status.is_terminal()
    }

    /// Derive the readiness status from the non-void item set.
    ///
    /// Only meaningful while the order sits in the derived band
    /// (SUBMITTED / PARTIAL_READY / READY); SERVED is a ratchet and OPEN
    /// orders are not yet in the kitchen.
    pub fn derived_readiness(&self) -> OrderStatus {
        let mut total = 0usize;
        let mut served = 0usize;
        let mut ready = 0usize;
        for item in self.non_void_items() {
            total += 1;
            match item.status {
                OrderItemStatus::Served => served += 1,
                OrderItemStatus::Ready => ready += 1,
                _ => {}
            }
        }

        // All items voided: nothing to progress, stay submitted.
        if total == 0 {
            return OrderStatus::Submitted;
        }
        if served == total {
            return OrderStatus::Served;
        }
        if ready == total {
            return OrderStatus::Ready;
        }
        if served + ready > 0 {
            return OrderStatus::PartialReady;
        }
        OrderStatus::Submitted
    }
}
