//! OrderEngine - per-order serialized command processing
//!
//! The engine owns every order/bill/session registry and guarantees that
//! all mutations of one order are serialized behind a single logical lock
//! keyed by the order id:
//!
//! ```text
//! orders: DashMap<order_id, Arc<Mutex<OrderCell>>>
//! ```
//!
//! Lock acquisition is bounded (`EngineConfig::lock_timeout`); expiry
//! surfaces as the retryable `OrderBusy` with no partial effect. Operations
//! on different orders never contend. Catalog lookups run before the lock;
//! event broadcast and audit emission run after it is released.

pub(crate) mod actions;
mod sessions;

#[cfg(test)]
mod tests;

use crate::audit::{AuditEntry, AuditService};
use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::money;
use actions::{
    AddItemAction, AddOrderNoteAction, ApplyDiscountAction, CancelOrderAction, CommandMetadata,
    CreateBillAction, MarkItemPrintedAction, OrderAction, RecordPaymentAction, SetItemStatusAction,
    SubmitOrderAction, VoidBillAction, VoidItemAction,
};
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use shared::models::TableState;
use shared::order::{
    Actor, Bill, BillPaidStatus, EventPayload, ItemRequest, Order, OrderChannel, OrderEvent,
    OrderItem, OrderItemStatus, PaymentInput, TableSession,
};
use shared::OrderError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// One order plus the bills issued against it, guarded as a unit.
///
/// Bills live with their order because settlement touches both sides
/// atomically: the final payment flips the bill to PAID and the order to
/// PAID under the same lock.
#[derive(Debug, Clone)]
pub(crate) struct OrderCell {
    pub order: Order,
    pub bills: Vec<Bill>,
}

impl OrderCell {
    pub fn new(order: Order) -> Self {
        Self {
            order,
            bills: Vec::new(),
        }
    }

    /// The single non-void bill, if one exists.
    pub fn active_bill(&self) -> Option<&Bill> {
        self.bills
            .iter()
            .find(|b| b.paid_status != BillPaidStatus::Void)
    }

    pub fn bill(&self, bill_id: &str) -> Option<&Bill> {
        self.bills.iter().find(|b| b.id == bill_id)
    }

    pub fn bill_mut(&mut self, bill_id: &str) -> Option<&mut Bill> {
        self.bills.iter_mut().find(|b| b.id == bill_id)
    }
}

/// Order/billing consistency engine
pub struct OrderEngine {
    config: EngineConfig,
    catalog: Arc<dyn Catalog>,
    /// Keyed lock registry; one mutex per order identity
    orders: DashMap<String, Arc<Mutex<OrderCell>>>,
    /// bill_id -> order_id
    bill_index: DashMap<String, String>,
    /// table_id -> state
    tables: DashMap<String, TableState>,
    /// session_id -> session (open and closed)
    sessions: DashMap<String, TableSession>,
    /// table_id -> open session_id; at most one entry per table
    open_by_table: DashMap<String, String>,
    /// Global event sequence
    sequence: AtomicU64,
    /// Receipt counter feeding bill receipt numbers
    receipt_count: AtomicU64,
    event_tx: broadcast::Sender<OrderEvent>,
    audit: AuditService,
}

impl std::fmt::Debug for OrderEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderEngine")
            .field("orders", &self.orders.len())
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

impl OrderEngine {
    /// Create the engine and the audit channel receiver.
    ///
    /// Spawn an [`crate::audit::AuditWorker`] on the receiver to persist
    /// audit entries; dropping it instead degrades audit to log lines
    /// without affecting business operations.
    pub fn new(config: EngineConfig, catalog: Arc<dyn Catalog>) -> (Self, mpsc::Receiver<AuditEntry>) {
        let (event_tx, _) = broadcast::channel(config.event_capacity);
        let (audit, audit_rx) = AuditService::new(config.audit_buffer);
        let engine = Self {
            config,
            catalog,
            orders: DashMap::new(),
            bill_index: DashMap::new(),
            tables: DashMap::new(),
            sessions: DashMap::new(),
            open_by_table: DashMap::new(),
            sequence: AtomicU64::new(0),
            receipt_count: AtomicU64::new(0),
            event_tx,
            audit,
        };
        (engine, audit_rx)
    }

    /// Subscribe to the domain event broadcast.
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.event_tx.subscribe()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // Order lifecycle
    // ========================================================================

    /// Create a new OPEN order with the configured charge rates.
    pub fn open_order(
        &self,
        table_id: Option<String>,
        channel: OrderChannel,
        guest_count: i32,
        actor: &Actor,
    ) -> Result<Order, OrderError> {
        if guest_count <= 0 {
            return Err(OrderError::InvalidOperation(format!(
                "guest count must be positive, got {guest_count}"
            )));
        }

        let mut order = Order::new(
            table_id.clone(),
            channel,
            guest_count,
            self.config.service_charge_pct,
            self.config.vat_pct,
            actor.id.clone(),
        );
        money::recalculate_totals(&mut order);

        let event = OrderEvent::new(
            actor,
            EventPayload::OrderOpened {
                order_id: order.id.clone(),
                table_id,
                channel,
            },
        );

        self.orders
            .insert(order.id.clone(), Arc::new(Mutex::new(OrderCell::new(order.clone()))));
        tracing::info!(order_id = %order.id, "Order opened");
        self.dispatch(vec![event]);
        Ok(order)
    }

    /// Append an item; the catalog snapshot is resolved before the lock.
    pub fn add_item(
        &self,
        order_id: &str,
        request: ItemRequest,
        actor: &Actor,
    ) -> Result<OrderItem, OrderError> {
        money::validate_item_request(&request)?;

        let snapshot = self
            .catalog
            .menu_item(&request.menu_item_id)
            .map_err(|e| {
                tracing::warn!(menu_item_id = %request.menu_item_id, error = %e, "Catalog refused lookup");
                OrderError::MenuItemUnavailable(request.menu_item_id.clone())
            })?;

        let meta = CommandMetadata::new(actor.clone());
        let action = AddItemAction { snapshot, request };
        self.with_order(order_id, |cell| {
            let events = action.execute(cell, &meta)?;
            let item = events
                .iter()
                .find_map(|e| match &e.payload {
                    EventPayload::ItemAdded { item, .. } => Some(item.clone()),
                    _ => None,
                })
                .ok_or_else(|| {
                    OrderError::InvalidOperation("item event missing after add".to_string())
                })?;
            Ok((events, item))
        })
    }

    pub fn set_item_status(
        &self,
        order_id: &str,
        item_id: &str,
        new_status: OrderItemStatus,
        actor: &Actor,
    ) -> Result<(), OrderError> {
        let action = SetItemStatusAction {
            item_id: item_id.to_string(),
            new_status,
        };
        self.run(order_id, action, actor)
    }

    pub fn void_item(
        &self,
        order_id: &str,
        item_id: &str,
        reason: &str,
        actor: &Actor,
    ) -> Result<(), OrderError> {
        let action = VoidItemAction {
            item_id: item_id.to_string(),
            reason: reason.to_string(),
        };
        self.run(order_id, action, actor)
    }

    pub fn mark_item_printed(
        &self,
        order_id: &str,
        item_id: &str,
        actor: &Actor,
    ) -> Result<(), OrderError> {
        let action = MarkItemPrintedAction {
            item_id: item_id.to_string(),
        };
        self.run(order_id, action, actor)
    }

    pub fn submit(&self, order_id: &str, actor: &Actor) -> Result<(), OrderError> {
        self.run(order_id, SubmitOrderAction, actor)
    }

    pub fn apply_discount(
        &self,
        order_id: &str,
        amount: f64,
        actor: &Actor,
    ) -> Result<(), OrderError> {
        self.run(order_id, ApplyDiscountAction { amount }, actor)
    }

    pub fn add_order_note(
        &self,
        order_id: &str,
        note: &str,
        actor: &Actor,
    ) -> Result<(), OrderError> {
        self.run(
            order_id,
            AddOrderNoteAction {
                note: note.to_string(),
            },
            actor,
        )
    }

    pub fn cancel(&self, order_id: &str, reason: &str, actor: &Actor) -> Result<(), OrderError> {
        self.run(
            order_id,
            CancelOrderAction {
                reason: reason.to_string(),
            },
            actor,
        )
    }

    // ========================================================================
    // Billing
    // ========================================================================

    /// Snapshot a SERVED order into a new UNPAID bill.
    pub fn create_bill(&self, order_id: &str, actor: &Actor) -> Result<Bill, OrderError> {
        let action = CreateBillAction {
            receipt_number: self.next_receipt_number(),
        };
        let meta = CommandMetadata::new(actor.clone());
        let bill = self.with_order(order_id, |cell| {
            let events = action.execute(cell, &meta)?;
            let bill = cell
                .active_bill()
                .cloned()
                .ok_or_else(|| {
                    OrderError::InvalidOperation("bill missing after creation".to_string())
                })?;
            Ok((events, bill))
        })?;

        self.bill_index.insert(bill.id.clone(), order_id.to_string());
        tracing::info!(
            order_id = %order_id,
            bill_id = %bill.id,
            receipt = %bill.receipt_number,
            grand_total = bill.grand_total,
            "Bill created"
        );
        Ok(bill)
    }

    /// Record a payment against a bill; settles bill and order when the
    /// running sum covers the grand total.
    pub fn record_payment(
        &self,
        bill_id: &str,
        input: PaymentInput,
        actor: &Actor,
    ) -> Result<Bill, OrderError> {
        money::validate_payment(&input)?;

        let order_id = self
            .bill_index
            .get(bill_id)
            .map(|r| r.value().clone())
            .ok_or_else(|| OrderError::BillNotFound(bill_id.to_string()))?;

        let action = RecordPaymentAction {
            bill_id: bill_id.to_string(),
            input,
            overpayment_tolerance: self.config.overpayment_tolerance,
        };
        let meta = CommandMetadata::new(actor.clone());
        let bill_id_owned = bill_id.to_string();
        self.with_order(&order_id, move |cell| {
            let events = action.execute(cell, &meta)?;
            let bill = cell
                .bill(&bill_id_owned)
                .cloned()
                .ok_or_else(|| OrderError::BillNotFound(bill_id_owned.clone()))?;
            Ok((events, bill))
        })
    }

    /// Void an UNPAID bill, reverting the order to SERVED.
    pub fn void_bill(&self, bill_id: &str, reason: &str, actor: &Actor) -> Result<(), OrderError> {
        let order_id = self
            .bill_index
            .get(bill_id)
            .map(|r| r.value().clone())
            .ok_or_else(|| OrderError::BillNotFound(bill_id.to_string()))?;

        let action = VoidBillAction {
            bill_id: bill_id.to_string(),
            reason: reason.to_string(),
        };
        self.run(&order_id, action, actor)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn get_order(&self, order_id: &str) -> Result<Order, OrderError> {
        self.with_order_read(order_id, |cell| cell.order.clone())
    }

    pub fn get_bill(&self, bill_id: &str) -> Result<Bill, OrderError> {
        let order_id = self
            .bill_index
            .get(bill_id)
            .map(|r| r.value().clone())
            .ok_or_else(|| OrderError::BillNotFound(bill_id.to_string()))?;
        let wanted = bill_id.to_string();
        self.with_order_read(&order_id, move |cell| cell.bill(&wanted).cloned())?
            .ok_or_else(|| OrderError::BillNotFound(bill_id.to_string()))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Run an action whose only result is its events.
    fn run<A: OrderAction>(
        &self,
        order_id: &str,
        action: A,
        actor: &Actor,
    ) -> Result<(), OrderError> {
        let meta = CommandMetadata::new(actor.clone());
        self.with_order(order_id, |cell| Ok((action.execute(cell, &meta)?, ())))
    }

    /// Acquire the per-order lock, execute, then dispatch events outside it.
    fn with_order<T>(
        &self,
        order_id: &str,
        f: impl FnOnce(&mut OrderCell) -> Result<(Vec<OrderEvent>, T), OrderError>,
    ) -> Result<T, OrderError> {
        let cell = self
            .orders
            .get(order_id)
            .map(|r| r.value().clone())
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        let mut guard = cell
            .try_lock_for(self.config.lock_timeout)
            .ok_or_else(|| OrderError::OrderBusy(order_id.to_string()))?;

        let (mut events, out) = f(&mut guard)?;
        // Sequence is stamped while serialized so per-order event order is
        // strictly increasing.
        for ev in &mut events {
            ev.sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        }
        drop(guard);

        self.broadcast(events);
        Ok(out)
    }

    /// Read-only access under the same bounded lock discipline.
    fn with_order_read<T>(
        &self,
        order_id: &str,
        f: impl FnOnce(&OrderCell) -> T,
    ) -> Result<T, OrderError> {
        let cell = self
            .orders
            .get(order_id)
            .map(|r| r.value().clone())
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        let guard = cell
            .try_lock_for(self.config.lock_timeout)
            .ok_or_else(|| OrderError::OrderBusy(order_id.to_string()))?;
        Ok(f(&guard))
    }

    /// Stamp and dispatch events that need no order lock (sessions, opens).
    fn dispatch(&self, mut events: Vec<OrderEvent>) {
        for ev in &mut events {
            ev.sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        }
        self.broadcast(events);
    }

    /// Broadcast events and emit audit entries. Never called under a lock;
    /// failures are logged and never propagate.
    fn broadcast(&self, events: Vec<OrderEvent>) {
        for ev in events {
            self.audit.emit(AuditEntry::from_event(&ev));
            // Send fails only when nobody subscribes; that is fine.
            let _ = self.event_tx.send(ev);
        }
    }

    /// Generate the next receipt number, e.g. FAC2026080710001.
    fn next_receipt_number(&self) -> String {
        let count = self.receipt_count.fetch_add(1, Ordering::SeqCst) + 1;
        let date_str = Utc::now().format("%Y%m%d").to_string();
        format!("FAC{}{}", date_str, 10000 + count)
    }
}
