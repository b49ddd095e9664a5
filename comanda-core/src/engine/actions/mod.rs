//! Order action implementations
//!
//! Each action implements the [`OrderAction`] trait and handles one engine
//! operation. Actions run with the per-order lock held: they validate
//! against the transition tables, mutate the [`OrderCell`], and return the
//! domain events describing what happened. They never touch collaborators;
//! catalog lookups happen before the lock, audit/broadcast after.

use crate::engine::OrderCell;
use shared::order::{Actor, EventPayload, OrderEvent};
use shared::util::now_millis;
use shared::OrderError;

mod add_item;
mod add_order_note;
mod apply_discount;
mod cancel_order;
mod create_bill;
mod mark_item_printed;
mod record_payment;
mod set_item_status;
mod submit_order;
mod void_bill;
mod void_item;

pub(crate) use add_item::AddItemAction;
pub(crate) use add_order_note::AddOrderNoteAction;
pub(crate) use apply_discount::ApplyDiscountAction;
pub(crate) use cancel_order::CancelOrderAction;
pub(crate) use create_bill::CreateBillAction;
pub(crate) use mark_item_printed::MarkItemPrintedAction;
pub(crate) use record_payment::RecordPaymentAction;
pub(crate) use set_item_status::SetItemStatusAction;
pub(crate) use submit_order::SubmitOrderAction;
pub(crate) use void_bill::VoidBillAction;
pub(crate) use void_item::VoidItemAction;

/// Metadata attached to every mutation.
#[derive(Debug, Clone)]
pub(crate) struct CommandMetadata {
    pub actor: Actor,
    pub timestamp: i64,
}

impl CommandMetadata {
    pub fn new(actor: Actor) -> Self {
        Self {
            actor,
            timestamp: now_millis(),
        }
    }
}

/// One engine operation, executed under the per-order lock.
///
/// An `Err` return must leave the cell untouched (validate before mutate);
/// an `Ok` return carries the events to broadcast and audit once the lock
/// is released.
pub(crate) trait OrderAction {
    fn execute(
        &self,
        cell: &mut OrderCell,
        meta: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError>;
}

/// Recompute totals and re-derive the readiness status after an item
/// mutation.
///
/// Returns the status-change event when the derived band moves. SERVED and
/// beyond are never regressed from here; OPEN orders are not yet in the
/// kitchen, so only totals change for them.
pub(crate) fn refresh_after_item_mutation(
    cell: &mut OrderCell,
    meta: &CommandMetadata,
) -> Option<OrderEvent> {
    crate::money::recalculate_totals(&mut cell.order);

    if !cell.order.status.is_derived_band() {
        return None;
    }
    let from = cell.order.status;
    let to = cell.order.derived_readiness();
    if to == from {
        return None;
    }
    cell.order.status = to;
    Some(OrderEvent::new(
        &meta.actor,
        EventPayload::OrderStatusChanged {
            order_id: cell.order.id.clone(),
            from,
            to,
        },
    ))
}
