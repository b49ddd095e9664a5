//! AddItem action
//!
//! Appends a PENDING line item to a mutable order, freezing the catalog
//! snapshot (name, price, option surcharges) into the item.

use super::{refresh_after_item_mutation, CommandMetadata, OrderAction};
use crate::engine::OrderCell;
use crate::money;
use rust_decimal::Decimal;
use shared::models::MenuSnapshot;
use shared::order::{EventPayload, ItemRequest, OptionChoice, OrderEvent, OrderItem};
use shared::OrderError;

/// AddItem action
#[derive(Debug, Clone)]
pub(crate) struct AddItemAction {
    /// Catalog snapshot resolved before the lock was taken
    pub snapshot: MenuSnapshot,
    pub request: ItemRequest,
}

impl OrderAction for AddItemAction {
    fn execute(
        &self,
        cell: &mut OrderCell,
        meta: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        // 1. Input validation, before any state is touched
        money::validate_item_request(&self.request)?;

        // 2. Order must still accept items
        if !cell.order.is_mutable() {
            return Err(OrderError::OrderNotMutable {
                order_id: cell.order.id.clone(),
                status: cell.order.status,
            });
        }

        // 3. Resolve selected options against the snapshot's schema
        let mut selected = Vec::with_capacity(self.request.options.len());
        let mut surcharge = Decimal::ZERO;
        for sel in &self.request.options {
            let opt = self
                .snapshot
                .find_option(&sel.attribute, &sel.choice)
                .ok_or_else(|| {
                    OrderError::InvalidOperation(format!(
                        "option {}/{} is not in the schema of {}",
                        sel.attribute, sel.choice, self.snapshot.id
                    ))
                })?;
            surcharge += money::to_decimal(opt.surcharge);
            selected.push(OptionChoice {
                attribute: opt.attribute.clone(),
                choice: opt.choice.clone(),
                surcharge: opt.surcharge,
            });
        }
        let option_surcharge = money::to_f64(surcharge);
        money::validate_snapshot_price(self.snapshot.price, option_surcharge)?;

        // 4. Freeze the snapshot into a new PENDING item
        let mut item = OrderItem::from_snapshot(
            self.snapshot.id.clone(),
            self.snapshot.name.clone(),
            self.snapshot.price,
            option_surcharge,
            selected,
            self.request.quantity,
            self.request.note.clone(),
        );
        item.line_total = money::to_f64(money::line_total(&item));
        cell.order.items.push(item.clone());

        // 5. Recompute totals and derived status
        let mut events = vec![OrderEvent::new(
            &meta.actor,
            EventPayload::ItemAdded {
                order_id: cell.order.id.clone(),
                item,
            },
        )];
        if let Some(ev) = refresh_after_item_mutation(cell, meta) {
            events.push(ev);
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use shared::models::MenuOption;
    use shared::order::{OptionSelect, OrderStatus};

    #[test]
    fn test_add_item_computes_line_total() {
        let mut cell = open_cell();
        let action = AddItemAction {
            snapshot: menu_snapshot("m-1", "Burger", 8.50),
            request: ItemRequest::new("m-1", 2),
        };

        let events = action.execute(&mut cell, &test_meta()).unwrap();

        assert_eq!(cell.order.items.len(), 1);
        assert_eq!(cell.order.items[0].line_total, 17.0);
        assert_eq!(cell.order.subtotal, 17.0);
        assert!(matches!(
            events[0].payload,
            EventPayload::ItemAdded { .. }
        ));
    }

    #[test]
    fn test_add_item_with_option_surcharge() {
        let mut cell = open_cell();
        let mut snapshot = menu_snapshot("m-1", "Pizza", 12.0);
        snapshot.options.push(MenuOption {
            attribute: "Size".to_string(),
            choice: "Large".to_string(),
            surcharge: 3.0,
        });
        let action = AddItemAction {
            snapshot,
            request: ItemRequest::new("m-1", 1).with_options(vec![OptionSelect {
                attribute: "Size".to_string(),
                choice: "Large".to_string(),
            }]),
        };

        action.execute(&mut cell, &test_meta()).unwrap();

        let item = &cell.order.items[0];
        assert_eq!(item.option_surcharge, 3.0);
        assert_eq!(item.line_total, 15.0);
        assert_eq!(item.selected_options.len(), 1);
    }

    #[test]
    fn test_add_item_unknown_option_rejected() {
        let mut cell = open_cell();
        let action = AddItemAction {
            snapshot: menu_snapshot("m-1", "Burger", 8.50),
            request: ItemRequest::new("m-1", 1).with_options(vec![OptionSelect {
                attribute: "Size".to_string(),
                choice: "Large".to_string(),
            }]),
        };

        let result = action.execute(&mut cell, &test_meta());
        assert!(matches!(result, Err(OrderError::InvalidOperation(_))));
        assert!(cell.order.items.is_empty(), "no partial effect");
    }

    #[test]
    fn test_add_item_zero_quantity_rejected() {
        let mut cell = open_cell();
        let action = AddItemAction {
            snapshot: menu_snapshot("m-1", "Burger", 8.50),
            request: ItemRequest::new("m-1", 0),
        };

        assert_eq!(
            action.execute(&mut cell, &test_meta()),
            Err(OrderError::InvalidQuantity(0))
        );
    }

    #[test]
    fn test_add_item_blocked_once_billed() {
        let (mut cell, _bill) = billed_cell(&[(10.0, 1)]);
        let action = AddItemAction {
            snapshot: menu_snapshot("m-2", "Cola", 2.50),
            request: ItemRequest::new("m-2", 1),
        };

        let result = action.execute(&mut cell, &test_meta());
        assert!(matches!(
            result,
            Err(OrderError::OrderNotMutable {
                status: OrderStatus::Billed,
                ..
            })
        ));
        assert_eq!(cell.order.items.len(), 1, "ledger unchanged");
    }

    #[test]
    fn test_add_item_to_submitted_order_rederives_status() {
        // A fresh PENDING item keeps a submitted order in SUBMITTED
        let mut cell = submitted_cell(&[(10.0, 1)]);
        let action = AddItemAction {
            snapshot: menu_snapshot("m-9", "Cola", 2.50),
            request: ItemRequest::new("m-9", 1),
        };

        action.execute(&mut cell, &test_meta()).unwrap();
        assert_eq!(cell.order.status, OrderStatus::Submitted);
        assert_eq!(cell.order.subtotal, 12.50);
    }
}
