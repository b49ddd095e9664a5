use super::*;
use crate::catalog::StaticCatalog;
use shared::models::{MenuOption, MenuSnapshot};
use shared::order::{Actor, ItemRequest, Order, OrderChannel, OrderItemStatus};
use std::time::Duration;

mod test_flows;

fn test_config() -> EngineConfig {
    EngineConfig {
        lock_timeout: Duration::from_millis(100),
        audit_buffer: 64,
        event_capacity: 256,
        service_charge_pct: 0.10,
        vat_pct: 0.07,
        overpayment_tolerance: 0.0,
    }
}

fn test_catalog() -> StaticCatalog {
    StaticCatalog::with_items([
        MenuSnapshot {
            id: "m-steak".to_string(),
            name: "Entrecot".to_string(),
            price: 100.0,
            options: vec![],
            is_available: true,
        },
        MenuSnapshot {
            id: "m-salad".to_string(),
            name: "Ensalada Mixta".to_string(),
            price: 50.0,
            options: vec![],
            is_available: true,
        },
        MenuSnapshot {
            id: "m-pizza".to_string(),
            name: "Margherita".to_string(),
            price: 12.0,
            options: vec![MenuOption {
                attribute: "Size".to_string(),
                choice: "Large".to_string(),
                surcharge: 3.0,
            }],
            is_available: true,
        },
        MenuSnapshot {
            id: "m-seasonal".to_string(),
            name: "Gazpacho".to_string(),
            price: 6.0,
            options: vec![],
            is_available: false,
        },
    ])
}

fn create_test_engine() -> OrderEngine {
    // The audit receiver is dropped: emission degrades to log lines, which
    // must never affect business operations.
    let (engine, _audit_rx) = OrderEngine::new(test_config(), Arc::new(test_catalog()));
    engine
}

fn actor() -> Actor {
    Actor::new("op-1", "Test Operator")
}

/// Open an order and add the given (menu_item_id, qty) pairs.
fn open_with_items(engine: &OrderEngine, items: &[(&str, i32)]) -> Order {
    let order = engine
        .open_order(Some("table-1".to_string()), OrderChannel::DineIn, 2, &actor())
        .unwrap();
    for (menu_id, qty) in items {
        engine
            .add_item(&order.id, ItemRequest::new(*menu_id, *qty), &actor())
            .unwrap();
    }
    engine.get_order(&order.id).unwrap()
}

/// Walk every non-void item through COOKING -> READY -> SERVED.
fn serve_all(engine: &OrderEngine, order_id: &str) {
    let order = engine.get_order(order_id).unwrap();
    for item in order.items.iter().filter(|i| !i.is_void()) {
        for status in [
            OrderItemStatus::Cooking,
            OrderItemStatus::Ready,
            OrderItemStatus::Served,
        ] {
            engine
                .set_item_status(order_id, &item.id, status, &actor())
                .unwrap();
        }
    }
}

/// Submitted-and-served order ready for billing.
fn served_order(engine: &OrderEngine, items: &[(&str, i32)]) -> Order {
    let order = open_with_items(engine, items);
    engine.submit(&order.id, &actor()).unwrap();
    serve_all(engine, &order.id);
    engine.get_order(&order.id).unwrap()
}
