use super::*;
use crate::audit::{AuditAction, AuditWorker, MemoryAuditSink};
use shared::models::TableState;
use shared::order::{BillPaidStatus, OrderStatus, PaymentInput, PaymentMethod};
use shared::OrderError;

#[test]
fn test_full_service_cycle() {
    let engine = create_test_engine();

    // Seat the party
    let session = engine.open_session("table-7", &actor()).unwrap();
    assert_eq!(engine.table_state("table-7"), TableState::Occupied);

    // Order and serve
    let order = engine
        .open_order(Some("table-7".to_string()), OrderChannel::DineIn, 2, &actor())
        .unwrap();
    engine.attach_order(&session.id, &order.id, &actor()).unwrap();
    engine
        .add_item(&order.id, ItemRequest::new("m-steak", 2), &actor())
        .unwrap();
    engine
        .add_item(&order.id, ItemRequest::new("m-salad", 1), &actor())
        .unwrap();
    engine.submit(&order.id, &actor()).unwrap();
    serve_all(&engine, &order.id);

    // Bill and settle with a split payment
    let bill = engine.create_bill(&order.id, &actor()).unwrap();
    assert_eq!(bill.grand_total, 294.25);
    assert!(bill.receipt_number.starts_with("FAC"));

    engine
        .record_payment(&bill.id, PaymentInput::new(PaymentMethod::Card, 150.0), &actor())
        .unwrap();
    let bill = engine
        .record_payment(&bill.id, PaymentInput::new(PaymentMethod::Cash, 144.25), &actor())
        .unwrap();

    assert_eq!(bill.paid_status, BillPaidStatus::Paid);
    assert_eq!(engine.get_order(&order.id).unwrap().status, OrderStatus::Paid);

    // Clear the table
    engine.close_session(&session.id, &actor()).unwrap();
    assert_eq!(engine.table_state("table-7"), TableState::Cleaning);
    engine.release_table("table-7", &actor()).unwrap();
    assert_eq!(engine.table_state("table-7"), TableState::Free);
}

#[test]
fn test_billed_order_blocks_item_mutation() {
    let engine = create_test_engine();
    let order = served_order(&engine, &[("m-steak", 1)]);
    let bill = engine.create_bill(&order.id, &actor()).unwrap();

    // Any further item mutation is rejected, so the bill snapshot can
    // never drift.
    let add = engine.add_item(&order.id, ItemRequest::new("m-salad", 1), &actor());
    assert!(matches!(add, Err(OrderError::OrderNotMutable { .. })));

    let discount = engine.apply_discount(&order.id, 5.0, &actor());
    assert!(matches!(discount, Err(OrderError::OrderNotMutable { .. })));

    assert_eq!(engine.get_bill(&bill.id).unwrap().grand_total, bill.grand_total);
}

#[test]
fn test_void_bill_then_corrected_bill() {
    let engine = create_test_engine();
    let order = served_order(&engine, &[("m-steak", 1)]);

    let first = engine.create_bill(&order.id, &actor()).unwrap();
    engine
        .void_bill(&first.id, "forgot the discount", &actor())
        .unwrap();
    assert_eq!(
        engine.get_order(&order.id).unwrap().status,
        OrderStatus::Served
    );

    // Order is mutable again; apply the discount and re-bill.
    engine.apply_discount(&order.id, 10.0, &actor()).unwrap();
    let second = engine.create_bill(&order.id, &actor()).unwrap();

    assert_ne!(first.id, second.id);
    assert_ne!(first.receipt_number, second.receipt_number);
    assert_eq!(second.discount_amount, 10.0);
    assert!(second.grand_total < first.grand_total);

    // The voided bill's snapshot is untouched by the later mutation.
    let first_after = engine.get_bill(&first.id).unwrap();
    assert_eq!(first_after.grand_total, first.grand_total);
    assert_eq!(first_after.discount_amount, 0.0);
    assert_eq!(first_after.paid_status, BillPaidStatus::Void);
}

#[test]
fn test_second_bill_rejected_while_active() {
    let engine = create_test_engine();
    let order = served_order(&engine, &[("m-steak", 1)]);
    let bill = engine.create_bill(&order.id, &actor()).unwrap();

    let result = engine.create_bill(&order.id, &actor());
    assert_eq!(
        result,
        Err(OrderError::OrderNotReady {
            order_id: order.id.clone(),
            status: OrderStatus::Billed,
        })
    );
    assert_eq!(engine.get_bill(&bill.id).unwrap().paid_status, BillPaidStatus::Unpaid);
}

#[test]
fn test_cancelled_order_closes_session() {
    let engine = create_test_engine();
    let session = engine.open_session("table-3", &actor()).unwrap();
    let order = open_with_items(&engine, &[("m-salad", 1)]);
    engine.attach_order(&session.id, &order.id, &actor()).unwrap();
    engine.submit(&order.id, &actor()).unwrap();

    // Not settled yet: close must fail
    let early = engine.close_session(&session.id, &actor());
    assert_eq!(
        early,
        Err(OrderError::SessionStillActive {
            session_id: session.id.clone(),
            status: OrderStatus::Submitted,
        })
    );

    engine.cancel(&order.id, "kitchen closed", &actor()).unwrap();
    engine.close_session(&session.id, &actor()).unwrap();

    let closed = engine.get_session(&session.id).unwrap();
    assert!(!closed.is_open());
}

#[test]
fn test_session_without_order_closes_freely() {
    let engine = create_test_engine();
    let session = engine.open_session("table-9", &actor()).unwrap();
    engine.close_session(&session.id, &actor()).unwrap();
    assert_eq!(engine.table_state("table-9"), TableState::Cleaning);
}

#[test]
fn test_table_reopens_after_release() {
    let engine = create_test_engine();
    let session = engine.open_session("table-4", &actor()).unwrap();
    engine.close_session(&session.id, &actor()).unwrap();
    engine.release_table("table-4", &actor()).unwrap();

    // A fresh party can be seated now
    let next = engine.open_session("table-4", &actor()).unwrap();
    assert_ne!(session.id, next.id);
}

#[tokio::test]
async fn test_audit_trail_reaches_sink() {
    let (engine, audit_rx) = OrderEngine::new(test_config(), Arc::new(test_catalog()));
    let sink = Arc::new(MemoryAuditSink::new());
    let worker = tokio::spawn(AuditWorker::new(sink.clone()).run(audit_rx));

    let order = served_order(&engine, &[("m-steak", 1)]);
    let bill = engine.create_bill(&order.id, &actor()).unwrap();
    engine
        .record_payment(
            &bill.id,
            PaymentInput::new(PaymentMethod::Card, bill.grand_total),
            &actor(),
        )
        .unwrap();

    // Dropping the engine closes the audit channel; the worker drains and
    // exits.
    drop(engine);
    worker.await.unwrap();

    let actions: Vec<AuditAction> = sink.entries().iter().map(|e| e.action).collect();
    assert!(actions.contains(&AuditAction::OrderOpened));
    assert!(actions.contains(&AuditAction::BillCreated));
    assert!(actions.contains(&AuditAction::PaymentRecorded));
    assert!(actions.contains(&AuditAction::BillPaid));
}

#[test]
fn test_audit_unavailability_never_fails_operations() {
    // create_test_engine drops the audit receiver immediately; every
    // operation must still succeed.
    let engine = create_test_engine();
    let order = served_order(&engine, &[("m-steak", 1)]);
    let bill = engine.create_bill(&order.id, &actor()).unwrap();
    let paid = engine
        .record_payment(
            &bill.id,
            PaymentInput::new(PaymentMethod::Card, bill.grand_total),
            &actor(),
        )
        .unwrap();
    assert_eq!(paid.paid_status, BillPaidStatus::Paid);
}
