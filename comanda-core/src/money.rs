//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary fields are stored as `f64` (two-decimal amounts) but every
//! computation runs in `Decimal` and is rounded exactly once per field with
//! banker's rounding (round-half-to-even, 2 dp). Intermediate values are
//! never re-rounded.

use rust_decimal::prelude::*;
use shared::order::{Bill, ItemRequest, Order, OrderItem, PaymentInput};
use shared::OrderError;

/// Monetary precision (2 decimal places)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price per item
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per item
const MAX_QUANTITY: i32 = 9999;
/// Maximum allowed payment amount
const MAX_PAYMENT_AMOUNT: f64 = 1_000_000.0;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), OrderError> {
    if !value.is_finite() {
        return Err(OrderError::InvalidOperation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded once to 2 decimal
/// places with banker's rounding.
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven)
        .to_f64()
        .unwrap_or_default()
}

/// Round a Decimal to monetary precision (banker's rounding).
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven)
}

/// Validate an ItemRequest before any state is touched.
pub fn validate_item_request(req: &ItemRequest) -> Result<(), OrderError> {
    if req.quantity <= 0 {
        return Err(OrderError::InvalidQuantity(req.quantity));
    }
    if req.quantity > MAX_QUANTITY {
        return Err(OrderError::InvalidOperation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, req.quantity
        )));
    }
    Ok(())
}

/// Validate catalog snapshot prices before they are frozen into an item.
pub fn validate_snapshot_price(price: f64, surcharge: f64) -> Result<(), OrderError> {
    require_finite(price, "price")?;
    if price < 0.0 {
        return Err(OrderError::InvalidOperation(format!(
            "price must be non-negative, got {}",
            price
        )));
    }
    if price > MAX_PRICE {
        return Err(OrderError::InvalidOperation(format!(
            "price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, price
        )));
    }
    require_finite(surcharge, "option surcharge")?;
    if surcharge < 0.0 || surcharge > MAX_PRICE {
        return Err(OrderError::InvalidOperation(format!(
            "option surcharge out of range, got {}",
            surcharge
        )));
    }
    Ok(())
}

/// Validate a PaymentInput before processing.
pub fn validate_payment(payment: &PaymentInput) -> Result<(), OrderError> {
    require_finite(payment.amount, "payment amount")?;
    if payment.amount <= 0.0 {
        return Err(OrderError::NonPositiveAmount(payment.amount));
    }
    if payment.amount > MAX_PAYMENT_AMOUNT {
        return Err(OrderError::InvalidOperation(format!(
            "payment amount exceeds maximum allowed ({}), got {}",
            MAX_PAYMENT_AMOUNT, payment.amount
        )));
    }
    if let Some(t) = payment.tendered {
        require_finite(t, "tendered")?;
        if t < 0.0 {
            return Err(OrderError::InvalidOperation(
                "tendered amount must be non-negative".to_string(),
            ));
        }
    }
    Ok(())
}

/// Validate a discount amount against the order's current subtotal.
pub fn validate_discount(amount: f64, subtotal: f64) -> Result<(), OrderError> {
    require_finite(amount, "discount amount")?;
    if amount < 0.0 {
        return Err(OrderError::InvalidOperation(format!(
            "discount must be non-negative, got {}",
            amount
        )));
    }
    if to_decimal(amount) > to_decimal(subtotal) {
        return Err(OrderError::DiscountExceedsSubtotal { amount, subtotal });
    }
    Ok(())
}

/// Line total for one item: `(unit_price + option_surcharge) * quantity`.
///
/// Computed from the immutable snapshot only; the live catalog never
/// participates.
pub fn line_total(item: &OrderItem) -> Decimal {
    let per_unit = to_decimal(item.unit_price) + to_decimal(item.option_surcharge);
    round_money(per_unit * Decimal::from(item.quantity))
}

/// Recalculate order totals from the non-void item set.
///
/// - `subtotal` = Σ non-void line totals
/// - `service_charge_amount` = round(subtotal × service_charge_pct)
/// - `vat_amount` = round((subtotal + service_charge_amount) × vat_pct)
/// - `grand_total` = subtotal + service_charge_amount + vat_amount − discount_amount
///
/// Each field is rounded once; sums of already-rounded fields are exact.
/// Stored item `line_total`s are synced in the same pass. Runs after every
/// item addition/status change/void and after discount adjustment.
pub fn recalculate_totals(order: &mut Order) {
    let mut subtotal = Decimal::ZERO;

    for item in &mut order.items {
        let lt = line_total(item);
        item.line_total = to_f64(lt);
        if !item.is_void() {
            subtotal += lt;
        }
    }

    let service_charge = round_money(subtotal * to_decimal(order.service_charge_pct));
    let vat = round_money((subtotal + service_charge) * to_decimal(order.vat_pct));
    let discount = to_decimal(order.discount_amount);
    let grand_total = subtotal + service_charge + vat - discount;

    order.subtotal = to_f64(subtotal);
    order.service_charge_amount = to_f64(service_charge);
    order.vat_amount = to_f64(vat);
    order.grand_total = to_f64(grand_total);
    order.updated_at = shared::util::now_millis();
}

/// Sum of a bill's payment amounts with precise arithmetic.
///
/// Payments are append-only and never voided individually in this engine;
/// a bill that goes VOID discards its payment progress with it.
pub fn sum_payments(bill: &Bill) -> Decimal {
    bill.payments.iter().map(|p| to_decimal(p.amount)).sum()
}

/// Remaining amount due on a bill.
pub fn remaining_due(bill: &Bill) -> Decimal {
    (to_decimal(bill.grand_total) - sum_payments(bill)).max(Decimal::ZERO)
}
