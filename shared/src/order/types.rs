//! Order item and input types

use super::status::OrderItemStatus;
use crate::util::{new_id, now_millis};
use serde::{Deserialize, Serialize};

/// Opaque actor identity supplied by the identity collaborator.
///
/// The engine attaches it to created_by/received_by fields and audit
/// records; no role-based behavior lives in the core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    /// Name snapshot for audit display
    pub name: String,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One selected option on an item, with the surcharge captured from the
/// catalog snapshot at add time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionChoice {
    pub attribute: String,
    pub choice: String,
    /// Per-unit surcharge frozen at add time
    pub surcharge: f64,
}

/// Option selection input - resolved against the catalog's options schema
/// when the item is added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionSelect {
    pub attribute: String,
    pub choice: String,
}

/// Request to add one line item to an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRequest {
    pub menu_item_id: String,
    pub quantity: i32,
    #[serde(default)]
    pub options: Vec<OptionSelect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ItemRequest {
    pub fn new(menu_item_id: impl Into<String>, quantity: i32) -> Self {
        Self {
            menu_item_id: menu_item_id.into(),
            quantity,
            options: Vec::new(),
            note: None,
        }
    }

    pub fn with_options(mut self, options: Vec<OptionSelect>) -> Self {
        self.options = options;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Order line item
///
/// `name`, `unit_price`, `option_surcharge` and `selected_options` are a
/// snapshot captured when the item was added; they stay fixed even if the
/// catalog later changes. `line_total = (unit_price + option_surcharge) *
/// quantity`, computed once from the snapshot. VOID rows keep their data
/// for audit but are excluded from totals and readiness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub id: String,
    pub menu_item_id: String,
    /// Name snapshot at add time
    pub name: String,
    /// Base price per unit, snapshot at add time
    pub unit_price: f64,
    /// Sum of per-unit option surcharges, snapshot at add time
    pub option_surcharge: f64,
    pub selected_options: Vec<OptionChoice>,
    pub quantity: i32,
    pub status: OrderItemStatus,
    pub line_total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Kitchen ticket printed flag
    #[serde(default)]
    pub printed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub void_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl OrderItem {
    /// Build a PENDING item from catalog snapshot data.
    ///
    /// `line_total` starts at zero; the engine computes it with decimal
    /// arithmetic immediately after construction.
    pub fn from_snapshot(
        menu_item_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: f64,
        option_surcharge: f64,
        selected_options: Vec<OptionChoice>,
        quantity: i32,
        note: Option<String>,
    ) -> Self {
        let now = now_millis();
        Self {
            id: new_id(),
            menu_item_id: menu_item_id.into(),
            name: name.into(),
            unit_price,
            option_surcharge,
            selected_options,
            quantity,
            status: OrderItemStatus::Pending,
            line_total: 0.0,
            note,
            printed: false,
            void_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_void(&self) -> bool {
        self.status == OrderItemStatus::Void
    }
}
