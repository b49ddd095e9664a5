//! Catalog snapshot types
//!
//! The catalog collaborator is read-only from the engine's perspective: a
//! [`MenuSnapshot`] is looked up once at item-add time and its price data is
//! copied into the order item. Later catalog edits never leak into existing
//! orders.

use serde::{Deserialize, Serialize};

/// Point-in-time view of one menu item, as returned by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuSnapshot {
    pub id: String,
    pub name: String,
    /// Base price per unit
    pub price: f64,
    /// Selectable options with their per-unit surcharges
    #[serde(default)]
    pub options: Vec<MenuOption>,
    pub is_available: bool,
}

/// One selectable option row in a menu item's options schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuOption {
    /// Attribute group, e.g. "Size"
    pub attribute: String,
    /// Choice within the group, e.g. "Large"
    pub choice: String,
    /// Per-unit surcharge for this choice (may be zero)
    #[serde(default)]
    pub surcharge: f64,
}

impl MenuSnapshot {
    /// Look up an option row by attribute group and choice name.
    pub fn find_option(&self, attribute: &str, choice: &str) -> Option<&MenuOption> {
        self.options
            .iter()
            .find(|o| o.attribute == attribute && o.choice == choice)
    }
}
