//! Catalog collaborator
//!
//! The engine consumes the menu catalog through a read-only snapshot
//! lookup at item-add time. Whatever the backing store is, the engine only
//! ever sees a [`MenuSnapshot`]; its failure modes collapse into
//! `MenuItemUnavailable` at the operation boundary.

use shared::models::MenuSnapshot;
use std::collections::HashMap;
use thiserror::Error;

/// Catalog lookup errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("menu item not found: {0}")]
    NotFound(String),

    #[error("menu item not available: {0}")]
    Unavailable(String),

    #[error("catalog backend error: {0}")]
    Backend(String),
}

/// Read-only menu catalog lookup.
pub trait Catalog: Send + Sync {
    fn menu_item(&self, id: &str) -> Result<MenuSnapshot, CatalogError>;
}

/// In-memory catalog, for tests and simple embeddings.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    items: HashMap<String, MenuSnapshot>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = MenuSnapshot>) -> Self {
        Self {
            items: items.into_iter().map(|i| (i.id.clone(), i)).collect(),
        }
    }

    pub fn insert(&mut self, item: MenuSnapshot) {
        self.items.insert(item.id.clone(), item);
    }
}

impl Catalog for StaticCatalog {
    fn menu_item(&self, id: &str) -> Result<MenuSnapshot, CatalogError> {
        let item = self
            .items
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        if !item.is_available {
            return Err(CatalogError::Unavailable(id.to_string()));
        }
        Ok(item.clone())
    }
}
