//! Table sessions
//!
//! A session binds one physical table to its active order for a single
//! service cycle. At most one open session exists per table.

use crate::util::{new_id, now_millis};
use serde::{Deserialize, Serialize};

/// Table session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableSession {
    pub id: String,
    pub table_id: String,
    /// The order currently bound to this table, set by attach
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub opened_by: String,
    pub opened_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<i64>,
}

impl TableSession {
    pub fn open(table_id: impl Into<String>, opened_by: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            table_id: table_id.into(),
            order_id: None,
            opened_by: opened_by.into(),
            opened_at: now_millis(),
            closed_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}
