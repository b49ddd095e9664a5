//! Session/table binding
//!
//! A table session associates one physical table with its active order for
//! one service cycle. Per-table exclusion rides on the `open_by_table`
//! entry map: at most one open session per table at any time. Closing a
//! session requires the bound order to be settled (PAID) or CANCELLED and
//! leaves the table in CLEANING; `release_table` is the separate bus-staff
//! action that frees it.

use super::OrderEngine;
use dashmap::mapref::entry::Entry;
use shared::models::TableState;
use shared::order::{Actor, EventPayload, OrderEvent, TableSession};
use shared::util::now_millis;
use shared::OrderError;

impl OrderEngine {
    /// Open a session for a table, marking it OCCUPIED.
    pub fn open_session(&self, table_id: &str, actor: &Actor) -> Result<TableSession, OrderError> {
        let session = match self.open_by_table.entry(table_id.to_string()) {
            Entry::Occupied(_) => {
                return Err(OrderError::TableAlreadyOccupied(table_id.to_string()));
            }
            Entry::Vacant(vacant) => {
                let session = TableSession::open(table_id, actor.id.clone());
                vacant.insert(session.id.clone());
                session
            }
        };

        self.sessions.insert(session.id.clone(), session.clone());
        self.tables
            .insert(table_id.to_string(), TableState::Occupied);
        tracing::info!(table_id = %table_id, session_id = %session.id, "Session opened");

        self.dispatch(vec![OrderEvent::new(
            actor,
            EventPayload::SessionOpened {
                session_id: session.id.clone(),
                table_id: table_id.to_string(),
            },
        )]);
        Ok(session)
    }

    /// Bind the session's single live order.
    pub fn attach_order(
        &self,
        session_id: &str,
        order_id: &str,
        actor: &Actor,
    ) -> Result<(), OrderError> {
        if !self.orders.contains_key(order_id) {
            return Err(OrderError::OrderNotFound(order_id.to_string()));
        }

        let mut session = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| OrderError::SessionNotFound(session_id.to_string()))?;

        if !session.is_open() {
            return Err(OrderError::InvalidOperation(format!(
                "session {session_id} is already closed"
            )));
        }
        if let Some(existing) = &session.order_id {
            return Err(OrderError::InvalidOperation(format!(
                "session {session_id} already has an active order {existing}"
            )));
        }

        session.order_id = Some(order_id.to_string());
        drop(session);

        self.dispatch(vec![OrderEvent::new(
            actor,
            EventPayload::OrderAttached {
                session_id: session_id.to_string(),
                order_id: order_id.to_string(),
            },
        )]);
        Ok(())
    }

    /// Close a session once its order is settled or cancelled; the table
    /// moves to CLEANING.
    pub fn close_session(&self, session_id: &str, actor: &Actor) -> Result<(), OrderError> {
        let mut session = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| OrderError::SessionNotFound(session_id.to_string()))?;

        if !session.is_open() {
            return Err(OrderError::InvalidOperation(format!(
                "session {session_id} is already closed"
            )));
        }

        // A session whose party left before ordering closes freely; a bound
        // order must have reached a terminal status.
        if let Some(order_id) = session.order_id.clone() {
            let order = self.get_order(&order_id)?;
            if !order.status.is_terminal() {
                return Err(OrderError::SessionStillActive {
                    session_id: session_id.to_string(),
                    status: order.status,
                });
            }
        }

        session.closed_at = Some(now_millis());
        let table_id = session.table_id.clone();
        drop(session);

        self.open_by_table.remove(&table_id);
        self.tables.insert(table_id.clone(), TableState::Cleaning);
        tracing::info!(table_id = %table_id, session_id = %session_id, "Session closed");

        self.dispatch(vec![OrderEvent::new(
            actor,
            EventPayload::SessionClosed {
                session_id: session_id.to_string(),
                table_id,
            },
        )]);
        Ok(())
    }

    /// Mark a CLEANING table FREE again.
    pub fn release_table(&self, table_id: &str, actor: &Actor) -> Result<(), OrderError> {
        let mut state = self
            .tables
            .get_mut(table_id)
            .ok_or_else(|| {
                OrderError::InvalidOperation(format!("table {table_id} has no recorded state"))
            })?;

        if *state != TableState::Cleaning {
            return Err(OrderError::InvalidOperation(format!(
                "table {table_id} is not in cleaning state"
            )));
        }
        *state = TableState::Free;
        drop(state);

        self.dispatch(vec![OrderEvent::new(
            actor,
            EventPayload::TableReleased {
                table_id: table_id.to_string(),
            },
        )]);
        Ok(())
    }

    /// Current state of a table; FREE when never used.
    pub fn table_state(&self, table_id: &str) -> TableState {
        self.tables
            .get(table_id)
            .map(|s| *s.value())
            .unwrap_or_default()
    }

    pub fn get_session(&self, session_id: &str) -> Result<TableSession, OrderError> {
        self.sessions
            .get(session_id)
            .map(|s| s.value().clone())
            .ok_or_else(|| OrderError::SessionNotFound(session_id.to_string()))
    }
}
