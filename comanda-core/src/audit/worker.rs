//! Audit log background worker
//!
//! Consumes [`AuditEntry`] values from the mpsc channel and appends them to
//! the configured [`AuditSink`]. Sink failures are logged and skipped; the
//! worker exits when the channel closes.

use super::types::AuditEntry;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Sink append failure
#[derive(Debug, Error)]
#[error("audit sink error: {0}")]
pub struct AuditSinkError(pub String);

/// One-way audit sink collaborator.
///
/// Implementors own durability concerns (storage, hash chaining, rotation);
/// the engine only ever appends.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, entry: AuditEntry) -> Result<(), AuditSinkError>;
}

/// Sink that logs entries through `tracing`; the default when no durable
/// sink is wired up.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn append(&self, entry: AuditEntry) -> Result<(), AuditSinkError> {
        tracing::info!(
            action = %entry.action,
            entity_type = %entry.entity_type,
            entity_id = %entry.entity_id,
            operator = %entry.operator_name,
            "audit"
        );
        Ok(())
    }
}

/// In-memory sink for tests.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    entries: parking_lot::Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn append(&self, entry: AuditEntry) -> Result<(), AuditSinkError> {
        self.entries.lock().push(entry);
        Ok(())
    }
}

/// Audit log background worker
pub struct AuditWorker {
    sink: Arc<dyn AuditSink>,
}

impl AuditWorker {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Run the worker (blocks until the channel closes).
    pub async fn run(self, mut rx: tokio::sync::mpsc::Receiver<AuditEntry>) {
        tracing::info!("Audit log worker started");

        while let Some(entry) = rx.recv().await {
            if let Err(e) = self.sink.append(entry).await {
                tracing::error!("Failed to write audit entry: {e}");
            }
        }

        tracing::info!("Audit log channel closed, worker stopping");
    }
}
