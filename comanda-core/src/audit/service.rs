//! Audit emission service
//!
//! [`AuditService`] is the engine-facing half of the audit pipeline: a
//! bounded mpsc channel written with `try_send`. Emission is fire-and-forget
//! and never happens under an order lock; a full or closed channel drops the
//! entry with a log line and never fails the business operation it
//! describes.

use super::types::AuditEntry;
use tokio::sync::mpsc;

/// Audit emission handle
#[derive(Debug, Clone)]
pub struct AuditService {
    tx: mpsc::Sender<AuditEntry>,
}

impl AuditService {
    /// Create the service and the receiver end for an [`AuditWorker`].
    ///
    /// [`AuditWorker`]: super::AuditWorker
    pub fn new(buffer_size: usize) -> (Self, mpsc::Receiver<AuditEntry>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        (Self { tx }, rx)
    }

    /// Emit one entry, best-effort.
    pub fn emit(&self, entry: AuditEntry) {
        if let Err(e) = self.tx.try_send(entry) {
            match e {
                mpsc::error::TrySendError::Full(entry) => {
                    tracing::warn!(
                        action = %entry.action,
                        entity = %entry.entity_id,
                        "Audit channel full, entry dropped"
                    );
                }
                mpsc::error::TrySendError::Closed(entry) => {
                    tracing::warn!(
                        action = %entry.action,
                        entity = %entry.entity_id,
                        "Audit worker gone, entry dropped"
                    );
                }
            }
        }
    }
}
