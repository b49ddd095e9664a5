//! Audit Emitter
//!
//! Fire-and-forget audit pipeline: the engine derives an [`AuditEntry`]
//! from each domain event after the order lock is released and hands it to
//! [`AuditService::emit`] (a bounded `try_send`). An [`AuditWorker`] drains
//! the channel into an [`AuditSink`] collaborator. Audit unavailability is
//! logged but never escalates into failure of the originating operation.

mod service;
mod types;
mod worker;

pub use service::AuditService;
pub use types::{AuditAction, AuditEntry};
pub use worker::{AuditSink, AuditSinkError, AuditWorker, MemoryAuditSink, TracingAuditSink};
