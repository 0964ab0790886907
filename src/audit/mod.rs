//! Audit log subsystem
//!
//! An append-only, per-entity, sequence-ordered trail of field-level
//! mutation events.
//!
//! # Invariants Enforced
//!
//! - Events are immutable once appended; the log is never edited or
//!   truncated
//! - Sequence numbers are assigned at append time and strictly increase;
//!   sequence order is the authoritative history order
//! - Timestamps are reported instants, never an ordering key
//! - `list_by_entity` is a pure, restartable read of the full finite
//!   history for an id

mod file;
mod log;
mod record;

pub use file::FileAuditLog;
pub use log::{AuditLog, MemoryAuditLog};
pub use record::{AuditAction, AuditEvent, AuditEventView, ENTITY_TYPE};
