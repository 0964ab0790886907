//! Append-only audit log
//!
//! The log owns event identity and ordering: `append` assigns the next
//! sequence number and the current UTC instant under the log's write lock,
//! so sequence order and append order are the same thing. `list_by_entity`
//! returns the full finite history for an id in sequence order; two events
//! that happen to share a timestamp are still unambiguously ordered.
//!
//! Reads are pure and restartable: no iterator state survives a call, and
//! a call sees a consistent snapshot of the log as of invocation.

use std::sync::RwLock;

use chrono::Utc;

use crate::diff::Diff;
use crate::errors::EngineResult;

use super::record::{AuditAction, AuditEvent};

/// Append-only, per-entity, sequence-ordered audit log.
pub trait AuditLog: Send + Sync {
    /// Append one event. Assigns sequence number and timestamp, stores the
    /// event immutably, and returns the stored event.
    fn append(&self, entity_id: &str, action: AuditAction, diff: Diff) -> EngineResult<AuditEvent>;

    /// Full history for an entity id, ascending by sequence number.
    fn list_by_entity(&self, entity_id: &str) -> EngineResult<Vec<AuditEvent>>;
}

/// In-memory audit log.
///
/// The backing `Vec` is append-only; events are never edited or removed.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    events: RwLock<Vec<AuditEvent>>,
}

impl MemoryAuditLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of events ever appended, across all entities.
    pub fn len(&self) -> usize {
        self.events.read().unwrap().len()
    }

    /// Whether the log has no events.
    pub fn is_empty(&self) -> bool {
        self.events.read().unwrap().is_empty()
    }
}

impl AuditLog for MemoryAuditLog {
    fn append(&self, entity_id: &str, action: AuditAction, diff: Diff) -> EngineResult<AuditEvent> {
        let mut events = self.events.write().unwrap();

        // Sequence and timestamp are assigned under the same write lock,
        // so sequence order is append order.
        let event = AuditEvent {
            sequence: events.len() as u64 + 1,
            entity_id: entity_id.to_string(),
            action,
            timestamp: Utc::now(),
            diff,
        };

        events.push(event.clone());
        Ok(event)
    }

    fn list_by_entity(&self, entity_id: &str) -> EngineResult<Vec<AuditEvent>> {
        let events = self.events.read().unwrap();
        Ok(events
            .iter()
            .filter(|event| event.entity_id == entity_id)
            .cloned()
            .collect())
    }
}
