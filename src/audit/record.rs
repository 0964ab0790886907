//! Audit event record types
//!
//! An `AuditEvent` records one mutation of one entity as a field-level
//! delta. Events are immutable once appended: the log for an entity is
//! never edited or truncated, and the returned structs are plain clones of
//! stored data.
//!
//! Identity and ordering: the `sequence` number is assigned at append time
//! and is strictly increasing per log. It is the authoritative order of the
//! history; the timestamp is the reported instant of the change and is not
//! trusted as an ordering key (concurrent appenders with skewed clocks
//! could otherwise reorder the fold).

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::diff::Diff;

/// Entity type tag carried on serialized events. All documents managed by
/// this engine are projects.
pub const ENTITY_TYPE: &str = "project";

/// Mutation kind recorded on an audit event.
///
/// `Delete` is a defined value with no producer in this crate: documents
/// are never removed and the `deleted` flag on `Document` is never set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    /// Returns the wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable entry of an entity's audit history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Log-assigned sequence number, strictly increasing in append order.
    pub sequence: u64,
    /// Entity the mutation applied to. Not validated against the document
    /// store; any id is accepted.
    pub entity_id: String,
    /// Kind of mutation.
    pub action: AuditAction,
    /// Instant the event was appended, UTC.
    pub timestamp: DateTime<Utc>,
    /// Changed fields only, each with its old and new value. Empty for an
    /// update that changed nothing (still logged).
    pub diff: Diff,
}

/// Wire-shaped view of an audit event, as handed to the surrounding
/// request layer: camelCase keys, constant entity type, RFC 3339 UTC
/// timestamp string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEventView {
    pub id: u64,
    pub entity_type: &'static str,
    pub entity_id: String,
    pub action: AuditAction,
    pub timestamp: String,
    pub diff: Diff,
}

impl AuditEventView {
    /// Build the wire view of a stored event.
    pub fn from_event(event: &AuditEvent) -> Self {
        Self {
            id: event.sequence,
            entity_type: ENTITY_TYPE,
            entity_id: event.entity_id.clone(),
            action: event.action,
            timestamp: event
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            diff: event.diff.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::FieldChange;
    use serde_json::json;

    fn sample_event() -> AuditEvent {
        let mut diff = Diff::new();
        diff.insert(
            "price".to_string(),
            FieldChange {
                old: json!(null),
                new: json!(100),
            },
        );
        AuditEvent {
            sequence: 1,
            entity_id: "P1".to_string(),
            action: AuditAction::Create,
            timestamp: "2026-01-15T10:30:00Z".parse().unwrap(),
            diff,
        }
    }

    #[test]
    fn test_action_wire_names() {
        assert_eq!(AuditAction::Create.as_str(), "CREATE");
        assert_eq!(AuditAction::Update.as_str(), "UPDATE");
        assert_eq!(AuditAction::Delete.as_str(), "DELETE");
    }

    #[test]
    fn test_action_serializes_as_uppercase_string() {
        assert_eq!(
            serde_json::to_string(&AuditAction::Update).unwrap(),
            "\"UPDATE\""
        );
        let action: AuditAction = serde_json::from_str("\"CREATE\"").unwrap();
        assert_eq!(action, AuditAction::Create);
    }

    #[test]
    fn test_event_json_round_trip() {
        let event = sample_event();
        let line = serde_json::to_string(&event).unwrap();
        let decoded: AuditEvent = serde_json::from_str(&line).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_view_carries_constant_entity_type_and_utc_timestamp() {
        let view = AuditEventView::from_event(&sample_event());

        assert_eq!(view.id, 1);
        assert_eq!(view.entity_type, "project");
        assert_eq!(view.timestamp, "2026-01-15T10:30:00.000Z");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["entityType"], json!("project"));
        assert_eq!(json["entityId"], json!("P1"));
        assert_eq!(json["action"], json!("CREATE"));
        assert_eq!(json["diff"]["price"]["old"], json!(null));
        assert_eq!(json["diff"]["price"]["new"], json!(100));
    }
}
