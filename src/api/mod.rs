//! Engine operation facade
//!
//! The surface the surrounding request layer invokes: create and update
//! take JSON-object payloads as strings, history comes back as wire-shaped
//! event views, and point-in-time queries take an ISO-8601 timestamp
//! string. Routing, HTTP status mapping, and response envelopes are that
//! layer's concern, not this crate's.
//!
//! Typed in-process variants (`state_at`, the store itself) are exposed
//! alongside for callers that already hold decoded values.

use chrono::{DateTime, Utc};

use crate::audit::{AuditEventView, AuditLog};
use crate::errors::{EngineError, EngineResult};
use crate::observability::Logger;
use crate::reconstruct::reconstruct_state;
use crate::store::{Document, DocumentStore};
use crate::value::{FieldMap, Value};

/// The audit engine: a document store, its audit log, and the operations
/// exposed to the outside.
pub struct Engine<L: AuditLog> {
    store: DocumentStore<L>,
}

impl<L: AuditLog> Engine<L> {
    /// Create an engine writing its trail to the given audit log.
    pub fn new(log: L) -> Self {
        Self {
            store: DocumentStore::new(log),
        }
    }

    /// The underlying document store.
    pub fn store(&self) -> &DocumentStore<L> {
        &self.store
    }

    /// Create (or overwrite) the document at `id` from a JSON object
    /// payload. `DecodeError` if the payload is not valid JSON,
    /// `ValidationError` if it parses but is not an object.
    pub fn create_document(&self, id: &str, fields_json: &str) -> EngineResult<Document> {
        let fields = decode_object(fields_json)?;
        let document = self.store.create(id, fields)?;

        Logger::info(
            "DOC_CREATE",
            &[
                ("entity_id", id),
                ("field_count", &document.fields.len().to_string()),
            ],
        );
        Ok(document)
    }

    /// Shallow-merge a JSON object payload into the document at `id`.
    /// `NotFound` if the document does not exist.
    pub fn update_document(&self, id: &str, updates_json: &str) -> EngineResult<Document> {
        let updates = decode_object(updates_json)?;
        let changed = updates.len();
        let document = self.store.update(id, updates)?;

        Logger::info(
            "DOC_UPDATE",
            &[
                ("entity_id", id),
                ("updated_fields", &changed.to_string()),
            ],
        );
        Ok(document)
    }

    /// Full audit history for `id` as wire-shaped views, ascending by
    /// sequence. Unknown ids have an empty history.
    pub fn get_history(&self, id: &str) -> EngineResult<Vec<AuditEventView>> {
        let events = self.store.log().list_by_entity(id)?;
        Ok(events.iter().map(AuditEventView::from_event).collect())
    }

    /// Reconstruct the state of `id` at an ISO-8601 instant, e.g.
    /// `"2026-01-15T10:30:00Z"`. A timestamp that does not parse is
    /// rejected with `ValidationError` before any log read.
    pub fn get_state_at_time(&self, id: &str, at: &str) -> EngineResult<FieldMap> {
        let at = DateTime::parse_from_rfc3339(at)
            .map_err(|e| EngineError::validation(format!("invalid timestamp '{}': {}", at, e)))?
            .with_timezone(&Utc);

        self.state_at(id, at)
    }

    /// Typed variant of [`get_state_at_time`](Self::get_state_at_time).
    pub fn state_at(&self, id: &str, at: DateTime<Utc>) -> EngineResult<FieldMap> {
        let state = reconstruct_state(self.store.log(), id, at)?;

        Logger::info(
            "STATE_RECONSTRUCT",
            &[
                ("entity_id", id),
                ("at", &at.to_rfc3339()),
                ("field_count", &state.len().to_string()),
            ],
        );
        Ok(state)
    }
}

/// Decode a JSON payload that must be an object.
fn decode_object(payload: &str) -> EngineResult<FieldMap> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| EngineError::decode(format!("invalid JSON payload: {}", e)))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(EngineError::validation(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemoryAuditLog;
    use serde_json::json;

    fn engine() -> Engine<MemoryAuditLog> {
        Engine::new(MemoryAuditLog::new())
    }

    #[test]
    fn test_create_from_json_payload() {
        let engine = engine();
        let doc = engine
            .create_document("P1", r#"{"price":100,"status":"draft"}"#)
            .unwrap();

        assert_eq!(doc.fields.get("price"), Some(&json!(100)));
        assert_eq!(doc.fields.get("status"), Some(&json!("draft")));
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let engine = engine();
        let err = engine.create_document("P1", "{not json").unwrap_err();
        assert!(matches!(err, EngineError::Decode(_)));
    }

    #[test]
    fn test_non_object_payload_is_validation_error() {
        let engine = engine();
        let err = engine.create_document("P1", "[1,2,3]").unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let engine = engine();
        let err = engine
            .update_document("P1x", r#"{"price":1}"#)
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn test_history_is_wire_shaped() {
        let engine = engine();
        engine.create_document("P1", r#"{"price":100}"#).unwrap();
        engine.update_document("P1", r#"{"price":120}"#).unwrap();

        let history = engine.get_history("P1").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].entity_type, "project");
        assert_eq!(history[0].action.as_str(), "CREATE");
        assert_eq!(history[1].action.as_str(), "UPDATE");
        assert_eq!(history[1].diff["price"].old, json!(100));
        assert_eq!(history[1].diff["price"].new, json!(120));
        // RFC 3339 UTC with Z suffix.
        assert!(history[0].timestamp.ends_with('Z'));
    }

    #[test]
    fn test_malformed_timestamp_is_validation_error() {
        let engine = engine();
        engine.create_document("P1", r#"{"price":100}"#).unwrap();

        let err = engine.get_state_at_time("P1", "yesterday-ish").unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn test_state_at_time_round_trip() {
        let engine = engine();
        engine.create_document("P1", r#"{"price":100}"#).unwrap();

        let now = Utc::now() + chrono::Duration::seconds(1);
        let state = engine
            .get_state_at_time("P1", &now.to_rfc3339())
            .unwrap();
        assert_eq!(state.get("price"), Some(&json!(100)));
    }
}
