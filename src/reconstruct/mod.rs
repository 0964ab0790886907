//! Point-in-time state reconstruction
//!
//! Folds an entity's audit history up to a requested instant into the
//! field map the document held at that time.

use chrono::{DateTime, Utc};

use crate::audit::AuditLog;
use crate::diff::apply_diff;
use crate::errors::EngineResult;
use crate::value::FieldMap;

/// Reconstruct the field map of `entity_id` as of `at` (inclusive).
///
/// The history arrives in sequence order; the fold filters the full finite
/// sequence on `timestamp <= at` rather than breaking at the first later
/// timestamp, so a non-monotonic timestamp produced by clock skew cannot
/// cut the fold short. An instant before the entity's first event yields an
/// empty map; an unknown entity likewise.
///
/// Because diffs cannot express removal, a field once set stays in the
/// reconstructed state for every later instant.
pub fn reconstruct_state<L: AuditLog>(
    log: &L,
    entity_id: &str,
    at: DateTime<Utc>,
) -> EngineResult<FieldMap> {
    let events = log.list_by_entity(entity_id)?;

    let mut state = FieldMap::new();
    for event in &events {
        if event.timestamp > at {
            continue;
        }
        apply_diff(&mut state, &event.diff);
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditAction, AuditLog, MemoryAuditLog};
    use crate::diff::{Diff, FieldChange};
    use serde_json::json;

    fn diff_for(field: &str, old: serde_json::Value, new: serde_json::Value) -> Diff {
        let mut diff = Diff::new();
        diff.insert(field.to_string(), FieldChange { old, new });
        diff
    }

    #[test]
    fn test_fold_stops_at_requested_instant() {
        let log = MemoryAuditLog::new();
        let e1 = log
            .append("P1", AuditAction::Create, diff_for("price", json!(null), json!(100)))
            .unwrap();
        let e2 = log
            .append("P1", AuditAction::Update, diff_for("price", json!(100), json!(120)))
            .unwrap();

        // At the first event's instant (inclusive boundary).
        let state = reconstruct_state(&log, "P1", e1.timestamp).unwrap();
        assert_eq!(state.get("price"), Some(&json!(100)));

        // At or after the second event.
        let state = reconstruct_state(&log, "P1", e2.timestamp).unwrap();
        assert_eq!(state.get("price"), Some(&json!(120)));
    }

    #[test]
    fn test_time_before_first_event_is_empty() {
        let log = MemoryAuditLog::new();
        let e1 = log
            .append("P1", AuditAction::Create, diff_for("price", json!(null), json!(100)))
            .unwrap();

        let before = e1.timestamp - chrono::Duration::seconds(1);
        assert!(reconstruct_state(&log, "P1", before).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_entity_is_empty() {
        let log = MemoryAuditLog::new();
        let state = reconstruct_state(&log, "P9", Utc::now()).unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn test_fields_never_disappear_once_set() {
        let log = MemoryAuditLog::new();
        log.append("P1", AuditAction::Create, diff_for("status", json!(null), json!("draft")))
            .unwrap();
        log.append("P1", AuditAction::Update, diff_for("price", json!(null), json!(100)))
            .unwrap();

        let state = reconstruct_state(&log, "P1", Utc::now()).unwrap();
        assert_eq!(state.get("status"), Some(&json!("draft")));
        assert_eq!(state.get("price"), Some(&json!(100)));
    }
}
