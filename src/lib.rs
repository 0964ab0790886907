//! auditdb - diff-based audit logging with point-in-time reconstruction
//!
//! Maintains a schema-less, mutable document per entity id and an
//! append-only, diff-based audit log of every mutation, from which the
//! document's state at any past instant can be reconstructed.
//!
//! # Subsystems
//!
//! - [`value`] — JSON value model and the deep equality that defines
//!   "changed"
//! - [`diff`] — field-level change-set computation and application
//! - [`audit`] — append-only, sequence-ordered event log (in-memory and
//!   JSON-lines file backends)
//! - [`store`] — live documents; create/merge-update with per-entity
//!   serialization and atomic state-write + event-append
//! - [`reconstruct`] — fold of an entity's history up to an instant
//! - [`api`] — the operation facade handed to the request layer
//!
//! The live document is maintained directly; the log is a derived trail,
//! not a replay source for it. Diffs cannot express field removal, so no
//! operation removes a key and a reconstructed field never disappears.

pub mod api;
pub mod audit;
pub mod diff;
pub mod errors;
pub mod observability;
pub mod reconstruct;
pub mod store;
pub mod value;

pub use api::Engine;
pub use audit::{AuditAction, AuditEvent, AuditEventView, AuditLog, FileAuditLog, MemoryAuditLog};
pub use diff::{apply_diff, compute_diff, Diff, FieldChange};
pub use errors::{EngineError, EngineResult};
pub use reconstruct::reconstruct_state;
pub use store::{Document, DocumentStore};
pub use value::{values_equal, FieldMap, Value};
