//! Engine Error Types
//!
//! Unified error taxonomy for the audit engine. Every failure aborts the
//! single operation that raised it with no partial side effect: a document
//! write is never observable without its audit event, and vice versa.
//!
//! `ConcurrencyConflict` is reserved for an optimistic-versioning log
//! backend; the built-in stores serialize same-entity mutations with a
//! per-entity lock and never produce it.

use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// Mutation targeted an entity id with no document
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Stored or inbound JSON payload failed to parse
    #[error("Decode error: {0}")]
    Decode(String),

    /// Malformed timestamp or malformed input shape
    #[error("Validation error: {0}")]
    Validation(String),

    /// Optimistic write lost a version race (no producer in-tree)
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// Durable log I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Create a not-found error for an entity id
    pub fn not_found(entity_id: impl Into<String>) -> Self {
        Self::NotFound(entity_id.into())
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
