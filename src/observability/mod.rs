//! Observability for the audit engine
//!
//! Structured, synchronous, line-per-event JSON logging. Observability is
//! read-only: it never affects the outcome of the operation it reports.

mod logger;

pub use logger::{Logger, Severity};
