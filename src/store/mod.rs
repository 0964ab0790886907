//! Document store
//!
//! Owns the live materialized state of every document and drives the audit
//! trail: each mutation computes a field-level diff, appends exactly one
//! event, and installs the new state as one atomic unit.
//!
//! # Concurrency
//!
//! Mutations on the same entity id serialize on a per-entity lock; without
//! it, two concurrent read-merge-diff-write updates could both read the
//! same prior state and one would overwrite the other while both still
//! logged an event, leaving the trail inconsistent with the document.
//! Mutations on distinct ids share nothing but the lock table itself and
//! proceed concurrently. Lock entries live only while some mutation holds
//! or waits on them; the last releaser removes the entry, so the table is
//! bounded by the number of in-flight mutations, not by the ids ever seen.
//!
//! # Atomicity
//!
//! Inside the entity lock the event append runs first; the document map is
//! only written after the append succeeded. A failed append therefore
//! leaves no observable state change, and a reader never sees a document
//! mutated without its audit event or vice versa.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};

use crate::audit::{AuditAction, AuditLog};
use crate::diff::compute_diff;
use crate::errors::{EngineError, EngineResult};
use crate::value::FieldMap;

/// Current materialized state of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Externally assigned entity id, unique per document.
    pub id: String,
    /// Current field map.
    pub fields: FieldMap,
    /// Reserved flag: no operation in this crate sets it, and reads do not
    /// interpret it. Kept so the persisted shape matches the audit trail's
    /// DELETE action, which likewise has no producer.
    #[serde(default)]
    pub deleted: bool,
}

/// Live document state plus the audit trail of how it got there.
pub struct DocumentStore<L: AuditLog> {
    log: L,
    documents: RwLock<HashMap<String, Document>>,
    entity_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<L: AuditLog> DocumentStore<L> {
    /// Create a store writing its trail to the given audit log.
    pub fn new(log: L) -> Self {
        Self {
            log,
            documents: RwLock::new(HashMap::new()),
            entity_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying audit log.
    pub fn log(&self) -> &L {
        &self.log
    }

    /// Lock handle serializing mutations of one entity id.
    fn entity_lock(&self, id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.entity_locks.lock().unwrap();
        locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the table entry for `id` once no mutation holds or waits on it.
    ///
    /// Callers release their own handle before calling. The table mutex is
    /// held across the count check, and every other taker must pass through
    /// that mutex before cloning, so a strong count of one proves the table
    /// holds the only reference and the entry can go. Keeps the table from
    /// accumulating an entry per id ever touched, including ids probed by
    /// failed updates.
    fn release_entity_lock(&self, id: &str) {
        let mut locks = self.entity_locks.lock().unwrap();
        if let Some(entry) = locks.get(id) {
            if Arc::strong_count(entry) == 1 {
                locks.remove(id);
            }
        }
    }

    /// Create a document, unconditionally overwriting any existing state at
    /// `id` and logging a CREATE whose old sides are all null.
    ///
    /// The overwrite is deliberate: prior history stays in the log and a
    /// fold across the boundary keeps overwriting fields from the fresh
    /// baseline. Rejecting duplicate creates would be a different engine.
    pub fn create(&self, id: &str, fields: FieldMap) -> EngineResult<Document> {
        let lock = self.entity_lock(id);
        let result = {
            let _guard = lock.lock().unwrap();

            let diff = compute_diff(&FieldMap::new(), &fields);
            self.log.append(id, AuditAction::Create, diff).map(|_| {
                let document = Document {
                    id: id.to_string(),
                    fields,
                    deleted: false,
                };
                self.documents
                    .write()
                    .unwrap()
                    .insert(id.to_string(), document.clone());
                document
            })
        };

        drop(lock);
        self.release_entity_lock(id);
        result
    }

    /// Shallow-merge `updates` into the document at `id`: new keys are
    /// added, existing keys overwritten, no key is ever removed.
    ///
    /// Fails with `NotFound` if no document exists. An update that changes
    /// nothing still persists and still appends an UPDATE event with an
    /// empty diff: idempotent, but logged.
    pub fn update(&self, id: &str, updates: FieldMap) -> EngineResult<Document> {
        let lock = self.entity_lock(id);
        let result = {
            let _guard = lock.lock().unwrap();
            self.update_locked(id, updates)
        };

        drop(lock);
        self.release_entity_lock(id);
        result
    }

    fn update_locked(&self, id: &str, updates: FieldMap) -> EngineResult<Document> {
        let existing = self
            .documents
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::not_found(id))?;

        let mut merged = existing.fields.clone();
        for (key, value) in updates {
            merged.insert(key, value);
        }

        let diff = compute_diff(&existing.fields, &merged);
        self.log.append(id, AuditAction::Update, diff)?;

        let document = Document {
            id: existing.id,
            fields: merged,
            deleted: existing.deleted,
        };
        self.documents
            .write()
            .unwrap()
            .insert(id.to_string(), document.clone());

        Ok(document)
    }

    /// Current document at `id`, if any.
    pub fn get(&self, id: &str) -> Option<Document> {
        self.documents.read().unwrap().get(id).cloned()
    }
}
