//! Durable JSON-lines audit log
//!
//! Append-only file, one JSON-encoded event per line, flushed and synced
//! before the append returns. Opening an existing file replays its lines
//! to recover the sequence counter, so a restarted process continues the
//! same strictly increasing sequence.
//!
//! A line that fails to parse surfaces as `DecodeError` and aborts the
//! operation that read it; nothing is repaired or skipped silently.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;

use crate::diff::Diff;
use crate::errors::{EngineError, EngineResult};

use super::log::AuditLog;
use super::record::{AuditAction, AuditEvent};

#[derive(Debug)]
struct FileLogState {
    writer: BufWriter<File>,
    next_sequence: u64,
}

/// File-backed audit log.
#[derive(Debug)]
pub struct FileAuditLog {
    path: PathBuf,
    state: Mutex<FileLogState>,
}

impl FileAuditLog {
    /// Open or create an audit log file, recovering the sequence counter
    /// from any events already on disk.
    pub fn open(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref().to_path_buf();

        let mut next_sequence = 1;
        if path.exists() {
            for event in read_events(&path)? {
                next_sequence = event.sequence + 1;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            state: Mutex::new(FileLogState {
                writer: BufWriter::new(file),
                next_sequence,
            }),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditLog for FileAuditLog {
    fn append(&self, entity_id: &str, action: AuditAction, diff: Diff) -> EngineResult<AuditEvent> {
        let mut state = self.state.lock().unwrap();

        let event = AuditEvent {
            sequence: state.next_sequence,
            entity_id: entity_id.to_string(),
            action,
            timestamp: Utc::now(),
            diff,
        };

        let line = serde_json::to_string(&event)
            .map_err(|e| EngineError::decode(format!("encoding audit event: {}", e)))?;

        writeln!(state.writer, "{}", line)?;
        state.writer.flush()?;
        state.writer.get_ref().sync_all()?;

        // The counter only advances once the line is durable; a failed
        // append leaves the sequence unconsumed.
        state.next_sequence += 1;
        Ok(event)
    }

    fn list_by_entity(&self, entity_id: &str) -> EngineResult<Vec<AuditEvent>> {
        // Holding the lock pins a consistent snapshot: no append can land a
        // partial line while the file is being read.
        let _state = self.state.lock().unwrap();

        let events = match read_events(&self.path) {
            Ok(events) => events,
            Err(EngineError::Io(e)) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };

        Ok(events
            .into_iter()
            .filter(|event| event.entity_id == entity_id)
            .collect())
    }
}

fn read_events(path: &Path) -> EngineResult<Vec<AuditEvent>> {
    let contents = fs::read_to_string(path)?;

    let mut events = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let event: AuditEvent = serde_json::from_str(line)
            .map_err(|e| EngineError::decode(format!("audit log line {}: {}", index + 1, e)))?;
        events.push(event);
    }
    Ok(events)
}
