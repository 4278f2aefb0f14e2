// ABOUTME: File-backed message log — an ordered JSON array of timestamped user/agent/activity entries.
// ABOUTME: Every append rewrites the whole document via tmp + rename; failures are logged, never raised.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Who produced a log entry. Closed set: the file format only admits these three tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    User,
    Agent,
    Activity,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::User => "user",
            EntryKind::Agent => "agent",
            EntryKind::Activity => "activity",
        }
    }
}

/// A single persisted log entry, serialized as `{"type", "message", "timestamp"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub message: String,
    /// Local wall-clock time as `HH:MM:SS`.
    #[serde(default)]
    pub timestamp: String,
}

impl LogEntry {
    /// Build an entry stamped with the current local time.
    pub fn now(kind: EntryKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp: Local::now().format("%H:%M:%S").to_string(),
        }
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.timestamp, self.kind.as_str(), self.message)
    }
}

/// Append-only conversation log backed by a single JSON file.
///
/// The infallible methods (`append`, `read_all`, `clear`) swallow I/O and
/// parse failures after reporting them through `tracing`; an unreadable log
/// reads as empty. The `try_*` variants surface the same failures as
/// [`Error::LogIo`].
pub struct MessageLog {
    path: PathBuf,
    /// Serializes writers inside this process. Readers never take it.
    write_lock: Mutex<()>,
}

impl MessageLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry. Never fails from the caller's point of view.
    pub fn append(&self, kind: EntryKind, message: impl Into<String>) {
        if let Err(e) = self.try_append(kind, message) {
            tracing::warn!(error = %e, kind = kind.as_str(), "failed to append to message log");
        }
    }

    /// Append one entry, returning the entry as written.
    pub fn try_append(&self, kind: EntryKind, message: impl Into<String>) -> Result<LogEntry> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut entries = self.load()?;
        let entry = LogEntry::now(kind, message);
        entries.push(entry.clone());
        self.store(&entries)?;

        tracing::debug!(kind = kind.as_str(), total = entries.len(), "appended log entry");
        Ok(entry)
    }

    /// All entries in append order; empty if the file is absent or unreadable.
    pub fn read_all(&self) -> Vec<LogEntry> {
        match self.try_read_all() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read message log");
                Vec::new()
            }
        }
    }

    /// All entries in append order; an absent file is an empty log, not an error.
    pub fn try_read_all(&self) -> Result<Vec<LogEntry>> {
        self.load()
    }

    /// Delete the backing file. A missing file is a no-op.
    pub fn clear(&self) {
        if let Err(e) = self.try_clear() {
            tracing::warn!(error = %e, "failed to clear message log");
        }
    }

    pub fn try_clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "cleared message log");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::log_io(&self.path, e)),
        }
    }

    fn load(&self) -> Result<Vec<LogEntry>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::log_io(&self.path, e)),
        };
        serde_json::from_str(&content).map_err(|e| Error::log_io(&self.path, e))
    }

    /// Atomic replace: write the full document to a sibling tmp file, then rename over.
    fn store(&self, entries: &[LogEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::log_io(parent, e))?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let content =
            serde_json::to_string_pretty(entries).map_err(|e| Error::log_io(&self.path, e))?;
        fs::write(&tmp_path, content).map_err(|e| Error::log_io(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| Error::log_io(&self.path, e))?;
        Ok(())
    }
}
