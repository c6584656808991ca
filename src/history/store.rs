//! Persistence backends for the accepted-signal history.
//!
//! The history is one flat document: read in full, rewritten in full.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::debug;

use crate::models::signal::AcceptedSignal;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history document is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait HistoryStore: Send + Sync {
    /// Full history in stored order. A store that was never written is empty.
    fn load(&self) -> Result<Vec<AcceptedSignal>, HistoryError>;

    /// Replace the full history
    fn save(&self, records: &[AcceptedSignal]) -> Result<(), HistoryError>;
}

/// Pretty-printed JSON array on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "signal_history.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<AcceptedSignal>, HistoryError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, records: &[AcceptedSignal]) -> Result<(), HistoryError> {
        let body = serde_json::to_string_pretty(records)?;
        let temp = self.temp_path();
        fs::write(&temp, body)?;
        fs::rename(&temp, &self.path)?;
        debug!(path = %self.path.display(), records = records.len(), "History: saved");
        Ok(())
    }
}

/// In-process store, used by tests and when no history path is wanted
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<AcceptedSignal>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<AcceptedSignal>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Vec<AcceptedSignal>, HistoryError> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        Ok(records.clone())
    }

    fn save(&self, records: &[AcceptedSignal]) -> Result<(), HistoryError> {
        let mut stored = self.records.lock().unwrap_or_else(|e| e.into_inner());
        *stored = records.to_vec();
        Ok(())
    }
}
