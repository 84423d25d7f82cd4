// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only score stores
//!
//! A store accepts inserts and answers one query: records in leaderboard
//! order, optionally limited. Nothing is ever updated or deleted.

use crate::cbor::{decode_scores, encode_scores};
use crate::scoring::{sort_leaderboard, top_n, ScoreRecord};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from a score store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store cannot be reached right now; the caller may retry
    #[error("Score store unavailable: {0}")]
    Unavailable(String),

    #[error("Score store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Score file is corrupt: {0}")]
    Corrupt(#[from] serde_cbor::Error),
}

/// Append-only collection of scores
pub trait ScoreStore {
    /// Append a record
    fn insert(&mut self, record: ScoreRecord) -> Result<(), StoreError>;

    /// Records in leaderboard order, at most `limit` of them when given
    fn query_ordered_limit(&self, limit: Option<usize>) -> Result<Vec<ScoreRecord>, StoreError>;
}

fn ordered(mut records: Vec<ScoreRecord>, limit: Option<usize>) -> Vec<ScoreRecord> {
    sort_leaderboard(&mut records);
    match limit {
        Some(n) => top_n(records, n),
        None => records,
    }
}

/// In-memory store, with a switch to simulate an unreachable backend
#[derive(Debug, Clone)]
pub struct MemoryScoreStore {
    records: Vec<ScoreRecord>,
    available: bool,
}

impl Default for MemoryScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            available: true,
        }
    }

    /// Create a store pre-populated with records
    pub fn with_records(records: Vec<ScoreRecord>) -> Self {
        Self {
            records,
            available: true,
        }
    }

    /// Make every later call succeed or fail with [`StoreError::Unavailable`]
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store switched off".to_string()))
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn insert(&mut self, record: ScoreRecord) -> Result<(), StoreError> {
        self.check_available()?;
        self.records.push(record);
        Ok(())
    }

    fn query_ordered_limit(&self, limit: Option<usize>) -> Result<Vec<ScoreRecord>, StoreError> {
        self.check_available()?;
        Ok(ordered(self.records.clone(), limit))
    }
}

/// Score store persisted to a single CBOR file.
///
/// Every call reads the collection back from disk, so several handles on the
/// same path see each other's inserts. Writes go through a temporary file and
/// a rename, so a crash never leaves a half-written collection behind.
#[derive(Debug)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    /// Open the store at `path`, starting empty if the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let _span = tracing::info_span!("core.store", op = "FileScoreStore::open").entered();

        let store = Self { path };
        let count = store.load()?.len();
        tracing::info!("Opened score store {:?} with {} records", store.path, count);
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records currently on disk
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.load()?.is_empty())
    }

    fn load(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(decode_scores(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self, records: &[ScoreRecord]) -> Result<(), StoreError> {
        let data = encode_scores(records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "scores.cbor".to_string());
        let tmp_path = self.path.with_file_name(format!(".tmp_{}", file_name));

        let written = write_file(&tmp_path, &data)
            // Rename for atomic replacement
            .and_then(|()| std::fs::rename(&tmp_path, &self.path));
        if let Err(e) = written {
            if let Err(cleanup) = std::fs::remove_file(&tmp_path) {
                tracing::debug!("Could not remove {:?}: {}", tmp_path, cleanup);
            }
            return Err(e.into());
        }
        Ok(())
    }
}

fn write_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(data)?;
    file.flush()
}

impl ScoreStore for FileScoreStore {
    fn insert(&mut self, record: ScoreRecord) -> Result<(), StoreError> {
        let _span = tracing::info_span!("core.store", op = "FileScoreStore::insert").entered();

        let mut records = self.load()?;
        records.push(record);
        if let Err(e) = self.persist(&records) {
            tracing::error!("Failed to persist score to {:?}: {}", self.path, e);
            return Err(e);
        }

        tracing::info!("Score saved to {:?} ({} records)", self.path, records.len());
        Ok(())
    }

    fn query_ordered_limit(&self, limit: Option<usize>) -> Result<Vec<ScoreRecord>, StoreError> {
        Ok(ordered(self.load()?, limit))
    }
}
