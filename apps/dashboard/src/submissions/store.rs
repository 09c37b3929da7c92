//! Flat-file candidate store.
//!
//! The whole submissions document is read on every operation and rewritten on
//! every mutation. Operations on one `JsonFileStore` (and its clones) run one
//! at a time. Writes land in a uniquely named sibling temp file that is renamed
//! over the document, so readers never observe a torn file. Separate processes
//! sharing the file can still lose an update: whichever rename happens last wins.
//!
//! Array elements that are not candidate records are carried through every
//! rewrite untouched; they are invisible to lookups.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::models::candidate::{Candidate, NewCandidate};

/// Fields the server owns; a client cannot smuggle them in through `extra`.
const SERVER_ASSIGNED_FIELDS: [&str; 3] = ["id", "created_at", "reason"];

static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("candidate name is required")]
    InvalidInput,

    #[error("candidate {0} not found")]
    NotFound(String),

    #[error("storage I/O failed on {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize submissions: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The record store seam. Carried in `AppState` as `Arc<dyn CandidateStore>`.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Returns every stored candidate in persisted order.
    async fn list(&self) -> Result<Vec<Candidate>, StoreError>;

    /// Validates, stamps and appends a new candidate.
    async fn create(&self, candidate: NewCandidate) -> Result<Candidate, StoreError>;

    /// Replaces the server-side `reason` of an existing candidate.
    async fn update_reason(&self, id: &str, reason: String) -> Result<Candidate, StoreError>;
}

/// One element of the persisted array.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum StoredItem {
    Record(Candidate),
    Foreign(Value),
}

impl StoredItem {
    /// Numeric id, whether or not the element parsed as a record.
    fn numeric_id(&self) -> Option<i64> {
        match self {
            StoredItem::Record(candidate) => candidate.id.parse().ok(),
            StoredItem::Foreign(value) => match value.get("id")? {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            },
        }
    }
}

/// Candidate store backed by a single pretty-printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the document as `[]` if it does not exist yet.
    pub async fn ensure_data_file(&self) -> Result<(), StoreError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|source| self.io_error(source))?;
                }
                tokio::fs::write(&self.path, "[]")
                    .await
                    .map_err(|source| self.io_error(source))?;
                info!("Created data file {}", self.path.display());
                Ok(())
            }
            Err(source) => Err(self.io_error(source)),
        }
    }

    async fn load_all(&self) -> Result<Vec<StoredItem>, StoreError> {
        self.ensure_data_file().await?;
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| self.io_error(source))?;
        Ok(parse_document(&raw, &self.path))
    }

    async fn write_all(&self, items: &[StoredItem]) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(items)?;
        let tmp = self.tmp_path();
        if let Err(source) = tokio::fs::write(&tmp, body).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(self.io_error(source));
        }
        if let Err(source) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(self.io_error(source));
        }
        debug!("Rewrote {} with {} elements", self.path.display(), items.len());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(
            ".{}.{}.tmp",
            std::process::id(),
            WRITE_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Storage {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl CandidateStore for JsonFileStore {
    async fn list(&self) -> Result<Vec<Candidate>, StoreError> {
        let _guard = self.lock.lock().await;
        let items = self.load_all().await?;
        Ok(items
            .into_iter()
            .filter_map(|item| match item {
                StoredItem::Record(candidate) => Some(candidate),
                StoredItem::Foreign(_) => None,
            })
            .collect())
    }

    async fn create(&self, candidate: NewCandidate) -> Result<Candidate, StoreError> {
        let name = match candidate.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(StoreError::InvalidInput),
        };

        let _guard = self.lock.lock().await;
        let mut items = self.load_all().await?;
        let now = Utc::now();

        let mut extra = candidate.extra;
        for field in SERVER_ASSIGNED_FIELDS {
            extra.remove(field);
        }

        let stored = Candidate {
            id: next_id(&items, now),
            name,
            work_availability: candidate.work_availability,
            work_experiences: candidate.work_experiences,
            created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            reason: String::new(),
            extra,
        };

        items.push(StoredItem::Record(stored.clone()));
        self.write_all(&items).await?;

        info!("Added candidate {} id: {}", stored.name, stored.id);
        Ok(stored)
    }

    async fn update_reason(&self, id: &str, reason: String) -> Result<Candidate, StoreError> {
        let _guard = self.lock.lock().await;
        let mut items = self.load_all().await?;

        let candidate = items
            .iter_mut()
            .find_map(|item| match item {
                StoredItem::Record(c) if c.id == id => Some(c),
                _ => None,
            })
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        candidate.reason = reason;
        let updated = candidate.clone();

        self.write_all(&items).await?;

        info!("Updated reason for candidate {id}");
        Ok(updated)
    }
}

/// Parses the persisted document. Empty, malformed or non-array content reads
/// as an empty list; array elements that are not candidate records are kept
/// as raw JSON.
fn parse_document(raw: &str, path: &Path) -> Vec<StoredItem> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    let items = match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(items) => items,
        Err(e) => {
            warn!("Ignoring unreadable submissions in {}: {e}", path.display());
            return Vec::new();
        }
    };
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match Candidate::deserialize(&item) {
            Ok(candidate) => StoredItem::Record(candidate),
            Err(e) => {
                warn!("Keeping record #{idx} in {} as raw JSON: {e}", path.display());
                StoredItem::Foreign(item)
            }
        })
        .collect()
}

/// Millisecond timestamp id, bumped past the largest numeric id already stored
/// so two creates within the same millisecond never collide.
fn next_id(existing: &[StoredItem], now: DateTime<Utc>) -> String {
    let stamp = now.timestamp_millis();
    let max_existing = existing.iter().filter_map(StoredItem::numeric_id).max();
    match max_existing {
        Some(max) if max >= stamp => (max + 1).to_string(),
        _ => stamp.to_string(),
    }
}
