//! Shortlist manager.
//!
//! The shortlist lives entirely on the client: it is loaded from its own
//! storage at startup, saved after every mutation and never written back to
//! the Record Store. An entry is a copy of the candidate whose `reason` holds
//! the shortlist justification, independent of the server-side field.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::dashboard::suggest::suggest_reason;
use crate::models::candidate::Candidate;

pub const SHORTLIST_CAPACITY: usize = 5;

#[derive(Debug, Error)]
pub enum ShortlistError {
    #[error("Shortlist limit: {capacity} candidates")]
    Full { capacity: usize },

    #[error("shortlist storage failed on {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shortlist storage holds invalid JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ShortlistEntry {
    pub candidate: Candidate,
}

impl ShortlistEntry {
    pub fn new(candidate: &Candidate, reason: impl Into<String>) -> Self {
        let mut candidate = candidate.clone();
        candidate.reason = reason.into();
        Self { candidate }
    }

    pub fn id(&self) -> &str {
        &self.candidate.id
    }

    pub fn name(&self) -> &str {
        &self.candidate.name
    }

    pub fn reason(&self) -> &str {
        &self.candidate.reason
    }
}

/// Result of a successful [`ShortlistManager::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

/// Load/save contract for the client-local shortlist.
pub trait ShortlistStorage {
    fn load(&self) -> Result<Vec<ShortlistEntry>, ShortlistError>;
    fn save(&self, entries: &[ShortlistEntry]) -> Result<(), ShortlistError>;
}

/// Stores the shortlist as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct FileShortlistStorage {
    path: PathBuf,
}

impl FileShortlistStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ShortlistError {
        ShortlistError::Storage {
            path: self.path.clone(),
            source,
        }
    }
}

impl ShortlistStorage for FileShortlistStorage {
    fn load(&self) -> Result<Vec<ShortlistEntry>, ShortlistError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, entries: &[ShortlistEntry]) -> Result<(), ShortlistError> {
        let body = serde_json::to_string(entries)?;
        std::fs::write(&self.path, body).map_err(|e| self.io_error(e))
    }
}

/// Owns the shortlist entries and the storage they persist to.
#[derive(Debug)]
pub struct ShortlistManager<S: ShortlistStorage> {
    storage: S,
    entries: Vec<ShortlistEntry>,
}

impl<S: ShortlistStorage> ShortlistManager<S> {
    /// Loads the persisted shortlist. Unreadable storage starts an empty list.
    pub fn load(storage: S) -> Self {
        let mut entries = storage.load().unwrap_or_else(|e| {
            warn!("Discarding unreadable shortlist: {e}");
            Vec::new()
        });
        dedup_and_cap(&mut entries);
        Self { storage, entries }
    }

    pub fn entries(&self) -> &[ShortlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= SHORTLIST_CAPACITY
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&ShortlistEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Removes `candidate` if shortlisted, otherwise adds it with a suggested
    /// reason. Adding to a full shortlist fails and changes nothing.
    pub fn toggle(&mut self, candidate: &Candidate) -> Result<Toggled, ShortlistError> {
        if self.contains(&candidate.id) {
            let next = self.without(&candidate.id);
            self.commit(next)?;
            return Ok(Toggled::Removed);
        }
        self.ensure_capacity()?;
        let mut next = self.entries.clone();
        next.push(ShortlistEntry::new(candidate, suggest_reason(candidate)));
        self.commit(next)?;
        Ok(Toggled::Added)
    }

    /// Sets the reason of an existing entry, or shortlists `candidate` with
    /// `reason` when it is not yet present.
    pub fn note(&mut self, candidate: &Candidate, reason: &str) -> Result<(), ShortlistError> {
        let mut next = self.entries.clone();
        if let Some(entry) = next.iter_mut().find(|e| e.id() == candidate.id) {
            entry.candidate.reason = reason.to_string();
        } else {
            self.ensure_capacity()?;
            next.push(ShortlistEntry::new(candidate, reason));
        }
        self.commit(next)
    }

    /// No-op when `id` is not shortlisted.
    pub fn set_reason(&mut self, id: &str, reason: &str) -> Result<(), ShortlistError> {
        if !self.contains(id) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        for entry in next.iter_mut().filter(|e| e.id() == id) {
            entry.candidate.reason = reason.to_string();
        }
        self.commit(next)
    }

    /// No-op when `id` is not shortlisted.
    pub fn remove(&mut self, id: &str) -> Result<(), ShortlistError> {
        if !self.contains(id) {
            return Ok(());
        }
        let next = self.without(id);
        self.commit(next)
    }

    fn without(&self, id: &str) -> Vec<ShortlistEntry> {
        self.entries
            .iter()
            .filter(|e| e.id() != id)
            .cloned()
            .collect()
    }

    fn ensure_capacity(&self) -> Result<(), ShortlistError> {
        if self.is_full() {
            return Err(ShortlistError::Full {
                capacity: SHORTLIST_CAPACITY,
            });
        }
        Ok(())
    }

    /// Saves `next` and only then makes it the in-memory list, so a failed
    /// save leaves memory matching storage.
    fn commit(&mut self, next: Vec<ShortlistEntry>) -> Result<(), ShortlistError> {
        self.storage.save(&next)?;
        debug!("Saved shortlist with {} entries", next.len());
        self.entries = next;
        Ok(())
    }
}

/// Storage edited by hand may break the invariants; keep the first
/// occurrence of each id and at most `SHORTLIST_CAPACITY` entries.
fn dedup_and_cap(entries: &mut Vec<ShortlistEntry>) {
    let mut seen = std::collections::HashSet::new();
    entries.retain(|e| seen.insert(e.id().to_string()));
    if entries.len() > SHORTLIST_CAPACITY {
        warn!(
            "Shortlist storage held {} entries; keeping the first {SHORTLIST_CAPACITY}",
            entries.len()
        );
        entries.truncate(SHORTLIST_CAPACITY);
    }
}
