//! First-encounter tracking.
//!
//! The core consults the store exactly once per arrival trigger; everything
//! after that works off the captured flag. The file-backed store keeps its
//! working set in memory and treats disk failure as a logged inconvenience,
//! never a reason to halt. Worst case the data is re-learned next start.

use crate::types::ActorId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub trait EncounterStore {
    /// Whether this actor has never been seen before.
    fn is_first_encounter(&self, actor: &ActorId) -> bool;

    /// Record that the actor has been seen. Idempotent.
    fn mark_encountered(&mut self, actor: &ActorId);

    /// Re-read any backing storage. Default: nothing to do.
    fn reload(&mut self) {}
}

// ---------------------------------------------------------------------------
// MemoryEncounterStore
// ---------------------------------------------------------------------------

/// Purely in-memory store for tests and simulation.
#[derive(Debug, Default)]
pub struct MemoryEncounterStore {
    seen: HashSet<ActorId>,
}

impl EncounterStore for MemoryEncounterStore {
    fn is_first_encounter(&self, actor: &ActorId) -> bool {
        !self.seen.contains(actor)
    }

    fn mark_encountered(&mut self, actor: &ActorId) {
        self.seen.insert(*actor);
    }
}

// ---------------------------------------------------------------------------
// FileEncounterStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
struct EncounterFile {
    #[serde(default)]
    encountered: Vec<String>,
}

/// YAML-file-backed store. Saves only when a new actor is recorded.
#[derive(Debug)]
pub struct FileEncounterStore {
    path: PathBuf,
    seen: HashSet<ActorId>,
}

impl FileEncounterStore {
    /// Load the store, tolerating a missing file, a malformed file, and
    /// malformed ids. Each costs at most a warning and some forgotten
    /// history.
    pub fn load(path: &Path) -> Self {
        let seen = read_seen(path);
        tracing::debug!(path = %path.display(), actors = seen.len(), "encounter store loaded");
        FileEncounterStore {
            path: path.to_path_buf(),
            seen,
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    fn save(&self) {
        let file = EncounterFile {
            encountered: self.seen.iter().map(|a| a.to_string()).collect(),
        };
        let result = serde_yaml::to_string(&file)
            .map_err(crate::error::VestibuleError::from)
            .and_then(|data| crate::io::atomic_write(&self.path, data.as_bytes()));
        if let Err(err) = result {
            tracing::error!(path = %self.path.display(), %err, "could not save encounter data, continuing in memory");
        }
    }
}

fn read_seen(path: &Path) -> HashSet<ActorId> {
    if !path.exists() {
        return HashSet::new();
    }
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "could not read encounter data, starting empty");
            return HashSet::new();
        }
    };
    let file: EncounterFile = match serde_yaml::from_str(&data) {
        Ok(file) => file,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "malformed encounter data, starting empty");
            return HashSet::new();
        }
    };
    let mut seen = HashSet::new();
    for raw in file.encountered {
        match raw.parse::<ActorId>() {
            Ok(actor) => {
                seen.insert(actor);
            }
            Err(_) => tracing::warn!(id = %raw, "skipping malformed actor id in encounter data"),
        }
    }
    seen
}

impl EncounterStore for FileEncounterStore {
    fn is_first_encounter(&self, actor: &ActorId) -> bool {
        !self.seen.contains(actor)
    }

    fn mark_encountered(&mut self, actor: &ActorId) {
        if self.seen.insert(*actor) {
            self.save();
        }
    }

    fn reload(&mut self) {
        self.seen = read_seen(&self.path);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
