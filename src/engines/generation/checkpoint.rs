use super::population::{Population, PopulationEntry};
use crate::error::{EvoAlignError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// External snapshot of a population shared by cooperating engines.
///
/// Writes are full overwrites with no locking: two engines storing at the
/// same time can lose each other's additions (last writer wins).
pub trait CheckpointStore: Send {
    /// `Ok(None)` when there is nothing stored yet.
    fn load(&self) -> Result<Option<Population>>;

    fn store(&self, population: &Population) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct CheckpointFile {
    saved_at: DateTime<Utc>,
    entries: Vec<PopulationEntry>,
}

/// JSON checkpoint on disk.
#[derive(Debug, Clone)]
pub struct FileCheckpoint {
    path: PathBuf,
}

impl FileCheckpoint {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CheckpointStore for FileCheckpoint {
    fn load(&self) -> Result<Option<Population>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(EvoAlignError::CheckpointIo(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let file: CheckpointFile = serde_json::from_str(&contents).map_err(|e| {
            EvoAlignError::CheckpointIo(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        let total = file.entries.len();
        let population: Population = file
            .entries
            .into_iter()
            .filter(|entry| match entry.alignment.validate() {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("Dropping malformed checkpoint entry {}: {}", entry.fitness, e);
                    false
                }
            })
            .collect();

        log::debug!(
            "Loaded {} of {} checkpoint entries saved at {}",
            population.len(),
            total,
            file.saved_at.to_rfc3339()
        );
        Ok(Some(population))
    }

    fn store(&self, population: &Population) -> Result<()> {
        let file = CheckpointFile {
            saved_at: Utc::now(),
            entries: population.entries(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        let tmp = self.tmp_path();
        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                EvoAlignError::CheckpointIo(format!(
                    "Failed to write {}: {}",
                    self.path.display(),
                    e
                ))
            })
    }
}

/// In-process store. Clones share the same snapshot, which lets several
/// engines in one process cooperate the way separate processes do through
/// a [`FileCheckpoint`].
#[derive(Debug, Clone, Default)]
pub struct MemoryCheckpoint {
    inner: Arc<Mutex<Option<Population>>>,
}

impl MemoryCheckpoint {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CheckpointStore for MemoryCheckpoint {
    fn load(&self) -> Result<Option<Population>> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| EvoAlignError::CheckpointIo("checkpoint lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn store(&self, population: &Population) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| EvoAlignError::CheckpointIo("checkpoint lock poisoned".to_string()))?;
        *guard = Some(population.clone());
        Ok(())
    }
}

/// What happened during one checkpoint synchronization.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckpointOutcome {
    /// Entries read from the store.
    pub loaded: usize,
    /// Entries that were new to the in-memory population.
    pub merged: usize,
    /// Members removed by the post-merge prune.
    pub pruned: usize,
    pub stored: bool,
    /// Load or store failure, if any. Never fatal.
    pub error: Option<String>,
}
