//! Durable record of dismissed banners.
//!
//! The store is a best-effort boundary: reads degrade to "not dismissed" and
//! writes that fail are logged and dropped, so a broken medium never blocks
//! the in-memory dismissal.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// String-keyed boolean store surviving restarts on the same client.
pub trait DismissalStore: Send + Sync {
    /// Whether `key` was recorded as dismissed. `false` when absent or when
    /// the medium is unavailable.
    fn read(&self, key: &str) -> bool;

    /// Record `key` as dismissed. Failures are swallowed.
    fn write_dismissed(&self, key: &str);
}

/// Failures of the file-backed medium. Never surfaced past the trait.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("dismissal store I/O at {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// The backing file is not valid JSON for this schema.
    #[error("dismissal store {path} is corrupt: {source}")]
    Corrupt {
        /// Offending file.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },
}

/// One persisted dismissal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DismissalRecord {
    /// Always true for records written by the shell.
    pub dismissed: bool,
    /// When the dismissal was recorded.
    pub dismissed_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct DismissalFile {
    #[serde(default)]
    dismissals: BTreeMap<String, DismissalRecord>,
}

/// JSON file store, e.g. `~/.local/share/bloom-portal/dismissals.json`.
pub struct FileDismissalStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileDismissalStore {
    /// Store backed by the file at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Backing file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full record for `key`, if present and readable.
    pub fn record(&self, key: &str) -> Result<Option<DismissalRecord>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.dismissals.get(key).cloned())
    }

    fn load(&self) -> Result<DismissalFile, StoreError> {
        if !self.path.exists() {
            return Ok(DismissalFile::default());
        }
        let contents = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn persist(&self, file: &DismissalFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let serialized = serde_json::to_vec_pretty(file).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, serialized).map_err(|source| StoreError::Io {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn try_write(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut file = match self.load() {
            Ok(file) => file,
            Err(err @ StoreError::Corrupt { .. }) => {
                warn!(%err, "replacing unreadable dismissal store");
                DismissalFile::default()
            }
            Err(err) => return Err(err),
        };
        file.dismissals.insert(
            key.to_string(),
            DismissalRecord {
                dismissed: true,
                dismissed_at: Utc::now(),
            },
        );
        self.persist(&file)
    }
}

impl DismissalStore for FileDismissalStore {
    fn read(&self, key: &str) -> bool {
        match self.record(key) {
            Ok(record) => record.map(|record| record.dismissed).unwrap_or(false),
            Err(err) => {
                warn!(%err, key, "dismissal store unavailable; treating as not dismissed");
                false
            }
        }
    }

    fn write_dismissed(&self, key: &str) {
        match self.try_write(key) {
            Ok(()) => debug!(key, path = %self.path.display(), "dismissal persisted"),
            Err(err) => warn!(%err, key, "failed to persist dismissal"),
        }
    }
}

/// Process-local store; used when no durable medium is available and in tests.
#[derive(Debug, Default)]
pub struct MemoryDismissalStore {
    entries: Mutex<HashMap<String, bool>>,
}

impl MemoryDismissalStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with dismissals for `keys`.
    pub fn with_dismissed<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = keys.into_iter().map(|key| (key.into(), true)).collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Number of recorded keys.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl DismissalStore for MemoryDismissalStore {
    fn read(&self, key: &str) -> bool {
        self.entries.lock().get(key).copied().unwrap_or(false)
    }

    fn write_dismissed(&self, key: &str) {
        self.entries.lock().insert(key.to_string(), true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn file_store_round_trip_survives_reopen() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("state").join("dismissals.json");

        let store = FileDismissalStore::new(&path);
        assert!(!store.read("banner:a"));
        store.write_dismissed("banner:a");
        assert!(path.exists());

        let reopened = FileDismissalStore::new(&path);
        assert!(reopened.read("banner:a"));
        assert!(!reopened.read("banner:b"));
        let record = reopened.record("banner:a")?.expect("record persisted");
        assert!(record.dismissed);
        Ok(())
    }

    #[test]
    fn writes_keep_other_keys() -> Result<()> {
        let dir = tempdir()?;
        let store = FileDismissalStore::new(dir.path().join("dismissals.json"));
        store.write_dismissed("one");
        store.write_dismissed("two");
        assert!(store.read("one"));
        assert!(store.read("two"));
        Ok(())
    }

    #[test]
    fn corrupt_file_reads_as_not_dismissed_and_is_replaced() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("dismissals.json");
        fs::write(&path, "{ not json")?;
        let store = FileDismissalStore::new(&path);
        assert!(!store.read("banner:a"));
        assert!(matches!(store.record("banner:a"), Err(StoreError::Corrupt { .. })));

        store.write_dismissed("banner:a");
        assert!(store.read("banner:a"));
        Ok(())
    }

    #[test]
    fn unwritable_medium_is_swallowed() -> Result<()> {
        let dir = tempdir()?;
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory")?;
        let store = FileDismissalStore::new(blocker.join("dismissals.json"));
        store.write_dismissed("banner:a");
        assert!(!store.read("banner:a"));
        Ok(())
    }

    #[test]
    fn memory_store_seeds_and_records() {
        let store = MemoryDismissalStore::with_dismissed(["seeded"]);
        assert!(store.read("seeded"));
        assert!(!store.read("fresh"));
        store.write_dismissed("fresh");
        assert!(store.read("fresh"));
        assert_eq!(store.len(), 2);
    }
}
