//! Progress storage backends.
//!
//! The tracker only sees the [`ProgressStore`] trait; these adapters supply
//! an in-memory map for tests and tooling, and a JSON snapshot file that
//! plays the role browser local storage plays for the site.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::application::progress::ProgressStore;
use crate::infra::error::InfraError;

/// Volatile store; state lives only as long as the value.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProgressStore {
    entries: BTreeMap<String, String>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ProgressStore for InMemoryProgressStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Key-value store persisted as one JSON document on disk.
///
/// Every mutation rewrites the snapshot; an unreadable snapshot on open is
/// treated as absent state, not an error, matching the reader-facing
/// contract that corrupt progress never surfaces as a failure.
#[derive(Debug)]
pub struct JsonFileProgressStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileProgressStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, InfraError> {
        let path = path.into();

        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "discarding unreadable progress snapshot");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(InfraError::Io(err)),
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) {
        let encoded = match serde_json::to_vec_pretty(&self.entries) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(error = %err, "failed to encode progress snapshot");
                return;
            }
        };

        if let Err(err) = fs::write(&self.path, encoded) {
            warn!(path = %self.path.display(), error = %err, "failed to persist progress snapshot");
        }
    }
}

impl ProgressStore for JsonFileProgressStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
        self.persist();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.persist();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_round_trip() {
        let mut store = InMemoryProgressStore::new();
        store.set("k", "v".to_string());

        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.remove("k");
        assert!(store.get("k").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("progress.json");

        {
            let mut store = JsonFileProgressStore::open(&path).expect("open");
            store.set("earned-badges", r#"["x-completion"]"#.to_string());
        }

        let store = JsonFileProgressStore::open(&path).expect("reopen");
        assert_eq!(
            store.get("earned-badges").as_deref(),
            Some(r#"["x-completion"]"#)
        );
    }

    #[test]
    fn unreadable_path_surfaces_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");

        // The directory itself is not a readable snapshot file.
        let err = JsonFileProgressStore::open(dir.path()).expect_err("open fails");
        assert!(matches!(err, InfraError::Io(_)));
    }

    #[test]
    fn corrupt_snapshot_reads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("progress.json");
        fs::write(&path, "not json at all").expect("write");

        let store = JsonFileProgressStore::open(&path).expect("open");
        assert!(store.get("earned-badges").is_none());
    }
}
