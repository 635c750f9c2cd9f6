use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::{ArtifactStore, StoreError, StoreResult};
use crate::constants::{INFERENCES_FILE_EXTENSION, INFERENCES_FILE_SUFFIX};
use crate::model::{AssignmentId, InferenceArtifact};

/// Stores each artifact as `<assignment_id>_inferences.json` under one directory.
///
/// Writes go to a temp file in the same directory and are linked into place only if
/// no artifact file exists yet, so readers see either nothing or a complete file.
/// Operations on the same assignment are serialized through a per-id lock.
#[derive(Debug)]
pub struct FileArtifactStore {
    storage_path: PathBuf,
    locks: Mutex<HashMap<AssignmentId, Arc<Mutex<()>>>>,
}

impl FileArtifactStore {
    /// Creates a store rooted at `storage_path` (created lazily on first write).
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the root storage directory.
    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    /// Ensures the root storage directory exists.
    pub fn ensure_storage_path(&self) -> StoreResult<()> {
        if self.storage_path.exists() && !self.storage_path.is_dir() {
            return Err(StoreError::StorageUnavailable {
                path: self.storage_path.clone(),
            });
        }
        fs::create_dir_all(&self.storage_path).map_err(|_| StoreError::StorageUnavailable {
            path: self.storage_path.clone(),
        })
    }

    /// File path holding the artifact of `assignment_id`.
    pub fn artifact_path(&self, assignment_id: AssignmentId) -> PathBuf {
        self.storage_path.join(artifact_file_name(assignment_id))
    }

    /// Runs `op` while holding the lock of `assignment_id`.
    ///
    /// The lock entry is dropped from the table once no other caller holds it.
    fn with_lock<T>(&self, assignment_id: AssignmentId, op: impl FnOnce() -> T) -> T {
        let lock = Arc::clone(self.locks.lock().entry(assignment_id).or_default());
        let out = {
            let _guard = lock.lock();
            op()
        };

        let mut locks = self.locks.lock();
        // One reference in the table, one held here.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&assignment_id);
        }
        out
    }

    /// Number of assignments with a lock entry in use.
    pub fn tracked_locks(&self) -> usize {
        self.locks.lock().len()
    }

    fn write_new(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut temp = NamedTempFile::new_in(&self.storage_path)?;
        temp.write_all(bytes)?;
        temp.as_file().sync_all()?;
        temp.persist_noclobber(path).map_err(|e| e.error)?;
        Ok(())
    }
}

fn artifact_file_name(assignment_id: AssignmentId) -> String {
    format!(
        "{}{}.{}",
        assignment_id, INFERENCES_FILE_SUFFIX, INFERENCES_FILE_EXTENSION
    )
}

fn parse_artifact_file_name(name: &str) -> Option<AssignmentId> {
    let stem = name.strip_suffix(INFERENCES_FILE_EXTENSION)?.strip_suffix('.')?;
    stem.strip_suffix(INFERENCES_FILE_SUFFIX)?.parse().ok()
}

impl ArtifactStore for FileArtifactStore {
    fn exists(&self, assignment_id: AssignmentId) -> bool {
        self.with_lock(assignment_id, || self.artifact_path(assignment_id).is_file())
    }

    fn create(
        &self,
        assignment_id: AssignmentId,
        artifact: &InferenceArtifact,
    ) -> StoreResult<()> {
        artifact
            .validate()
            .map_err(|source| StoreError::InvalidArtifact {
                assignment_id,
                source,
            })?;

        self.ensure_storage_path()?;
        let path = self.artifact_path(assignment_id);

        let bytes = serde_json::to_vec(artifact).map_err(|source| StoreError::Serialization {
            path: path.clone(),
            source,
        })?;

        let written = self.with_lock(assignment_id, || {
            if path.exists() {
                return Err(io::Error::from(io::ErrorKind::AlreadyExists));
            }
            self.write_new(&path, &bytes)
        });

        match written {
            Ok(()) => {
                info!(
                    %assignment_id,
                    path = %path.display(),
                    bytes = bytes.len(),
                    "Stored inference artifact"
                );
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(StoreError::AlreadyExists { assignment_id })
            }
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn get(&self, assignment_id: AssignmentId) -> StoreResult<InferenceArtifact> {
        let path = self.artifact_path(assignment_id);

        let bytes = match self.with_lock(assignment_id, || fs::read(&path)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound { assignment_id });
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let artifact: InferenceArtifact =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Serialization {
                path: path.clone(),
                source,
            })?;

        if let Err(source) = artifact.validate() {
            warn!(%assignment_id, path = %path.display(), error = %source, "Corrupt artifact file");
            return Err(StoreError::Corrupt { path, source });
        }

        debug!(%assignment_id, "Loaded inference artifact");
        Ok(artifact)
    }

    fn delete(&self, assignment_id: AssignmentId) -> StoreResult<()> {
        let path = self.artifact_path(assignment_id);
        match self.with_lock(assignment_id, || fs::remove_file(&path)) {
            Ok(()) => {
                info!(%assignment_id, "Deleted inference artifact");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound { assignment_id })
            }
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn list(&self) -> StoreResult<Vec<AssignmentId>> {
        if !self.storage_path.exists() {
            return Ok(Vec::new());
        }

        let io_err = |source| StoreError::Io {
            path: self.storage_path.clone(),
            source,
        };

        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.storage_path).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();

            if path.is_file()
                && let Some(name) = path.file_name()
                && let Some(name_str) = name.to_str()
                && let Some(id) = parse_artifact_file_name(name_str)
            {
                ids.push(id);
            }
        }

        ids.sort();
        Ok(ids)
    }
}
