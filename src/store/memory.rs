use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::{ArtifactStore, StoreError, StoreResult};
use crate::model::{AssignmentId, InferenceArtifact};

/// Map-backed [`ArtifactStore`]. Every operation holds the map lock for its whole
/// duration, which makes each one atomic.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    artifacts: RwLock<HashMap<AssignmentId, Arc<InferenceArtifact>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.read().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.artifacts.read().is_empty()
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn exists(&self, assignment_id: AssignmentId) -> bool {
        self.artifacts.read().contains_key(&assignment_id)
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

        match self.artifacts.write().entry(assignment_id) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists { assignment_id }),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(artifact.clone()));
                debug!(%assignment_id, "Stored artifact in memory");
                Ok(())
            }
        }
    }

    fn get(&self, assignment_id: AssignmentId) -> StoreResult<InferenceArtifact> {
        self.artifacts
            .read()
            .get(&assignment_id)
            .map(|artifact| InferenceArtifact::clone(artifact))
            .ok_or(StoreError::NotFound { assignment_id })
    }

    fn delete(&self, assignment_id: AssignmentId) -> StoreResult<()> {
        self.artifacts
            .write()
            .remove(&assignment_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { assignment_id })
    }

    fn list(&self) -> StoreResult<Vec<AssignmentId>> {
        let mut ids: Vec<AssignmentId> = self.artifacts.read().keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}
