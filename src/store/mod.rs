//! Artifact persistence: at most one [`InferenceArtifact`] per assignment.
//!
//! - [`MemoryArtifactStore`] keeps artifacts in a map (tests, embedding in a larger
//!   process).
//! - [`FileArtifactStore`] writes one JSON file per assignment in the on-disk shape
//!   described in [`crate::model`].
//!
//! Both serialize operations per assignment id: of two concurrent `create` calls for
//! the same id exactly one succeeds, and a reader never observes a half-written or
//! half-deleted artifact.

mod error;
/// File-per-assignment store.
pub mod file;
/// In-memory store.
pub mod memory;


pub use error::{StoreError, StoreResult};
pub use file::FileArtifactStore;
pub use memory::MemoryArtifactStore;

use crate::model::{AssignmentId, InferenceArtifact};

/// Keyed storage of inference artifacts.
pub trait ArtifactStore: Send + Sync {
    /// Returns `true` if an artifact is stored for `assignment_id`.
    fn exists(&self, assignment_id: AssignmentId) -> bool;

    /// Stores `artifact`. Fails with [`StoreError::AlreadyExists`] if one is present
    /// and with [`StoreError::InvalidArtifact`] if it fails validation.
    fn create(&self, assignment_id: AssignmentId, artifact: &InferenceArtifact)
    -> StoreResult<()>;

    /// Loads the stored artifact. Fails with [`StoreError::NotFound`] if absent.
    fn get(&self, assignment_id: AssignmentId) -> StoreResult<InferenceArtifact>;

    /// Removes the stored artifact. Fails with [`StoreError::NotFound`] if absent.
    fn delete(&self, assignment_id: AssignmentId) -> StoreResult<()>;

    /// Assignment ids that currently have an artifact, sorted.
    fn list(&self) -> StoreResult<Vec<AssignmentId>>;
}

impl<S: ArtifactStore + ?Sized> ArtifactStore for std::sync::Arc<S> {
    fn exists(&self, assignment_id: AssignmentId) -> bool {
        (**self).exists(assignment_id)
    }

    fn create(
        &self,
        assignment_id: AssignmentId,
        artifact: &InferenceArtifact,
    ) -> StoreResult<()> {
        (**self).create(assignment_id, artifact)
    }

    fn get(&self, assignment_id: AssignmentId) -> StoreResult<InferenceArtifact> {
        (**self).get(assignment_id)
    }

    fn delete(&self, assignment_id: AssignmentId) -> StoreResult<()> {
        (**self).delete(assignment_id)
    }

    fn list(&self) -> StoreResult<Vec<AssignmentId>> {
        (**self).list()
    }
}
