use std::path::PathBuf;
use thiserror::Error;

use crate::model::{ArtifactError, AssignmentId};

#[derive(Error, Debug)]
/// Errors returned by an [`ArtifactStore`](super::ArtifactStore).
pub enum StoreError {
    /// An artifact is already stored for the assignment.
    #[error("an inference artifact already exists for assignment {assignment_id}")]
    AlreadyExists {
        /// Assignment id.
        assignment_id: AssignmentId,
    },

    /// No artifact is stored for the assignment.
    #[error("no inference artifact exists for assignment {assignment_id}")]
    NotFound {
        /// Assignment id.
        assignment_id: AssignmentId,
    },

    /// The artifact offered to `create` is malformed.
    #[error("refusing to store malformed artifact for assignment {assignment_id}: {source}")]
    InvalidArtifact {
        /// Assignment id.
        assignment_id: AssignmentId,
        #[source]
        source: ArtifactError,
    },

    /// A stored artifact file is readable JSON but structurally broken.
    #[error("stored artifact at {path} is corrupt: {source}")]
    Corrupt {
        /// File path.
        path: PathBuf,
        #[source]
        source: ArtifactError,
    },

    /// IO error.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File or directory path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("serialization error at {path}: {source}")]
    Serialization {
        /// File path.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Storage root path is missing/unavailable.
    #[error("storage path unavailable: {path}")]
    StorageUnavailable {
        /// Path that was unavailable.
        path: PathBuf,
    },
}

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
