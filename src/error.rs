//! Crate-level error and its caller-facing classification.

use std::fmt;

use thiserror::Error;

use crate::assignment::AssignmentError;
use crate::grouping::GroupingError;
use crate::inference::GenerationError;
use crate::store::StoreError;

/// Caller-facing error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Assignment, artifact, question or baseline answer absent.
    NotFound,
    /// An artifact already exists for the assignment.
    AlreadyExists,
    /// Missing or malformed request data.
    InvalidInput,
    /// Extractor/embedder failure or degenerate similarity input.
    ComputationFault,
    /// Persistence-layer I/O or corrupt stored data.
    Storage,
}

impl ErrorKind {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::ComputationFault => "computation_fault",
            ErrorKind::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
/// Any failure of an [`InferenceService`](crate::service::InferenceService) operation.
pub enum Error {
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Grouping(#[from] GroupingError),

    #[error("background task failed: {reason}")]
    Task { reason: String },
}

impl Error {
    /// Classifies the error for the caller.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidRequest { .. } => ErrorKind::InvalidInput,
            Error::Assignment(e) => match e {
                AssignmentError::NotFound { .. } => ErrorKind::NotFound,
                AssignmentError::Parse { .. } => ErrorKind::InvalidInput,
                AssignmentError::Io { .. } => ErrorKind::Storage,
            },
            Error::Generation(e) if e.is_invalid_input() => ErrorKind::InvalidInput,
            Error::Generation(_) => ErrorKind::ComputationFault,
            Error::Store(e) => match e {
                StoreError::NotFound { .. } => ErrorKind::NotFound,
                StoreError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
                StoreError::InvalidArtifact { .. } => ErrorKind::InvalidInput,
                StoreError::Corrupt { .. }
                | StoreError::Io { .. }
                | StoreError::Serialization { .. }
                | StoreError::StorageUnavailable { .. } => ErrorKind::Storage,
            },
            Error::Grouping(e) => match e {
                GroupingError::QuestionNotFound { .. } | GroupingError::BaselineNotFound { .. } => {
                    ErrorKind::NotFound
                }
                GroupingError::InvalidThreshold { .. } => ErrorKind::InvalidInput,
                GroupingError::MissingResult { .. } | GroupingError::Similarity { .. } => {
                    ErrorKind::ComputationFault
                }
            },
            Error::Task { .. } => ErrorKind::ComputationFault,
        }
    }
}

/// Convenience result type for service operations.
pub type Result<T> = std::result::Result<T, Error>;
