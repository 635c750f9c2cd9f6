use std::path::PathBuf;
use thiserror::Error;

use crate::model::AssignmentId;

#[derive(Error, Debug)]
/// Errors returned by an [`AssignmentSource`](super::AssignmentSource).
pub enum AssignmentError {
    #[error("assignment {assignment_id} does not exist")]
    NotFound { assignment_id: AssignmentId },

    #[error("failed to read assignment file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed assignment file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type AssignmentResult<T> = Result<T, AssignmentError>;
