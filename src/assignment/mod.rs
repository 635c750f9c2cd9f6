//! Assignment answers, as supplied by the surrounding application.
//!
//! Assignment files hold `{"answers": [{"id", "student", "answer"}, ...]}` and are
//! named `<assignment_id>.json`.

mod error;


pub use error::{AssignmentError, AssignmentResult};

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::ASSIGNMENT_FILE_EXTENSION;
use crate::model::{Answer, AssignmentId};

/// Provides the answers of an assignment.
pub trait AssignmentSource: Send + Sync {
    /// Answers of `assignment_id`, in file order.
    fn answers(&self, assignment_id: AssignmentId) -> AssignmentResult<Vec<Answer>>;

    /// Returns `true` if the assignment is known, without loading its answers.
    fn contains(&self, assignment_id: AssignmentId) -> bool;
}

impl<S: AssignmentSource + ?Sized> AssignmentSource for std::sync::Arc<S> {
    fn answers(&self, assignment_id: AssignmentId) -> AssignmentResult<Vec<Answer>> {
        (**self).answers(assignment_id)
    }

    fn contains(&self, assignment_id: AssignmentId) -> bool {
        (**self).contains(assignment_id)
    }
}

/// On-disk assignment document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentFile {
    pub answers: Vec<Answer>,
}

/// Reads assignment files from a directory.
#[derive(Debug, Clone)]
pub struct DirectoryAssignmentSource {
    root: PathBuf,
}

impl DirectoryAssignmentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file for `assignment_id`.
    pub fn assignment_path(&self, assignment_id: AssignmentId) -> PathBuf {
        self.root
            .join(format!("{}.{}", assignment_id, ASSIGNMENT_FILE_EXTENSION))
    }
}

impl AssignmentSource for DirectoryAssignmentSource {
    fn answers(&self, assignment_id: AssignmentId) -> AssignmentResult<Vec<Answer>> {
        let path = self.assignment_path(assignment_id);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AssignmentError::NotFound { assignment_id });
            }
            Err(source) => return Err(AssignmentError::Io { path, source }),
        };

        let file: AssignmentFile = serde_json::from_slice(&bytes)
            .map_err(|source| AssignmentError::Parse { path, source })?;

        debug!(%assignment_id, answers = file.answers.len(), "Loaded assignment answers");
        Ok(file.answers)
    }

    fn contains(&self, assignment_id: AssignmentId) -> bool {
        self.assignment_path(assignment_id).is_file()
    }
}

/// Map-backed source, for embedding the engine in a process that already holds
/// the answers.
#[derive(Debug, Default)]
pub struct MemoryAssignmentSource {
    assignments: RwLock<HashMap<AssignmentId, Vec<Answer>>>,
}

impl MemoryAssignmentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the answers of an assignment.
    pub fn insert(&self, assignment_id: AssignmentId, answers: Vec<Answer>) {
        self.assignments.write().insert(assignment_id, answers);
    }

    /// Forgets an assignment; returns `true` if it was present.
    pub fn remove(&self, assignment_id: AssignmentId) -> bool {
        self.assignments.write().remove(&assignment_id).is_some()
    }
}

impl AssignmentSource for MemoryAssignmentSource {
    fn answers(&self, assignment_id: AssignmentId) -> AssignmentResult<Vec<Answer>> {
        self.assignments
            .read()
            .get(&assignment_id)
            .cloned()
            .ok_or(AssignmentError::NotFound { assignment_id })
    }

    fn contains(&self, assignment_id: AssignmentId) -> bool {
        self.assignments.read().contains_key(&assignment_id)
    }
}
