//! Data model shared by the generator, the store and the grouper.
//!
//! The serde shapes here are the on-disk format: an [`InferenceArtifact`] serializes to
//! `{"questions": [...], "inferences": {"<answer_id>": [{"answer", "start_ind",
//! "end_ind", "answer_embedding"}, ...]}}`.

mod error;


pub use error::ArtifactError;

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a student answer, unique within an assignment.
pub type AnswerId = i64;

/// A question posed against every answer. Identity is its exact text.
pub type Question = String;

/// Identifier of an assignment; artifacts are keyed 1:1 by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId(Uuid);

impl AssignmentId {
    /// Wraps an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generates a fresh random id.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the wrapped UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssignmentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl From<Uuid> for AssignmentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// One student's free-text response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Answer id (unique within the assignment).
    pub id: AnswerId,
    /// Student name or handle.
    pub student: String,
    /// Answer text. Stored as `answer` in assignment files.
    #[serde(rename = "answer")]
    pub text: String,
}

impl Answer {
    /// Creates an answer.
    pub fn new(id: AnswerId, student: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            student: student.into(),
            text: text.into(),
        }
    }

    /// Key under which this answer's results are stored in an artifact.
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}

/// Result of applying one question to one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Extracted answer span.
    pub answer: String,
    /// Character offset where the span starts in the answer text.
    pub start_ind: usize,
    /// Character offset one past the end of the span.
    pub end_ind: usize,
    /// Embedding of [`answer`](Self::answer).
    pub answer_embedding: Vec<f32>,
}

/// The full (answers x questions) grid for one assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceArtifact {
    /// Questions in the order they were supplied.
    pub questions: Vec<Question>,
    /// Per-answer results; position `i` corresponds to `questions[i]`.
    pub inferences: BTreeMap<String, Vec<InferenceResult>>,
}

impl InferenceArtifact {
    /// Creates an artifact without validating it (see [`validate`](Self::validate)).
    pub fn new(
        questions: Vec<Question>,
        inferences: BTreeMap<String, Vec<InferenceResult>>,
    ) -> Self {
        Self {
            questions,
            inferences,
        }
    }

    /// Position of `question` in [`questions`](Self::questions).
    pub fn question_index(&self, question: &str) -> Option<usize> {
        self.questions.iter().position(|q| q == question)
    }

    /// Results row for an answer key.
    pub fn results(&self, answer_key: &str) -> Option<&[InferenceResult]> {
        self.inferences.get(answer_key).map(Vec::as_slice)
    }

    /// Number of answers in the grid.
    pub fn answer_count(&self) -> usize {
        self.inferences.len()
    }

    /// Dimension of the stored embeddings, if the grid is non-empty.
    pub fn embedding_dim(&self) -> Option<usize> {
        self.inferences
            .values()
            .flat_map(|row| row.first())
            .map(|r| r.answer_embedding.len())
            .next()
    }

    /// Checks question distinctness, row lengths and embedding dimensions.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.questions.is_empty() {
            return Err(ArtifactError::NoQuestions);
        }

        let mut seen = HashSet::with_capacity(self.questions.len());
        for question in &self.questions {
            if !seen.insert(question.as_str()) {
                return Err(ArtifactError::DuplicateQuestion {
                    question: question.clone(),
                });
            }
        }

        let dim = self.embedding_dim();
        for (answer_id, row) in &self.inferences {
            if row.len() != self.questions.len() {
                return Err(ArtifactError::RowLengthMismatch {
                    answer_id: answer_id.clone(),
                    expected: self.questions.len(),
                    actual: row.len(),
                });
            }

            for (question_index, result) in row.iter().enumerate() {
                if Some(result.answer_embedding.len()) != dim {
                    return Err(ArtifactError::InconsistentDimension {
                        answer_id: answer_id.clone(),
                        question_index,
                        expected: dim.unwrap_or_default(),
                        actual: result.answer_embedding.len(),
                    });
                }
            }
        }

        Ok(())
    }
}
