use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Structural problems in an [`InferenceArtifact`](super::InferenceArtifact).
pub enum ArtifactError {
    /// The artifact has no questions.
    #[error("artifact has no questions")]
    NoQuestions,

    /// The same question appears twice.
    #[error("duplicate question: '{question}'")]
    DuplicateQuestion {
        /// Repeated question text.
        question: String,
    },

    /// An answer row does not have one result per question.
    #[error("answer {answer_id} has {actual} results, expected {expected}")]
    RowLengthMismatch {
        /// Offending answer key.
        answer_id: String,
        /// Number of questions.
        expected: usize,
        /// Number of results found.
        actual: usize,
    },

    /// An embedding's length differs from the rest of the grid.
    #[error(
        "answer {answer_id}, question #{question_index}: embedding dimension {actual}, expected {expected}"
    )]
    InconsistentDimension {
        /// Offending answer key.
        answer_id: String,
        /// Position of the question.
        question_index: usize,
        /// Dimension of the first embedding in the grid.
        expected: usize,
        /// Dimension found.
        actual: usize,
    },
}
