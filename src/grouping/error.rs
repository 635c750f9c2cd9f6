use thiserror::Error;

use crate::model::AnswerId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Degenerate inputs to [`cosine_similarity`](super::cosine_similarity).
pub enum SimilarityError {
    /// Vectors have different lengths.
    #[error("vector dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// One of the vectors has zero magnitude (cosine is undefined).
    #[error("zero-magnitude vector")]
    ZeroMagnitude,
}

#[derive(Debug, Clone, PartialEq, Error)]
/// Errors returned by [`group`](super::group).
pub enum GroupingError {
    /// The question was not part of the inference run.
    #[error("no inferences were made for question '{question}'")]
    QuestionNotFound {
        /// Requested question.
        question: String,
    },

    /// The baseline answer is not in the artifact.
    #[error("answer {answer_id} does not exist in the inferences")]
    BaselineNotFound {
        /// Requested baseline id.
        answer_id: AnswerId,
    },

    /// Threshold is NaN or infinite.
    #[error("similarity threshold must be finite, got {threshold}")]
    InvalidThreshold {
        /// Supplied threshold.
        threshold: f64,
    },

    /// An answer row has no result at the question's position.
    #[error("answer {answer_id} has no result for question #{question_index}")]
    MissingResult {
        /// Offending answer key.
        answer_id: String,
        /// Position of the question.
        question_index: usize,
    },

    /// Cosine similarity could not be computed for an answer.
    #[error("similarity undefined for answer {answer_id}: {source}")]
    Similarity {
        /// Answer compared against the baseline.
        answer_id: String,
        #[source]
        source: SimilarityError,
    },
}

/// Convenience result type for grouping.
pub type GroupingResult<T> = Result<T, GroupingError>;
