use thiserror::Error;

use crate::constants::DimValidationError;
use crate::embedding::EmbeddingError;
use crate::extraction::ExtractionError;
use crate::model::AnswerId;

#[derive(Debug, Error)]
/// Errors returned by [`InferenceGenerator`](super::InferenceGenerator).
pub enum GenerationError {
    /// No answers were supplied.
    #[error("no answers to run inference on")]
    NoAnswers,

    /// No questions were supplied.
    #[error("no questions supplied")]
    NoQuestions,

    /// A question was supplied more than once.
    #[error("duplicate question: '{question}'")]
    DuplicateQuestion {
        /// Repeated question text.
        question: String,
    },

    /// Two answers share an id.
    #[error("duplicate answer id: {answer_id}")]
    DuplicateAnswerId {
        /// Repeated id.
        answer_id: AnswerId,
    },

    /// The span extractor failed for one pair.
    #[error("span extraction failed for answer {answer_id}, question '{question}': {source}")]
    Extraction {
        answer_id: AnswerId,
        question: String,
        #[source]
        source: ExtractionError,
    },

    /// The embedder failed for one pair.
    #[error("embedding failed for answer {answer_id}, question '{question}': {source}")]
    Embedding {
        answer_id: AnswerId,
        question: String,
        #[source]
        source: EmbeddingError,
    },

    /// The embedder returned a vector of the wrong size.
    #[error("bad embedding for answer {answer_id}, question '{question}': {source}")]
    Dimension {
        answer_id: AnswerId,
        question: String,
        #[source]
        source: DimValidationError,
    },

    /// A worker task panicked or was cancelled.
    #[error("inference worker failed: {reason}")]
    WorkerFailed {
        /// Error message.
        reason: String,
    },
}

impl GenerationError {
    /// Returns `true` for failures caused by the caller's input rather than the models.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::NoAnswers
                | Self::NoQuestions
                | Self::DuplicateQuestion { .. }
                | Self::DuplicateAnswerId { .. }
        )
    }
}

/// Convenience result type for generation.
pub type GenerationResult<T> = Result<T, GenerationError>;
