//! Grouper library crate (used by the `grouper` binary and integration tests).
//!
//! Infers, for every answer of an assignment and every question, the span of the
//! answer that responds to the question and an embedding of that span. The grid is
//! persisted as one artifact per assignment and later used to group answers by
//! cosine similarity to a baseline answer.
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Answer`], [`AssignmentId`], [`InferenceResult`], [`InferenceArtifact`] - Data model
//! - [`Config`], [`ConfigError`] - Environment configuration
//! - [`Error`], [`ErrorKind`] - Operation errors and their caller-facing class
//!
//! ## Inference
//! - [`SpanExtractor`], [`LexicalExtractor`] - Answer-span extraction
//! - [`Embedder`], [`HashEmbedder`] - Span embeddings
//! - [`InferenceGenerator`] - Bounded-concurrency grid computation
//!
//! ## Persistence & Grouping
//! - [`ArtifactStore`], [`FileArtifactStore`], [`MemoryArtifactStore`] - Artifact store
//! - [`AssignmentSource`], [`DirectoryAssignmentSource`] - Assignment answers
//! - [`group`], [`cosine_similarity`] - Similarity grouping
//! - [`InferenceService`] - The operation surface tying the above together
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod assignment;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod error;
pub mod extraction;
pub mod grouping;
pub mod inference;
pub mod model;
pub mod service;
pub mod store;

pub use assignment::{
    AssignmentError, AssignmentFile, AssignmentResult, AssignmentSource,
    DirectoryAssignmentSource, MemoryAssignmentSource,
};
pub use config::{Config, ConfigError};
pub use constants::{DimValidationError, validate_embedding_dim};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{Embedder, EmbeddingError, HashEmbedder};
pub use error::{Error, ErrorKind, Result};
#[cfg(any(test, feature = "mock"))]
pub use extraction::MockExtractor;
pub use extraction::{ExtractionError, LexicalExtractor, Span, SpanExtractor};
pub use grouping::{
    AnswerGroup, GroupMember, GroupingError, GroupingResult, SimilarityError,
    cosine_similarity, group,
};
pub use inference::{GenerationError, GenerationResult, InferenceGenerator};
pub use model::{
    Answer, AnswerId, ArtifactError, AssignmentId, InferenceArtifact, InferenceResult, Question,
};
pub use service::InferenceService;
pub use store::{
    ArtifactStore, FileArtifactStore, MemoryArtifactStore, StoreError, StoreResult,
};
