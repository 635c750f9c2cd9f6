use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised by an [`Embedder`](super::Embedder).
pub enum EmbeddingError {
    #[error("embedding inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },
}
