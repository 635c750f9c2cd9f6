//! Embedding providers.
//!
//! The generator only sees the [`Embedder`] capability. [`HashEmbedder`] is the
//! deterministic in-tree provider; model-backed providers plug in behind the same trait.

mod error;
/// Token-hashing embedder.
pub mod hash;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::EmbeddingError;
pub use hash::HashEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;

/// Maps text to a fixed-length vector.
///
/// Implementations must be pure functions of their input: the generator calls
/// [`embed`](Embedder::embed) concurrently from several worker threads.
pub trait Embedder: Send + Sync {
    /// Embeds `text`; the result has [`embedding_dim`](Embedder::embedding_dim) entries.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Output dimension of this provider instance.
    fn embedding_dim(&self) -> usize;
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed(text)
    }

    fn embedding_dim(&self) -> usize {
        (**self).embedding_dim()
    }
}

impl<E: Embedder + ?Sized> Embedder for std::sync::Arc<E> {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed(text)
    }

    fn embedding_dim(&self) -> usize {
        (**self).embedding_dim()
    }
}
