use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Embedder, EmbeddingError, HashEmbedder};

/// Table-driven embedder for tests.
///
/// Texts registered with [`with_vector`](Self::with_vector) embed to that vector,
/// texts registered with [`failing_on`](Self::failing_on) return an error, and
/// everything else falls back to a [`HashEmbedder`] of the same dimension.
#[derive(Debug)]
pub struct MockEmbedder {
    dim: usize,
    vectors: HashMap<String, Vec<f32>>,
    failures: HashSet<String>,
    fallback: HashEmbedder,
    calls: AtomicUsize,
}

impl MockEmbedder {
    /// Creates a mock producing `dim`-dimensional vectors (minimum 1).
    pub fn new(dim: usize) -> Self {
        let dim = dim.max(1);
        Self {
            dim,
            vectors: HashMap::new(),
            failures: HashSet::new(),
            fallback: HashEmbedder::new(dim).unwrap_or_default(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Registers a fixed vector for `text`. The vector may have any length, which
    /// lets tests provoke dimension mismatches.
    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }

    /// Makes [`embed`](Embedder::embed) fail for `text`.
    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.failures.insert(text.into());
        self
    }

    /// Number of `embed` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Embedder for MockEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failures.contains(text) {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("mock failure for '{}'", text),
            });
        }

        match self.vectors.get(text) {
            Some(v) => Ok(v.clone()),
            None => self.fallback.embed(text),
        }
    }

    fn embedding_dim(&self) -> usize {
        self.dim
    }
}
