//! Cross-cutting, shared constants.
//!
//! # Dimension Invariants
//!
//! Every embedding inside one inference artifact has the same dimension, fixed by the
//! [`Embedder`](crate::embedding::Embedder) that produced it. [`DEFAULT_EMBEDDING_DIM`]
//! is only the default for the in-tree hash embedder; use [`validate_embedding_dim`] at
//! module boundaries to catch providers that disagree with their declared size.

/// Default output dimension of [`HashEmbedder`](crate::embedding::HashEmbedder).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Longest span (in characters) the lexical extractor returns by default.
pub const DEFAULT_MAX_SPAN_CHARS: usize = 256;

/// Compute units held back from the generation pool for the orchestrating task.
pub const RESERVED_WORKERS: usize = 1;

/// Suffix appended to an assignment's name to form its artifact file stem.
pub const INFERENCES_FILE_SUFFIX: &str = "_inferences";

/// Extension of persisted artifact files.
pub const INFERENCES_FILE_EXTENSION: &str = "json";

/// Extension of assignment answer files.
pub const ASSIGNMENT_FILE_EXTENSION: &str = "json";

/// Worker count used when none is configured: available parallelism minus
/// [`RESERVED_WORKERS`], never below one.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_sub(RESERVED_WORKERS)
        .max(1)
}

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a produced embedding has the dimension its provider declared.
///
/// # Example
///
/// ```
/// use grouper::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// validate_embedding_dim(384, DEFAULT_EMBEDDING_DIM).unwrap();
/// assert!(validate_embedding_dim(0, 0).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if expected == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
