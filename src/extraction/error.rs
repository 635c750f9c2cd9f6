use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised by a [`SpanExtractor`](super::SpanExtractor).
pub enum ExtractionError {
    #[error("span extraction failed: {reason}")]
    ExtractionFailed { reason: String },

    #[error("invalid extractor configuration: {reason}")]
    InvalidConfig { reason: String },
}
