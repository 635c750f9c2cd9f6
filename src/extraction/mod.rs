//! Span extraction: locate the part of an answer text that answers a question.

mod error;
/// Sentence-overlap extractor.
pub mod lexical;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::ExtractionError;
pub use lexical::LexicalExtractor;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockExtractor;

/// A substring of the context, with character offsets (`end` exclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Extracted text.
    pub answer: String,
    /// Character index of the first character in the context.
    pub start: usize,
    /// Character index one past the last character.
    pub end: usize,
}

impl Span {
    /// Builds a span from a character range of `context`.
    ///
    /// The range is clamped to the context, and an `end` before `start` yields an
    /// empty span at `start`.
    pub fn from_char_range(context: &str, start: usize, end: usize) -> Self {
        let len = context.chars().count();
        let start = start.min(len);
        let end = end.clamp(start, len);
        let answer = context.chars().skip(start).take(end - start).collect();
        Self { answer, start, end }
    }
}

/// Maps `(question, context)` to the span of `context` answering `question`.
///
/// Must be a pure function of its inputs; the generator calls it concurrently.
pub trait SpanExtractor: Send + Sync {
    fn extract(&self, question: &str, context: &str) -> Result<Span, ExtractionError>;
}

impl<X: SpanExtractor + ?Sized> SpanExtractor for Box<X> {
    fn extract(&self, question: &str, context: &str) -> Result<Span, ExtractionError> {
        (**self).extract(question, context)
    }
}

impl<X: SpanExtractor + ?Sized> SpanExtractor for std::sync::Arc<X> {
    fn extract(&self, question: &str, context: &str) -> Result<Span, ExtractionError> {
        (**self).extract(question, context)
    }
}
