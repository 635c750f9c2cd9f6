use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ExtractionError, Span, SpanExtractor};

/// Deterministic extractor for tests.
///
/// By default the span is the whole context. Individual `(question, context)` pairs
/// can be pinned to a span with [`with_span`](Self::with_span), and contexts passed to
/// [`failing_on`](Self::failing_on) make extraction fail.
#[derive(Debug, Default)]
pub struct MockExtractor {
    spans: HashMap<(String, String), Span>,
    failures: HashSet<String>,
    calls: AtomicUsize,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_span(
        mut self,
        question: impl Into<String>,
        context: impl Into<String>,
        span: Span,
    ) -> Self {
        self.spans.insert((question.into(), context.into()), span);
        self
    }

    pub fn failing_on(mut self, context: impl Into<String>) -> Self {
        self.failures.insert(context.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SpanExtractor for MockExtractor {
    fn extract(&self, question: &str, context: &str) -> Result<Span, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failures.contains(context) {
            return Err(ExtractionError::ExtractionFailed {
                reason: format!("mock failure for context '{}'", context),
            });
        }

        if let Some(span) = self.spans.get(&(question.to_string(), context.to_string())) {
            return Ok(span.clone());
        }

        Ok(Span::from_char_range(context, 0, context.chars().count()))
    }
}
