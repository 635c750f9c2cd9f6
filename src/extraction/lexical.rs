use std::collections::HashSet;

use tracing::trace;

use super::{ExtractionError, Span, SpanExtractor};
use crate::constants::DEFAULT_MAX_SPAN_CHARS;

const SENTENCE_TERMINATORS: [char; 4] = ['.', '!', '?', '\n'];

// Interrogatives and fillers that appear in most questions.
const STOPWORDS: &[&str] = &[
    "the", "and", "are", "was", "were", "what", "which", "who", "whom", "whose", "when",
    "where", "why", "how", "does", "did", "for", "from", "that", "this", "with", "you",
    "your", "can", "has", "have", "into", "its", "about", "explain", "describe",
];

/// Picks the sentence of the context sharing the most terms with the question.
///
/// Terms are lowercase alphanumeric tokens of at least three characters that are not
/// stopwords. Ties go to the earlier sentence; a question without terms selects the
/// first sentence. Spans are truncated to `max_span_chars`.
#[derive(Debug, Clone)]
pub struct LexicalExtractor {
    max_span_chars: usize,
}

impl LexicalExtractor {
    /// Creates an extractor returning spans of at most `max_span_chars` characters.
    pub fn new(max_span_chars: usize) -> Result<Self, ExtractionError> {
        if max_span_chars == 0 {
            return Err(ExtractionError::InvalidConfig {
                reason: "max_span_chars must be at least 1".to_string(),
            });
        }
        Ok(Self { max_span_chars })
    }

    /// Longest span this extractor returns.
    pub fn max_span_chars(&self) -> usize {
        self.max_span_chars
    }
}

impl Default for LexicalExtractor {
    fn default() -> Self {
        Self {
            max_span_chars: DEFAULT_MAX_SPAN_CHARS,
        }
    }
}

impl SpanExtractor for LexicalExtractor {
    fn extract(&self, question: &str, context: &str) -> Result<Span, ExtractionError> {
        let chars: Vec<char> = context.chars().collect();
        let query = terms(question);

        let mut best: Option<((usize, usize), usize)> = None;
        for (start, end) in sentences(&chars) {
            let sentence: String = chars[start..end].iter().collect();
            let score = terms(&sentence).intersection(&query).count();

            if best.is_none_or(|(_, top)| score > top) {
                best = Some(((start, end), score));
            }
        }

        let Some(((start, end), score)) = best else {
            return Ok(Span {
                answer: String::new(),
                start: 0,
                end: 0,
            });
        };

        let end = end.min(start.saturating_add(self.max_span_chars));
        trace!(start, end, score, "selected span");
        Ok(Span::from_char_range(context, start, end))
    }
}

fn terms(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 3 && !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// Character ranges of the non-blank sentences, trimmed of surrounding whitespace.
/// A sentence keeps its terminator.
fn sentences(chars: &[char]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0;

    for (i, c) in chars.iter().enumerate() {
        if SENTENCE_TERMINATORS.contains(c) {
            push_trimmed(chars, start, i + 1, &mut ranges);
            start = i + 1;
        }
    }
    push_trimmed(chars, start, chars.len(), &mut ranges);

    ranges
}

fn push_trimmed(chars: &[char], mut start: usize, mut end: usize, out: &mut Vec<(usize, usize)>) {
    while start < end && chars[start].is_whitespace() {
        start += 1;
    }
    while end > start && chars[end - 1].is_whitespace() {
        end -= 1;
    }
    if chars[start..end].iter().any(|c| c.is_alphanumeric()) {
        out.push((start, end));
    }
}
