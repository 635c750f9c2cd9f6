//! Similarity grouping against a baseline answer.
//!
//! Reads an existing [`InferenceArtifact`]; nothing is recomputed. The baseline is
//! compared with itself like every other answer, so it is part of its own group
//! whenever the threshold is below `1.0`.

mod error;


pub use error::{GroupingError, GroupingResult, SimilarityError};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{AnswerId, InferenceArtifact};

/// One answer that cleared the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    /// Answer key (as stored in the artifact).
    pub answer_id: String,
    /// Cosine similarity to the baseline.
    pub similarity: f64,
}

/// Answers similar to a baseline, keyed by answer id.
pub type AnswerGroup = BTreeMap<String, GroupMember>;

/// Cosine similarity `dot(a, b) / (|a| * |b|)`, clamped to `[-1, 1]`.
///
/// Accumulates in `f64`; a vector compared with itself yields exactly `1.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let (dot, norm_a_sq, norm_b_sq) =
        a.iter()
            .zip(b.iter())
            .fold((0.0f64, 0.0f64, 0.0f64), |(dot, na, nb), (&av, &bv)| {
                let av = f64::from(av);
                let bv = f64::from(bv);
                (dot + av * bv, na + av * av, nb + bv * bv)
            });

    if norm_a_sq == 0.0 || norm_b_sq == 0.0 {
        return Err(SimilarityError::ZeroMagnitude);
    }

    Ok((dot / (norm_a_sq * norm_b_sq).sqrt()).clamp(-1.0, 1.0))
}

/// Returns every answer whose embedding for `question` has cosine similarity to the
/// baseline's strictly greater than `threshold`.
pub fn group(
    artifact: &InferenceArtifact,
    question: &str,
    baseline_answer_id: AnswerId,
    threshold: f64,
) -> GroupingResult<AnswerGroup> {
    if !threshold.is_finite() {
        return Err(GroupingError::InvalidThreshold { threshold });
    }

    let question_ind =
        artifact
            .question_index(question)
            .ok_or_else(|| GroupingError::QuestionNotFound {
                question: question.to_string(),
            })?;

    let baseline_key = baseline_answer_id.to_string();
    let baseline_row = artifact
        .results(&baseline_key)
        .ok_or(GroupingError::BaselineNotFound {
            answer_id: baseline_answer_id,
        })?;
    let base_embedding = &baseline_row
        .get(question_ind)
        .ok_or_else(|| GroupingError::MissingResult {
            answer_id: baseline_key.clone(),
            question_index: question_ind,
        })?
        .answer_embedding;

    let mut group = AnswerGroup::new();
    for (answer_id, results) in &artifact.inferences {
        let result = results
            .get(question_ind)
            .ok_or_else(|| GroupingError::MissingResult {
                answer_id: answer_id.clone(),
                question_index: question_ind,
            })?;

        let similarity =
            cosine_similarity(base_embedding, &result.answer_embedding).map_err(|source| {
                GroupingError::Similarity {
                    answer_id: answer_id.clone(),
                    source,
                }
            })?;

        if similarity > threshold {
            group.insert(
                answer_id.clone(),
                GroupMember {
                    answer_id: answer_id.clone(),
                    similarity,
                },
            );
        }
    }

    debug!(
        question_ind,
        baseline = baseline_answer_id,
        threshold,
        matched = group.len(),
        "Grouped answers"
    );

    Ok(group)
}
