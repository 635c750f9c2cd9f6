use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::error::{GenerationError, GenerationResult};
use crate::constants::{default_worker_count, validate_embedding_dim};
use crate::embedding::Embedder;
use crate::extraction::SpanExtractor;
use crate::model::{Answer, AnswerId, InferenceArtifact, InferenceResult, Question};

/// Runs a [`SpanExtractor`] and an [`Embedder`] over every (answer, question) pair.
pub struct InferenceGenerator<X, E> {
    extractor: Arc<X>,
    embedder: Arc<E>,
    workers: usize,
}

impl<X, E> std::fmt::Debug for InferenceGenerator<X, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceGenerator")
            .field("workers", &self.workers)
            .finish_non_exhaustive()
    }
}

impl<X, E> Clone for InferenceGenerator<X, E> {
    fn clone(&self) -> Self {
        Self {
            extractor: Arc::clone(&self.extractor),
            embedder: Arc::clone(&self.embedder),
            workers: self.workers,
        }
    }
}

impl<X, E> InferenceGenerator<X, E>
where
    X: SpanExtractor + 'static,
    E: Embedder + 'static,
{
    /// Creates a generator using [`default_worker_count`] workers.
    pub fn new(extractor: X, embedder: E) -> Self {
        Self::from_shared(Arc::new(extractor), Arc::new(embedder))
    }

    /// Creates a generator from already-shared providers.
    pub fn from_shared(extractor: Arc<X>, embedder: Arc<E>) -> Self {
        Self {
            extractor,
            embedder,
            workers: default_worker_count(),
        }
    }

    /// Sets the maximum number of pairs computed concurrently (minimum 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Maximum number of pairs computed concurrently.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The embedder used for spans.
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Computes one [`InferenceResult`] per (answer, question) pair.
    ///
    /// Row `answer.id` of the returned artifact holds the results in `questions` order.
    /// Fails as a whole if any pair fails.
    pub async fn generate(
        &self,
        answers: &[Answer],
        questions: &[Question],
    ) -> GenerationResult<InferenceArtifact> {
        validate_inputs(answers, questions)?;

        let started = Instant::now();
        let pairs = answers.len() * questions.len();
        info!(
            answers = answers.len(),
            questions = questions.len(),
            workers = self.workers,
            "Generating inferences"
        );

        let permits = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        for (answer_idx, answer) in answers.iter().enumerate() {
            let context: Arc<str> = Arc::from(answer.text.as_str());

            for (question_idx, question) in questions.iter().enumerate() {
                let permits = Arc::clone(&permits);
                let extractor = Arc::clone(&self.extractor);
                let embedder = Arc::clone(&self.embedder);
                let context = Arc::clone(&context);
                let question = question.clone();
                let answer_id = answer.id;

                tasks.spawn(async move {
                    let _permit = permits.acquire_owned().await.map_err(|e| {
                        GenerationError::WorkerFailed {
                            reason: e.to_string(),
                        }
                    })?;

                    let result = tokio::task::spawn_blocking(move || {
                        infer_pair(&*extractor, &*embedder, answer_id, &question, &context)
                    })
                    .await
                    .map_err(|e| GenerationError::WorkerFailed {
                        reason: e.to_string(),
                    })??;

                    Ok::<_, GenerationError>((answer_idx, question_idx, result))
                });
            }
        }

        let mut grid: Vec<Vec<Option<InferenceResult>>> =
            vec![vec![None; questions.len()]; answers.len()];

        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(|e| GenerationError::WorkerFailed {
                reason: e.to_string(),
            });

            match outcome.and_then(|r| r) {
                Ok((answer_idx, question_idx, result)) => {
                    grid[answer_idx][question_idx] = Some(result);
                }
                Err(e) => {
                    warn!(error = %e, "Inference generation aborted");
                    tasks.abort_all();
                    return Err(e);
                }
            }
        }

        let mut inferences = BTreeMap::new();
        for (answer, row) in answers.iter().zip(grid) {
            let row: Option<Vec<InferenceResult>> = row.into_iter().collect();
            let row = row.ok_or_else(|| GenerationError::WorkerFailed {
                reason: format!("missing result for answer {}", answer.id),
            })?;
            inferences.insert(answer.key(), row);
        }

        info!(
            pairs,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Inference generation complete"
        );

        Ok(InferenceArtifact::new(questions.to_vec(), inferences))
    }
}

fn validate_inputs(answers: &[Answer], questions: &[Question]) -> GenerationResult<()> {
    if answers.is_empty() {
        return Err(GenerationError::NoAnswers);
    }
    if questions.is_empty() {
        return Err(GenerationError::NoQuestions);
    }

    let mut seen = HashSet::with_capacity(questions.len());
    for question in questions {
        if !seen.insert(question.as_str()) {
            return Err(GenerationError::DuplicateQuestion {
                question: question.clone(),
            });
        }
    }

    let mut ids = HashSet::with_capacity(answers.len());
    for answer in answers {
        if !ids.insert(answer.id) {
            return Err(GenerationError::DuplicateAnswerId {
                answer_id: answer.id,
            });
        }
    }

    Ok(())
}

fn infer_pair<X, E>(
    extractor: &X,
    embedder: &E,
    answer_id: AnswerId,
    question: &str,
    context: &str,
) -> GenerationResult<InferenceResult>
where
    X: SpanExtractor + ?Sized,
    E: Embedder + ?Sized,
{
    let span = extractor
        .extract(question, context)
        .map_err(|source| GenerationError::Extraction {
            answer_id,
            question: question.to_string(),
            source,
        })?;

    let answer_embedding =
        embedder
            .embed(&span.answer)
            .map_err(|source| GenerationError::Embedding {
                answer_id,
                question: question.to_string(),
                source,
            })?;

    validate_embedding_dim(answer_embedding.len(), embedder.embedding_dim()).map_err(
        |source| GenerationError::Dimension {
            answer_id,
            question: question.to_string(),
            source,
        },
    )?;

    debug!(
        answer_id,
        start = span.start,
        end = span.end,
        "Pair inferred"
    );

    Ok(InferenceResult {
        answer: span.answer,
        start_ind: span.start,
        end_ind: span.end,
        answer_embedding,
    })
}
