//! Operation surface over assignments: generate, read, group and delete inferences.
//!
//! Each operation first checks that the assignment exists, then works against the
//! [`ArtifactStore`]. Assignment reads and store I/O run on the blocking pool.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::{info, warn};

use crate::assignment::{AssignmentError, AssignmentResult, AssignmentSource};
use crate::embedding::Embedder;
use crate::error::{Error, Result};
use crate::extraction::SpanExtractor;
use crate::grouping::{AnswerGroup, group};
use crate::inference::InferenceGenerator;
use crate::model::{AnswerId, AssignmentId, InferenceArtifact, Question};
use crate::store::{ArtifactStore, StoreError, StoreResult};

/// Wires an [`AssignmentSource`], an [`InferenceGenerator`] and an [`ArtifactStore`].
pub struct InferenceService<A, S, X, E> {
    assignments: Arc<A>,
    store: Arc<S>,
    generator: InferenceGenerator<X, E>,
}

impl<A, S, X, E> InferenceService<A, S, X, E>
where
    A: AssignmentSource + 'static,
    S: ArtifactStore + 'static,
    X: SpanExtractor + 'static,
    E: Embedder + 'static,
{
    pub fn new(assignments: A, store: S, generator: InferenceGenerator<X, E>) -> Self {
        Self::from_shared(Arc::new(assignments), Arc::new(store), generator)
    }

    pub fn from_shared(
        assignments: Arc<A>,
        store: Arc<S>,
        generator: InferenceGenerator<X, E>,
    ) -> Self {
        Self {
            assignments,
            store,
            generator,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn generator(&self) -> &InferenceGenerator<X, E> {
        &self.generator
    }

    /// Runs inference for every answer of the assignment and persists the artifact.
    ///
    /// Fails with `AlreadyExists` if the assignment already has an artifact; delete it
    /// first to regenerate with a different question set.
    pub async fn generate_inferences(
        &self,
        assignment_id: AssignmentId,
        questions: Vec<Question>,
    ) -> Result<InferenceArtifact> {
        if questions.is_empty() {
            return Err(Error::InvalidRequest {
                reason: "questions must be a non-empty list".to_string(),
            });
        }

        let answers = self
            .run_assignments(move |a| a.answers(assignment_id))
            .await?;

        if self.run_store(move |s| Ok(s.exists(assignment_id))).await? {
            return Err(StoreError::AlreadyExists { assignment_id }.into());
        }

        info!(
            %assignment_id,
            answers = answers.len(),
            questions = questions.len(),
            "Generating inferences for assignment"
        );

        let artifact = match self.generator.generate(&answers, &questions).await {
            Ok(artifact) => artifact,
            Err(e) => {
                warn!(%assignment_id, error = %e, "Inference generation failed; nothing stored");
                return Err(e.into());
            }
        };

        let stored = artifact.clone();
        self.run_store(move |s| s.create(assignment_id, &stored))
            .await?;

        Ok(artifact)
    }

    /// Returns the stored artifact.
    pub async fn get_inferences(&self, assignment_id: AssignmentId) -> Result<InferenceArtifact> {
        self.require_assignment(assignment_id).await?;
        self.run_store(move |s| s.get(assignment_id)).await
    }

    /// Groups the assignment's answers by similarity to `answer_id` on `question`.
    pub async fn group_answers(
        &self,
        assignment_id: AssignmentId,
        question: &str,
        answer_id: AnswerId,
        similarity: f64,
    ) -> Result<AnswerGroup> {
        self.require_assignment(assignment_id).await?;
        let artifact = self.run_store(move |s| s.get(assignment_id)).await?;

        let matched = group(&artifact, question, answer_id, similarity)?;
        info!(
            %assignment_id,
            baseline = answer_id,
            threshold = similarity,
            matched = matched.len(),
            "Grouped answers"
        );
        Ok(matched)
    }

    /// Deletes the stored artifact.
    pub async fn delete_inferences(&self, assignment_id: AssignmentId) -> Result<()> {
        self.require_assignment(assignment_id).await?;
        self.run_store(move |s| s.delete(assignment_id)).await
    }

    /// Assignments that currently have an artifact.
    pub async fn list_inferences(&self) -> Result<Vec<AssignmentId>> {
        self.run_store(|s| s.list()).await
    }

    async fn require_assignment(&self, assignment_id: AssignmentId) -> Result<()> {
        self.run_assignments(move |a| {
            if a.contains(assignment_id) {
                Ok(())
            } else {
                Err(AssignmentError::NotFound { assignment_id })
            }
        })
        .await
    }

    async fn run_assignments<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&A) -> AssignmentResult<T> + Send + 'static,
    {
        let assignments = Arc::clone(&self.assignments);
        tokio::task::spawn_blocking(move || op(&*assignments))
            .await
            .map_err(|e| Error::Task {
                reason: e.to_string(),
            })?
            .map_err(Error::from)
    }

    async fn run_store<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> StoreResult<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(&*store))
            .await
            .map_err(|e| Error::Task {
                reason: e.to_string(),
            })?
            .map_err(Error::from)
    }
}
