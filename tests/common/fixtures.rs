//! Test fixtures for integration tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use grouper::{Answer, AnswerId, AssignmentFile, AssignmentId, InferenceArtifact, InferenceResult};

pub const PARIS_QUESTION: &str = "What city?";

pub const PARIS_BEAUTIFUL: &str = "Paris is beautiful.";

pub const PARIS_CAPITAL: &str = "Paris is the capital.";

/// Two-dimensional unit vector whose cosine with `[1, 0]` is `cos`.
pub fn unit_vector_with_cosine(cos: f32) -> Vec<f32> {
    vec![cos, (1.0 - cos * cos).max(0.0).sqrt()]
}

/// Builds assignment answer lists and writes them as assignment files.
#[derive(Default)]
pub struct AssignmentBuilder {
    answers: Vec<Answer>,
}

impl AssignmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, id: AnswerId, student: &str, text: &str) -> Self {
        self.answers.push(Answer::new(id, student, text));
        self
    }

    /// The two-answer Paris assignment.
    pub fn paris() -> Self {
        Self::new()
            .answer(1, "ana", PARIS_BEAUTIFUL)
            .answer(2, "ben", PARIS_CAPITAL)
    }

    pub fn build(self) -> Vec<Answer> {
        self.answers
    }

    /// Writes `<dir>/<assignment_id>.json` and returns the answers.
    pub fn write_to(self, dir: &Path, assignment_id: AssignmentId) -> Vec<Answer> {
        let file = AssignmentFile {
            answers: self.answers,
        };
        let json = serde_json::to_string_pretty(&file).expect("assignment should serialize");
        fs::write(dir.join(format!("{}.json", assignment_id)), json)
            .expect("assignment file should be written");
        file.answers
    }
}

/// Builds artifacts cell by cell.
pub struct ArtifactBuilder {
    questions: Vec<String>,
    inferences: BTreeMap<String, Vec<InferenceResult>>,
}

impl ArtifactBuilder {
    pub fn new(questions: &[&str]) -> Self {
        Self {
            questions: questions.iter().map(|q| q.to_string()).collect(),
            inferences: BTreeMap::new(),
        }
    }

    /// Adds a row whose spans are `span` and whose embeddings are `embeddings`, one
    /// per question.
    pub fn row(mut self, answer_id: AnswerId, span: &str, embeddings: Vec<Vec<f32>>) -> Self {
        let row = embeddings
            .into_iter()
            .map(|answer_embedding| InferenceResult {
                answer: span.to_string(),
                start_ind: 0,
                end_ind: span.chars().count(),
                answer_embedding,
            })
            .collect();
        self.inferences.insert(answer_id.to_string(), row);
        self
    }

    pub fn build(self) -> InferenceArtifact {
        InferenceArtifact::new(self.questions, self.inferences)
    }
}

/// The Paris artifact with `cosine(e1, e2) = 0.92`.
pub fn paris_artifact() -> InferenceArtifact {
    ArtifactBuilder::new(&[PARIS_QUESTION])
        .row(1, PARIS_BEAUTIFUL, vec![vec![1.0, 0.0]])
        .row(2, PARIS_CAPITAL, vec![unit_vector_with_cosine(0.92)])
        .build()
}
