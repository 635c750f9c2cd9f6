use super::*;
use crate::assignment::MemoryAssignmentSource;
use crate::embedding::MockEmbedder;
use crate::error::ErrorKind;
use crate::extraction::MockExtractor;
use crate::model::Answer;
use crate::store::MemoryArtifactStore;

type TestService =
    InferenceService<MemoryAssignmentSource, MemoryArtifactStore, MockExtractor, MockEmbedder>;

const BEAUTIFUL: &str = "Paris is beautiful.";
const CAPITAL: &str = "Paris is the capital.";
const QUESTION: &str = "What city?";

fn paris_service(embedder: MockEmbedder) -> (TestService, AssignmentId) {
    let assignments = MemoryAssignmentSource::new();
    let id = AssignmentId::new_v4();
    assignments.insert(
        id,
        vec![Answer::new(1, "ana", BEAUTIFUL), Answer::new(2, "ben", CAPITAL)],
    );

    let generator = InferenceGenerator::new(MockExtractor::new(), embedder).with_workers(2);
    let service = InferenceService::new(assignments, MemoryArtifactStore::new(), generator);
    (service, id)
}

fn paris_embedder() -> MockEmbedder {
    let cos = 0.92f32;
    MockEmbedder::new(2)
        .with_vector(BEAUTIFUL, vec![1.0, 0.0])
        .with_vector(CAPITAL, vec![cos, (1.0 - cos * cos).sqrt()])
}

#[tokio::test]
async fn test_generate_then_group() {
    let (service, id) = paris_service(paris_embedder());

    let artifact = service
        .generate_inferences(id, vec![QUESTION.to_string()])
        .await
        .unwrap();
    assert_eq!(artifact.answer_count(), 2);
    assert_eq!(service.get_inferences(id).await.unwrap(), artifact);

    let loose = service.group_answers(id, QUESTION, 1, 0.9).await.unwrap();
    assert_eq!(loose.keys().collect::<Vec<_>>(), vec!["1", "2"]);
    assert_eq!(loose["1"].similarity, 1.0);

    let strict = service.group_answers(id, QUESTION, 1, 0.95).await.unwrap();
    assert_eq!(strict.keys().collect::<Vec<_>>(), vec!["1"]);
}

#[tokio::test]
async fn test_grouping_does_not_recompute() {
    let (service, id) = paris_service(paris_embedder());
    service
        .generate_inferences(id, vec![QUESTION.to_string()])
        .await
        .unwrap();
    let calls = service.generator().embedder().calls();

    service.group_answers(id, QUESTION, 2, 0.0).await.unwrap();
    service.group_answers(id, QUESTION, 1, 0.5).await.unwrap();

    assert_eq!(service.generator().embedder().calls(), calls);
}

#[tokio::test]
async fn test_second_generation_is_rejected_until_deleted() {
    let (service, id) = paris_service(paris_embedder());
    let questions = vec![QUESTION.to_string()];

    service
        .generate_inferences(id, questions.clone())
        .await
        .unwrap();
    let err = service
        .generate_inferences(id, vec!["Another?".to_string()])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    service.delete_inferences(id).await.unwrap();
    let err = service.get_inferences(id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let regenerated = service
        .generate_inferences(id, vec!["Another?".to_string()])
        .await
        .unwrap();
    assert_eq!(regenerated.questions, vec!["Another?".to_string()]);
}

#[tokio::test]
async fn test_failed_generation_stores_nothing() {
    let (service, id) = paris_service(paris_embedder().failing_on(CAPITAL));

    let err = service
        .generate_inferences(id, vec![QUESTION.to_string()])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ComputationFault);
    assert!(!service.store().exists(id));
    assert!(service.list_inferences().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_error_kinds() {
    let (service, id) = paris_service(paris_embedder());
    let unknown = AssignmentId::new_v4();

    let err = service.generate_inferences(id, vec![]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = service
        .generate_inferences(id, vec![QUESTION.to_string(), QUESTION.to_string()])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = service
        .generate_inferences(unknown, vec![QUESTION.to_string()])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert_eq!(
        service.get_inferences(unknown).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        service.delete_inferences(id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        service
            .group_answers(id, QUESTION, 1, 0.5)
            .await
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );

    service
        .generate_inferences(id, vec![QUESTION.to_string()])
        .await
        .unwrap();

    assert_eq!(
        service
            .group_answers(id, "Which river?", 1, 0.5)
            .await
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        service
            .group_answers(id, QUESTION, 99, 0.5)
            .await
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        service
            .group_answers(id, QUESTION, 1, f64::NAN)
            .await
            .unwrap_err()
            .kind(),
        ErrorKind::InvalidInput
    );
}

#[tokio::test]
async fn test_zero_embedding_is_a_computation_fault() {
    let embedder = paris_embedder().with_vector(CAPITAL, vec![0.0, 0.0]);
    let (service, id) = paris_service(embedder);
    service
        .generate_inferences(id, vec![QUESTION.to_string()])
        .await
        .unwrap();

    let err = service
        .group_answers(id, QUESTION, 1, 0.5)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ComputationFault);
}

#[tokio::test]
async fn test_list_inferences() {
    let (service, id) = paris_service(paris_embedder());
    assert!(service.list_inferences().await.unwrap().is_empty());

    service
        .generate_inferences(id, vec![QUESTION.to_string()])
        .await
        .unwrap();
    assert_eq!(service.list_inferences().await.unwrap(), vec![id]);
}

/// Records the thread every lookup runs on.
#[derive(Default)]
struct ThreadRecordingSource {
    inner: MemoryAssignmentSource,
    threads: parking_lot::Mutex<Vec<std::thread::ThreadId>>,
}

impl AssignmentSource for ThreadRecordingSource {
    fn answers(
        &self,
        assignment_id: AssignmentId,
    ) -> crate::assignment::AssignmentResult<Vec<Answer>> {
        self.threads.lock().push(std::thread::current().id());
        self.inner.answers(assignment_id)
    }

    fn contains(&self, assignment_id: AssignmentId) -> bool {
        self.threads.lock().push(std::thread::current().id());
        self.inner.contains(assignment_id)
    }
}

#[tokio::test(flavor = "current_thread")]
async fn test_assignment_reads_run_off_the_runtime_thread() {
    let source = ThreadRecordingSource::default();
    let id = AssignmentId::new_v4();
    source.inner.insert(id, vec![Answer::new(1, "ana", BEAUTIFUL)]);

    let generator = InferenceGenerator::new(MockExtractor::new(), paris_embedder());
    let service = InferenceService::new(source, MemoryArtifactStore::new(), generator);

    service
        .generate_inferences(id, vec![QUESTION.to_string()])
        .await
        .unwrap();
    service.get_inferences(id).await.unwrap();
    service.delete_inferences(id).await.unwrap();

    let runtime_thread = std::thread::current().id();
    let threads = service.assignments.threads.lock().clone();
    assert_eq!(threads.len(), 3);
    assert!(threads.iter().all(|t| *t != runtime_thread));
}
