//! End-to-end tests over assignment files, the lexical extractor, the hash embedder
//! and the file-backed store.

mod common;

use common::fixtures::{AssignmentBuilder, PARIS_QUESTION};
use grouper::{
    AssignmentId, DirectoryAssignmentSource, ErrorKind, FileArtifactStore, HashEmbedder,
    InferenceGenerator, InferenceService, LexicalExtractor,
};
use tempfile::TempDir;

type Service =
    InferenceService<DirectoryAssignmentSource, FileArtifactStore, LexicalExtractor, HashEmbedder>;

struct Harness {
    _dir: TempDir,
    assignments: std::path::PathBuf,
    service: Service,
}

fn harness() -> Harness {
    let dir = TempDir::new().unwrap();
    let assignments = dir.path().join("assignments");
    std::fs::create_dir_all(&assignments).unwrap();

    let generator = InferenceGenerator::new(
        LexicalExtractor::default(),
        HashEmbedder::new(64).unwrap(),
    )
    .with_workers(3);

    let service = InferenceService::new(
        DirectoryAssignmentSource::new(&assignments),
        FileArtifactStore::new(dir.path().join("inferences")),
        generator,
    );

    Harness {
        _dir: dir,
        assignments,
        service,
    }
}

#[tokio::test]
async fn test_spans_are_substrings_of_answers() {
    let h = harness();
    let id = AssignmentId::new_v4();
    let answers = AssignmentBuilder::new()
        .answer(
            1,
            "ana",
            "Rivers carry sediment. The capital of France is Paris!",
        )
        .answer(2, "ben", "Photosynthesis converts light into chemical energy.")
        .answer(3, "cy", "")
        .write_to(&h.assignments, id);

    let questions = vec![
        "Which city is the capital of France?".to_string(),
        "How does photosynthesis store energy?".to_string(),
    ];
    let artifact = h
        .service
        .generate_inferences(id, questions.clone())
        .await
        .expect("generation should succeed");

    assert_eq!(artifact.questions, questions);
    assert_eq!(artifact.answer_count(), answers.len());
    assert_eq!(artifact.embedding_dim(), Some(64));

    for answer in &answers {
        let row = artifact.results(&answer.key()).expect("row per answer");
        assert_eq!(row.len(), questions.len());

        for result in row {
            let chars: Vec<char> = answer.text.chars().collect();
            let expected: String = chars[result.start_ind..result.end_ind].iter().collect();
            assert_eq!(result.answer, expected);
            assert_eq!(result.answer_embedding.len(), 64);
        }
    }

    let first = artifact.results("1").unwrap();
    assert_eq!(first[0].answer, "The capital of France is Paris!");

    let empty = &artifact.results("3").unwrap()[0];
    assert_eq!((empty.start_ind, empty.end_ind), (0, 0));
    assert!(empty.answer.is_empty());
}

#[tokio::test]
async fn test_identical_spans_group_together() {
    let h = harness();
    let id = AssignmentId::new_v4();
    AssignmentBuilder::new()
        .answer(1, "ana", "The mitochondria produce energy.")
        .answer(2, "ben", "The mitochondria produce energy.")
        .answer(3, "cy", "Volcanoes erupt molten rock.")
        .write_to(&h.assignments, id);

    h.service
        .generate_inferences(id, vec!["What produces energy?".to_string()])
        .await
        .unwrap();

    let matched = h
        .service
        .group_answers(id, "What produces energy?", 1, 0.99)
        .await
        .unwrap();

    assert_eq!(matched.keys().collect::<Vec<_>>(), vec!["1", "2"]);
    assert_eq!(matched["2"].similarity, 1.0);
}

#[tokio::test]
async fn test_artifact_survives_service_restart() {
    let h = harness();
    let id = AssignmentId::new_v4();
    AssignmentBuilder::paris().write_to(&h.assignments, id);

    let generated = h
        .service
        .generate_inferences(id, vec![PARIS_QUESTION.to_string()])
        .await
        .unwrap();

    let reopened: Service = InferenceService::new(
        DirectoryAssignmentSource::new(&h.assignments),
        FileArtifactStore::new(h.service.store().storage_path()),
        InferenceGenerator::new(LexicalExtractor::default(), HashEmbedder::new(64).unwrap()),
    );

    assert_eq!(reopened.get_inferences(id).await.unwrap(), generated);
    assert_eq!(reopened.list_inferences().await.unwrap(), vec![id]);
}

#[tokio::test]
async fn test_concurrent_generation_stores_once() {
    let h = harness();
    let id = AssignmentId::new_v4();
    AssignmentBuilder::paris().write_to(&h.assignments, id);

    let (a, b) = tokio::join!(
        h.service
            .generate_inferences(id, vec![PARIS_QUESTION.to_string()]),
        h.service
            .generate_inferences(id, vec!["Which country?".to_string()]),
    );

    let outcomes = [a, b];
    let winners: Vec<_> = outcomes.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1, "exactly one generation should be stored");
    assert!(outcomes.iter().any(|r| matches!(
        r,
        Err(e) if e.kind() == ErrorKind::AlreadyExists
    )));

    let stored = h.service.get_inferences(id).await.unwrap();
    assert_eq!(&stored, winners[0]);
}

#[tokio::test]
async fn test_missing_and_malformed_assignments() {
    let h = harness();
    let missing = AssignmentId::new_v4();

    let err = h
        .service
        .generate_inferences(missing, vec![PARIS_QUESTION.to_string()])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let malformed = AssignmentId::new_v4();
    std::fs::write(
        h.assignments.join(format!("{}.json", malformed)),
        "{\"answers\": 3}",
    )
    .unwrap();

    let err = h
        .service
        .generate_inferences(malformed, vec![PARIS_QUESTION.to_string()])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_delete_then_regenerate() {
    let h = harness();
    let id = AssignmentId::new_v4();
    AssignmentBuilder::paris().write_to(&h.assignments, id);

    h.service
        .generate_inferences(id, vec![PARIS_QUESTION.to_string()])
        .await
        .unwrap();
    h.service.delete_inferences(id).await.unwrap();

    assert_eq!(
        h.service.delete_inferences(id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert!(h.service.list_inferences().await.unwrap().is_empty());

    let again = h
        .service
        .generate_inferences(id, vec!["Which country?".to_string()])
        .await
        .unwrap();
    assert_eq!(again.questions, vec!["Which country?".to_string()]);
}
