use std::sync::Arc;

use super::*;
use crate::entities::Entities;
use crate::intent::Intent;
use crate::scoring::ConfidenceInfo;

fn draft(question: &str, intent: Intent, count: u64) -> QuestionDraft {
    QuestionDraft {
        question: question.to_string(),
        fingerprint: crate::hashing::question_fingerprint(question),
        entities: Entities::default(),
        embedding: vec![1.0, 0.0],
        answer: format!("answer to {question}"),
        intent,
        confidence: ConfidenceInfo::missing(),
        sources: Vec::new(),
        deadline: None,
        count,
    }
}

fn chunk(id: &str, document_id: &str, embedding: Option<Vec<f32>>) -> ChunkRecord {
    ChunkRecord {
        id: id.to_string(),
        document_id: document_id.to_string(),
        index: 0,
        content: format!("content of {id}"),
        kind: ChunkKind::Text,
        embedding,
        metadata: ChunkMetadata {
            page_number: Some(1),
            ..Default::default()
        },
    }
}

fn history_draft(user_id: &str, question_id: &str) -> UserQuestionDraft {
    UserQuestionDraft {
        user_id: user_id.to_string(),
        question_id: question_id.to_string(),
        question_text: "What is CGPA?".to_string(),
    }
}

#[tokio::test]
async fn test_add_and_get_question() {
    let store = InMemoryStore::new();
    let id = store
        .add_question(draft("Define CGPA", Intent::Definition, 0))
        .await
        .unwrap();

    let record = store.get_question(&id).await.unwrap().expect("record");
    assert_eq!(record.id, id);
    assert_eq!(record.count, 1, "count never starts below one");
    assert_eq!(record.created_at, record.last_asked_at);
    assert_eq!(record.embedding.as_deref(), Some(&[1.0, 0.0][..]));

    let by_fp = store
        .find_question_by_fingerprint(&record.fingerprint)
        .await
        .unwrap();
    assert_eq!(by_fp.map(|r| r.id), Some(id));
    assert!(store.get_question("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_questions_by_intent_keeps_insertion_order() {
    let store = InMemoryStore::new();
    let a = store.add_question(draft("a", Intent::Deadline, 1)).await.unwrap();
    store.add_question(draft("b", Intent::General, 1)).await.unwrap();
    let c = store.add_question(draft("c", Intent::Deadline, 1)).await.unwrap();

    let ids: Vec<String> = store
        .questions_by_intent(Intent::Deadline)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![a, c]);
}

#[tokio::test]
async fn test_most_asked_orders_by_count() {
    let store = InMemoryStore::new();
    store.add_question(draft("low", Intent::General, 1)).await.unwrap();
    store.add_question(draft("high", Intent::General, 9)).await.unwrap();
    store.add_question(draft("mid", Intent::General, 4)).await.unwrap();

    let top = store.most_asked_questions(2).await.unwrap();
    let questions: Vec<&str> = top.iter().map(|r| r.question.as_str()).collect();
    assert_eq!(questions, vec!["high", "mid"]);
}

#[tokio::test]
async fn test_concurrent_increments_are_not_lost() {
    let store = InMemoryStore::new();
    let id = store
        .add_question(draft("How to apply?", Intent::Procedure, 1))
        .await
        .unwrap();
    let id = Arc::new(id);

    let mut handles = Vec::new();
    for _ in 0..50 {
        let store = store.clone();
        let id = Arc::clone(&id);
        handles.push(tokio::spawn(async move {
            store.increment_question_count(&id).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let record = store.get_question(&id).await.unwrap().unwrap();
    assert_eq!(record.count, 51);
    assert!(record.last_asked_at >= record.created_at);
}

#[tokio::test]
async fn test_increment_unknown_id() {
    let store = InMemoryStore::new();
    let err = store.increment_question_count("nope").await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound {
            collection: model::QUESTIONS_COLLECTION,
            ..
        }
    ));
    assert!(!err.is_unavailable());
}

#[tokio::test]
async fn test_chunks_filtered_by_document() {
    let store = InMemoryStore::new();
    store.insert_chunks([
        chunk("c1", "d1", Some(vec![1.0])),
        chunk("c2", "d2", None),
        chunk("c3", "d1", Some(vec![0.5])),
    ]);

    assert_eq!(store.chunks(None).await.unwrap().len(), 3);
    let ids = vec!["d1".to_string()];
    let scoped = store.chunks(Some(&ids)).await.unwrap();
    assert_eq!(
        scoped.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
        vec!["c1", "c3"]
    );
    assert!(scoped[0].usable_embedding().is_some());
    assert_eq!(store.count_chunks(2).await.unwrap(), 2);
    assert_eq!(store.count_chunks(1000).await.unwrap(), 3);
}

#[tokio::test]
async fn test_insert_document_replaces_same_id() {
    let store = InMemoryStore::new();
    store.insert_document(DocumentRecord {
        id: "d1".into(),
        name: "Old".into(),
        file_url: None,
    });
    store.insert_document(DocumentRecord {
        id: "d1".into(),
        name: "Handbook".into(),
        file_url: Some("https://files.example/handbook.pdf".into()),
    });

    let doc = store.get_document("d1").await.unwrap().unwrap();
    assert_eq!(doc.name, "Handbook");
    assert_eq!(store.snapshot().documents.len(), 1);
}

#[tokio::test]
async fn test_unavailable_store_fails_every_operation() {
    let store = InMemoryStore::new();
    store.set_available(false);

    assert!(!store.is_available().await);
    assert!(store.get_question("x").await.unwrap_err().is_unavailable());
    assert!(
        store
            .add_question(draft("q", Intent::General, 1))
            .await
            .unwrap_err()
            .is_unavailable()
    );
    assert!(store.chunks(None).await.unwrap_err().is_unavailable());
    assert!(store.user_questions("u").await.unwrap_err().is_unavailable());

    store.set_available(true);
    assert!(store.is_available().await);
    assert!(store.get_question("x").await.unwrap().is_none());
}

#[tokio::test]
async fn test_user_questions_newest_first() {
    let store = InMemoryStore::new();
    let first = store.add_user_question(history_draft("u1", "q1")).await.unwrap();
    store.add_user_question(history_draft("u2", "q1")).await.unwrap();
    let second = store.add_user_question(history_draft("u1", "q2")).await.unwrap();

    let entries = store.user_questions("u1").await.unwrap();
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);
    assert!(entries.iter().all(|e| !e.favorite && e.personal_note.is_none()));
}

#[tokio::test]
async fn test_update_user_question() {
    let store = InMemoryStore::new();
    let id = store.add_user_question(history_draft("u1", "q1")).await.unwrap();

    let updated = store
        .update_user_question(&id, UserQuestionUpdate::Favorite(true))
        .await
        .unwrap();
    assert!(updated.favorite);

    let updated = store
        .update_user_question(&id, UserQuestionUpdate::Note(Some("bring ID card".into())))
        .await
        .unwrap();
    assert!(updated.favorite);
    assert_eq!(updated.personal_note.as_deref(), Some("bring ID card"));

    let updated = store
        .update_user_question(&id, UserQuestionUpdate::ToggleFavorite)
        .await
        .unwrap();
    assert!(!updated.favorite);

    let err = store
        .update_user_question("missing", UserQuestionUpdate::Favorite(true))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn test_snapshot_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("store.json");

    let store = InMemoryStore::new();
    store.insert_chunks([chunk("c1", "d1", Some(vec![0.6, 0.8]))]);
    let qid = store
        .add_question(draft("When is the exam?", Intent::Deadline, 3))
        .await
        .unwrap();
    store.add_user_question(history_draft("u1", &qid)).await.unwrap();

    let result = store.dehydrate(&path).await.unwrap();
    assert!(matches!(result, DehydrationResult::Success { bytes } if bytes > 0));
    assert!(!path.with_extension("tmp").exists());

    let restored = InMemoryStore::new();
    let result = restored.hydrate(&path).await.unwrap();
    assert!(matches!(result, HydrationResult::Success { .. }));
    assert_eq!(restored.snapshot(), store.snapshot());
    assert_eq!(restored.get_question(&qid).await.unwrap().unwrap().count, 3);
}

#[tokio::test]
async fn test_hydrate_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemoryStore::new();
    store.insert_chunks([chunk("c1", "d1", None)]);

    let result = store.hydrate(&dir.path().join("absent.json")).await.unwrap();
    assert_eq!(result, HydrationResult::NotFound);
    assert_eq!(store.snapshot().chunks.len(), 1, "contents untouched");
}

#[tokio::test]
async fn test_hydrate_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, b"not json").unwrap();

    let err = InMemoryStore::new().hydrate(&path).await.unwrap_err();
    assert!(matches!(err, StoreError::Serialization(_)));
}

#[test]
fn test_record_serializes_camel_case() {
    let record = QuestionRecord::from_draft(
        "q1".into(),
        draft("Define ATKT", Intent::Definition, 2),
        chrono::Utc::now(),
    );
    let json = serde_json::to_value(&record).unwrap();
    assert!(json.get("createdAt").is_some());
    assert!(json.get("lastAskedAt").is_some());
    assert_eq!(json["intent"], "definition");
    assert_eq!(json["count"], 2);

    let chunk_json = serde_json::to_value(chunk("c1", "d1", None)).unwrap();
    assert_eq!(chunk_json["type"], "text");
    assert_eq!(chunk_json["documentId"], "d1");
    assert_eq!(chunk_json["metadata"]["pageNumber"], 1);
}
