use std::sync::Arc;

use chrono::{Duration, Utc};

use super::*;
use crate::entities::{AcademicYear, Entities, extract_entities};
use crate::hashing::question_fingerprint;
use crate::intent::Intent;
use crate::scoring::{ConfidenceInfo, ConfidenceLevel};
use crate::store::{DocumentStore, InMemoryStore, QuestionRecord};

fn unit(angle: f32) -> Vec<f32> {
    vec![angle.cos(), angle.sin()]
}

/// Vector whose cosine with `[1, 0]` is `cos`.
fn at_cosine(cos: f32) -> Vec<f32> {
    vec![cos, (1.0 - cos * cos).sqrt()]
}

fn record(
    id: &str,
    question: &str,
    intent: Intent,
    embedding: Option<Vec<f32>>,
    count: u64,
) -> QuestionRecord {
    let now = Utc::now();
    QuestionRecord {
        id: id.to_string(),
        question: question.to_string(),
        fingerprint: question_fingerprint(question),
        entities: extract_entities(question),
        embedding,
        answer: format!("answer to {question}"),
        intent,
        confidence: ConfidenceInfo::new(ConfidenceLevel::High, 80, "seeded"),
        sources: Vec::new(),
        deadline: None,
        count,
        created_at: now,
        last_asked_at: now,
    }
}

fn new_answer(question: &str, embedding: Vec<f32>, intent: Intent) -> NewCachedAnswer {
    NewCachedAnswer {
        question: question.to_string(),
        embedding,
        answer: "X".to_string(),
        intent,
        confidence: None,
        sources: Vec::new(),
        deadline: None,
    }
}

#[test]
fn test_cache_status_header_values() {
    assert_eq!(CacheStatus::HitExact.as_header_value(), "HIT_EXACT");
    assert_eq!(CacheStatus::HitSemantic.as_header_value(), "HIT_SEMANTIC");
    assert_eq!(CacheStatus::Miss.to_string(), "MISS");
    assert!(!CacheStatus::Miss.is_hit());
    assert_eq!(CacheLookup::StoreUnavailable("down".into()).status(), CacheStatus::Miss);
}

#[tokio::test]
async fn test_exact_fingerprint_hit() {
    let cache = QuestionCache::new(InMemoryStore::new());
    let id = cache
        .store_question(new_answer("How do I pay fees?", unit(0.0), Intent::Procedure))
        .await
        .expect("stored");

    let lookup = cache
        .find_similar_question("how do i pay FEES", &unit(1.2), Intent::Procedure)
        .await;

    let hit = lookup.into_hit().expect("exact hit");
    assert_eq!(hit.id(), id);
    assert_eq!(hit.similarity, 1.0);
    assert_eq!(hit.status, CacheStatus::HitExact);
    assert_eq!(hit.record.answer, "X");
}

#[tokio::test]
async fn test_fast_path_ignores_entities_and_intent() {
    let store = InMemoryStore::new();
    let mut seeded = record("r1", "What is the fee for SY?", Intent::Definition, None, 1);
    seeded.entities = Entities {
        year: Some(AcademicYear::Third),
        ..Default::default()
    };
    store.insert_question_record(seeded);
    let cache = QuestionCache::new(store);

    let hit = cache
        .find_similar_question("What is the fee for SY?", &unit(0.0), Intent::General)
        .await
        .into_hit()
        .expect("fingerprint hit");

    assert_eq!(hit.id(), "r1");
    assert_eq!(hit.similarity, 1.0);
}

#[tokio::test]
async fn test_semantic_hit_above_threshold() {
    let store = InMemoryStore::new();
    store.insert_question_record(record(
        "r1",
        "How do I register for TY sem 3 exams?",
        Intent::Procedure,
        Some(unit(0.0)),
        1,
    ));
    let cache = QuestionCache::new(store);

    let hit = cache
        .find_similar_question(
            "How to register for the TY sem 3 exams",
            &at_cosine(0.95),
            Intent::Procedure,
        )
        .await
        .into_hit()
        .expect("semantic hit");

    assert_eq!(hit.id(), "r1");
    assert_eq!(hit.status, CacheStatus::HitSemantic);
    assert!(hit.similarity > 0.90 && hit.similarity < 1.0);
}

#[tokio::test]
async fn test_entity_mismatch_rejects_even_near_identical_vectors() {
    let store = InMemoryStore::new();
    store.insert_question_record(record(
        "r1",
        "How do I register for TY sem 3 exams?",
        Intent::Procedure,
        Some(unit(0.0)),
        1,
    ));
    let cache = QuestionCache::new(store);

    let lookup = cache
        .find_similar_question(
            "How do I register for TY sem 4 exams?",
            &at_cosine(0.999),
            Intent::Procedure,
        )
        .await;
    assert_eq!(lookup, CacheLookup::Miss);

    // Missing entity on one side is a mismatch too.
    let lookup = cache
        .find_similar_question(
            "How do I register for TY exams?",
            &unit(0.0),
            Intent::Procedure,
        )
        .await;
    assert_eq!(lookup, CacheLookup::Miss);
}

#[tokio::test]
async fn test_threshold_is_strict() {
    let store = InMemoryStore::new();
    store.insert_question_record(record(
        "r1",
        "Where is the library",
        Intent::General,
        Some(vec![1.0, 0.0]),
        1,
    ));
    let cache = QuestionCache::new(store).with_threshold(1.0);

    let lookup = cache
        .find_similar_question("Where is the canteen", &[1.0, 0.0], Intent::General)
        .await;
    assert_eq!(lookup, CacheLookup::Miss);

    let lookup = cache
        .find_similar_question_with_threshold(
            "Where is the canteen",
            &[1.0, 0.0],
            Intent::General,
            0.99,
        )
        .await;
    assert!(lookup.is_hit());
}

#[tokio::test]
async fn test_semantic_scan_is_scoped_and_picks_best() {
    let store = InMemoryStore::new();
    store.insert_question_record(record("none", "fee structure", Intent::General, None, 1));
    store.insert_question_record(record(
        "other-intent",
        "fee amount",
        Intent::Deadline,
        Some(unit(0.0)),
        1,
    ));
    store.insert_question_record(record("ok", "fee payment", Intent::General, Some(at_cosine(0.93)), 1));
    store.insert_question_record(record("best", "fee details", Intent::General, Some(at_cosine(0.97)), 1));
    store.insert_question_record(record("below", "fee info", Intent::General, Some(at_cosine(0.5)), 1));
    let cache = QuestionCache::new(store);

    let hit = cache
        .find_similar_question("fee", &unit(0.0), Intent::General)
        .await
        .into_hit()
        .expect("hit");

    assert_eq!(hit.id(), "best");
    assert!((hit.similarity - 0.97).abs() < 1e-3);
}

#[tokio::test]
async fn test_empty_cache_misses() {
    let cache = QuestionCache::new(InMemoryStore::new());
    let lookup = cache
        .find_similar_question("anything", &unit(0.0), Intent::General)
        .await;
    assert_eq!(lookup, CacheLookup::Miss);
}

#[tokio::test]
async fn test_store_unavailable_degrades() {
    let store = InMemoryStore::new();
    let cache = QuestionCache::new(store.clone());
    store.set_available(false);

    let lookup = cache
        .find_similar_question("anything", &unit(0.0), Intent::General)
        .await;
    assert!(matches!(lookup, CacheLookup::StoreUnavailable(_)));
    assert_eq!(lookup.status(), CacheStatus::Miss);

    assert!(
        cache
            .store_question(new_answer("q", unit(0.0), Intent::General))
            .await
            .is_none()
    );
    cache.increment_question_count("missing").await;
}

#[tokio::test]
async fn test_store_question_record_shape() {
    let store = InMemoryStore::new();
    let cache = QuestionCache::new(store.clone());

    let id = cache
        .store_question(new_answer("What is the TY sem 3 syllabus?", unit(0.0), Intent::Definition))
        .await
        .expect("stored");

    let stored = store.get_question(&id).await.unwrap().expect("record exists");
    assert_eq!(stored.count, 1);
    assert_eq!(stored.fingerprint, question_fingerprint("What is the TY sem 3 syllabus?"));
    assert_eq!(stored.entities, extract_entities("What is the TY sem 3 syllabus?"));
    assert_eq!(stored.confidence, ConfidenceInfo::missing());
    assert_eq!(stored.created_at, stored.last_asked_at);
    assert_eq!(stored.embedding.as_deref(), Some(unit(0.0).as_slice()));
}

#[tokio::test]
async fn test_store_question_normalizes_confidence() {
    let store = InMemoryStore::new();
    let cache = QuestionCache::new(store.clone());

    let mut entry = new_answer("q", unit(0.0), Intent::General);
    entry.confidence = Some(ConfidenceInfo {
        level: ConfidenceLevel::Medium,
        score: 250,
        reasoning: "  ".to_string(),
    });
    let id = cache.store_question(entry).await.unwrap();

    let stored = store.get_question(&id).await.unwrap().unwrap();
    assert_eq!(stored.confidence.score, 100);
    assert_eq!(stored.confidence.reasoning, "No confidence data");
}

#[tokio::test]
async fn test_concurrent_increments_are_not_lost() {
    let store = InMemoryStore::new();
    let cache = Arc::new(QuestionCache::new(store.clone()));
    let id = cache
        .store_question(new_answer("popular", unit(0.0), Intent::General))
        .await
        .unwrap();

    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let id = id.clone();
            tokio::spawn(async move { cache.increment_question_count(&id).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let stored = store.get_question(&id).await.unwrap().unwrap();
    assert_eq!(stored.count, 51);
    assert!(stored.last_asked_at >= stored.created_at);
}

fn faq_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    let now = Utc::now();
    let mut a = record("a", "define cgpa", Intent::Definition, None, 5);
    a.last_asked_at = now - Duration::hours(3);
    let mut b = record("b", "exam deadline", Intent::Deadline, None, 9);
    b.last_asked_at = now - Duration::hours(2);
    let mut c = record("c", "how to apply", Intent::Procedure, None, 2);
    c.last_asked_at = now;
    let mut d = record("d", "what is atkt", Intent::Definition, None, 7);
    d.last_asked_at = now - Duration::hours(1);
    for r in [a, b, c, d] {
        store.insert_question_record(r);
    }
    store
}

fn faq_ids(page: &FaqPage) -> Vec<&str> {
    page.faqs.iter().map(|f| f.id.as_str()).collect()
}

#[tokio::test]
async fn test_faq_sorting() {
    let cache = QuestionCache::new(faq_store());

    let popular = cache.faq(10, None, FaqSort::Popular).await;
    assert_eq!(faq_ids(&popular), ["b", "d", "a", "c"]);
    assert_eq!(popular.total, 4);

    let recent = cache.faq(10, None, FaqSort::Recent).await;
    assert_eq!(faq_ids(&recent), ["c", "d", "b", "a"]);

    let category = cache.faq(10, None, FaqSort::Category).await;
    assert_eq!(faq_ids(&category), ["b", "d", "a", "c"]);
}

#[tokio::test]
async fn test_faq_filter_and_limit() {
    let cache = QuestionCache::new(faq_store());

    let page = cache.faq(1, Some(Intent::Definition), FaqSort::Popular).await;
    assert_eq!(faq_ids(&page), ["d"]);
    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn test_faq_stats() {
    let cache = QuestionCache::new(faq_store());
    let stats = cache.faq_stats().await;

    assert_eq!(stats.total_questions, 4);
    assert_eq!(stats.total_asks, 23);
    assert_eq!(stats.by_category.get("definition"), Some(&2));
    assert_eq!(stats.by_category.get("procedure"), Some(&1));
    assert_eq!(stats.most_asked.map(|f| f.id), Some("b".to_string()));
}

#[tokio::test]
async fn test_faq_store_failure_is_empty() {
    let store = faq_store();
    store.set_available(false);
    let cache = QuestionCache::new(store);

    assert_eq!(cache.faq(10, None, FaqSort::Popular).await, FaqPage::default());
    assert_eq!(cache.faq_stats().await, FaqStats::default());
}

#[test]
fn test_faq_sort_parse() {
    assert_eq!("recent".parse::<FaqSort>().unwrap(), FaqSort::Recent);
    assert_eq!("Category".parse::<FaqSort>().unwrap(), FaqSort::Category);
    assert_eq!("bogus".parse::<FaqSort>().unwrap(), FaqSort::Popular);
}
