use tracing::{debug, info, instrument, warn};

use super::types::{CacheLookup, CacheStatus, CachedAnswer, NewCachedAnswer};
use crate::constants::DEFAULT_SIMILARITY_THRESHOLD;
use crate::entities::{entities_match, extract_entities};
use crate::hashing::question_fingerprint;
use crate::intent::Intent;
use crate::scoring::cosine_similarity;
use crate::store::{DocumentStore, QuestionDraft};

/// Question/answer cache on top of a [`DocumentStore`].
///
/// Lookups run in two phases. The fingerprint of the normalized question is matched
/// exactly first and a hit is returned with similarity `1.0`, regardless of intent or
/// entities. Otherwise records sharing the question's intent are scanned: records without
/// an embedding are skipped, records whose entities differ from the question's are
/// rejected outright, and the best cosine score strictly above the threshold wins.
///
/// The cache is best-effort. Store failures never propagate as errors.
#[derive(Debug, Clone)]
pub struct QuestionCache<S> {
    store: S,
    threshold: f32,
}

impl<S: DocumentStore> QuestionCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Looks up a reusable answer using the configured threshold.
    pub async fn find_similar_question(
        &self,
        question: &str,
        embedding: &[f32],
        intent: Intent,
    ) -> CacheLookup {
        self.find_similar_question_with_threshold(question, embedding, intent, self.threshold)
            .await
    }

    #[instrument(skip(self, question, embedding), fields(question_len = question.len(), intent = %intent))]
    pub async fn find_similar_question_with_threshold(
        &self,
        question: &str,
        embedding: &[f32],
        intent: Intent,
        threshold: f32,
    ) -> CacheLookup {
        let fingerprint = question_fingerprint(question);
        match self.store.find_question_by_fingerprint(&fingerprint).await {
            Ok(Some(record)) => {
                info!(id = %record.id, "Exact fingerprint hit");
                return CacheLookup::Hit(CachedAnswer {
                    record,
                    similarity: 1.0,
                    status: CacheStatus::HitExact,
                });
            }
            Ok(None) => debug!("Fingerprint miss, scanning same-intent records"),
            Err(e) => {
                warn!(error = %e, "Fingerprint lookup failed");
                return CacheLookup::StoreUnavailable(e.to_string());
            }
        }

        let mut candidates = match self.store.questions_by_intent(intent).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, "Semantic candidate fetch failed");
                return CacheLookup::StoreUnavailable(e.to_string());
            }
        };

        let entities = extract_entities(question);
        let mut best: Option<(usize, f32)> = None;
        let mut highest = threshold;

        for (i, candidate) in candidates.iter().enumerate() {
            let Some(candidate_embedding) = candidate.usable_embedding() else {
                debug!(id = %candidate.id, "Skipping candidate without embedding");
                continue;
            };
            if !entities_match(&entities, &candidate.entities) {
                debug!(id = %candidate.id, "Rejecting candidate with different entities");
                continue;
            }

            let similarity = cosine_similarity(embedding, candidate_embedding);
            if similarity > highest {
                highest = similarity;
                best = Some((i, similarity));
            }
        }

        match best {
            Some((i, similarity)) => {
                let record = candidates.swap_remove(i);
                info!(id = %record.id, similarity, "Semantic cache hit");
                CacheLookup::Hit(CachedAnswer {
                    record,
                    similarity,
                    status: CacheStatus::HitSemantic,
                })
            }
            None => {
                debug!(threshold, "No candidate above threshold");
                CacheLookup::Miss
            }
        }
    }

    /// Persists a new answer with `count = 1`. Returns its id, or `None` if the write failed.
    #[instrument(skip(self, entry), fields(intent = %entry.intent))]
    pub async fn store_question(&self, entry: NewCachedAnswer) -> Option<String> {
        let draft = QuestionDraft {
            fingerprint: question_fingerprint(&entry.question),
            entities: extract_entities(&entry.question),
            question: entry.question,
            embedding: entry.embedding,
            answer: entry.answer,
            intent: entry.intent,
            confidence: entry
                .confidence
                .map(|c| c.normalized())
                .unwrap_or_default(),
            sources: entry.sources,
            deadline: entry.deadline,
            count: 1,
        };

        match self.store.add_question(draft).await {
            Ok(id) => {
                debug!(id = %id, "Answer cached");
                Some(id)
            }
            Err(e) => {
                warn!(error = %e, "Failed to cache answer");
                None
            }
        }
    }

    /// Records one more ask of a cached answer. Failures are logged and ignored.
    pub async fn increment_question_count(&self, id: &str) {
        if let Err(e) = self.store.increment_question_count(id).await {
            warn!(id, error = %e, "Failed to increment question count");
        }
    }
}
