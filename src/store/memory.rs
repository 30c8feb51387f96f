use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::error::{StoreError, StoreResult};
use super::model::{
    ChunkRecord, DocumentRecord, QUESTIONS_COLLECTION, QuestionDraft, QuestionRecord,
    USER_QUESTIONS_COLLECTION, UserQuestionDraft, UserQuestionRecord, UserQuestionUpdate,
};
use super::snapshot::StoreSnapshot;
use super::DocumentStore;
use crate::intent::Intent;

/// In-process document store.
///
/// Cloning yields another handle to the same data. Records are kept in insertion order so
/// scans are deterministic. All mutations happen under a single write lock, which makes
/// count increments atomic.
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<Inner>,
}

struct Inner {
    data: RwLock<StoreSnapshot>,
    available: AtomicBool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.inner.data.read();
        f.debug_struct("InMemoryStore")
            .field("documents", &data.documents.len())
            .field("chunks", &data.chunks.len())
            .field("questions", &data.questions.len())
            .field("user_questions", &data.user_questions.len())
            .field("available", &self.inner.available.load(Ordering::Relaxed))
            .finish()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::from_snapshot(StoreSnapshot::default())
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            inner: Arc::new(Inner {
                data: RwLock::new(snapshot),
                available: AtomicBool::new(true),
            }),
        }
    }

    /// Copies the current contents.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.inner.data.read().clone()
    }

    /// Replaces the current contents.
    pub fn restore(&self, snapshot: StoreSnapshot) {
        *self.inner.data.write() = snapshot;
    }

    /// Simulates connectivity. While unavailable every operation fails with
    /// [`StoreError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.inner.available.store(available, Ordering::Release);
    }

    pub fn insert_document(&self, document: DocumentRecord) {
        let mut data = self.inner.data.write();
        data.documents.retain(|d| d.id != document.id);
        data.documents.push(document);
    }

    pub fn insert_chunks(&self, chunks: impl IntoIterator<Item = ChunkRecord>) {
        self.inner.data.write().chunks.extend(chunks);
    }

    /// Inserts a fully-formed question record as-is (ids and timestamps included).
    pub fn insert_question_record(&self, record: QuestionRecord) {
        self.inner.data.write().questions.push(record);
    }

    pub fn question_count(&self) -> usize {
        self.inner.data.read().questions.len()
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.inner.available.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(StoreError::unavailable("in-memory store switched off"))
        }
    }
}

impl DocumentStore for InMemoryStore {
    async fn is_available(&self) -> bool {
        self.inner.available.load(Ordering::Acquire)
    }

    async fn find_question_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> StoreResult<Option<QuestionRecord>> {
        self.ensure_available()?;
        Ok(self
            .inner
            .data
            .read()
            .questions
            .iter()
            .find(|q| q.fingerprint == fingerprint)
            .cloned())
    }

    async fn questions_by_intent(&self, intent: Intent) -> StoreResult<Vec<QuestionRecord>> {
        self.ensure_available()?;
        Ok(self
            .inner
            .data
            .read()
            .questions
            .iter()
            .filter(|q| q.intent == intent)
            .cloned()
            .collect())
    }

    async fn most_asked_questions(&self, limit: usize) -> StoreResult<Vec<QuestionRecord>> {
        self.ensure_available()?;
        let mut questions = self.inner.data.read().questions.clone();
        // Stable: equal counts keep insertion order.
        questions.sort_by(|a, b| b.count.cmp(&a.count));
        questions.truncate(limit);
        Ok(questions)
    }

    async fn get_question(&self, id: &str) -> StoreResult<Option<QuestionRecord>> {
        self.ensure_available()?;
        Ok(self
            .inner
            .data
            .read()
            .questions
            .iter()
            .find(|q| q.id == id)
            .cloned())
    }

    async fn add_question(&self, draft: QuestionDraft) -> StoreResult<String> {
        self.ensure_available()?;
        let id = Uuid::new_v4().to_string();
        let record = QuestionRecord::from_draft(id.clone(), draft, Utc::now());
        self.inner.data.write().questions.push(record);
        debug!(id = %id, "question record added");
        Ok(id)
    }

    async fn increment_question_count(&self, id: &str) -> StoreResult<()> {
        self.ensure_available()?;
        let mut data = self.inner.data.write();
        let record = data
            .questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| StoreError::NotFound {
                collection: QUESTIONS_COLLECTION,
                id: id.to_string(),
            })?;
        record.count += 1;
        record.last_asked_at = Utc::now();
        Ok(())
    }

    async fn chunks(&self, document_ids: Option<&[String]>) -> StoreResult<Vec<ChunkRecord>> {
        self.ensure_available()?;
        let data = self.inner.data.read();
        Ok(match document_ids {
            Some(ids) => data
                .chunks
                .iter()
                .filter(|c| ids.contains(&c.document_id))
                .cloned()
                .collect(),
            None => data.chunks.clone(),
        })
    }

    async fn count_chunks(&self, limit: usize) -> StoreResult<usize> {
        self.ensure_available()?;
        Ok(self.inner.data.read().chunks.len().min(limit))
    }

    async fn get_document(&self, id: &str) -> StoreResult<Option<DocumentRecord>> {
        self.ensure_available()?;
        Ok(self
            .inner
            .data
            .read()
            .documents
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn add_user_question(&self, draft: UserQuestionDraft) -> StoreResult<String> {
        self.ensure_available()?;
        let id = Uuid::new_v4().to_string();
        let record = UserQuestionRecord {
            id: id.clone(),
            user_id: draft.user_id,
            question_id: draft.question_id,
            question_text: draft.question_text,
            asked_at: Utc::now(),
            favorite: false,
            personal_note: None,
        };
        self.inner.data.write().user_questions.push(record);
        Ok(id)
    }

    async fn user_questions(&self, user_id: &str) -> StoreResult<Vec<UserQuestionRecord>> {
        self.ensure_available()?;
        let mut entries: Vec<UserQuestionRecord> = self
            .inner
            .data
            .read()
            .user_questions
            .iter()
            .filter(|u| u.user_id == user_id)
            .cloned()
            .collect();
        // Later inserts win ties so entries written in the same instant still read newest first.
        entries.reverse();
        entries.sort_by(|a, b| b.asked_at.cmp(&a.asked_at));
        Ok(entries)
    }

    async fn get_user_question(&self, id: &str) -> StoreResult<Option<UserQuestionRecord>> {
        self.ensure_available()?;
        Ok(self
            .inner
            .data
            .read()
            .user_questions
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn update_user_question(
        &self,
        id: &str,
        update: UserQuestionUpdate,
    ) -> StoreResult<UserQuestionRecord> {
        self.ensure_available()?;
        let mut data = self.inner.data.write();
        let entry = data
            .user_questions
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| StoreError::NotFound {
                collection: USER_QUESTIONS_COLLECTION,
                id: id.to_string(),
            })?;
        match update {
            UserQuestionUpdate::Favorite(favorite) => entry.favorite = favorite,
            UserQuestionUpdate::ToggleFavorite => entry.favorite = !entry.favorite,
            UserQuestionUpdate::Note(note) => entry.personal_note = note,
        }
        Ok(entry.clone())
    }
}
