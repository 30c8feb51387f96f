//! Document store abstraction.
//!
//! The store holds four collections: uploaded document metadata, ingested chunks, cached
//! question/answer records, and per-user question history. [`DocumentStore`] is the seam the
//! cache, retriever and history layers are generic over; [`InMemoryStore`] is the bundled
//! backend, optionally persisted to a JSON snapshot.
//!
//! Every operation reports [`StoreError::Unavailable`] when the backend is unreachable.
//! Callers decide whether that is fatal (history mutations) or degrades to a miss
//! (cache lookups, retrieval).

pub mod error;
pub mod memory;
pub mod model;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use model::{
    ChunkKind, ChunkMetadata, ChunkRecord, DocumentRecord, QuestionDraft, QuestionRecord,
    SourceDescriptor, UserQuestionDraft, UserQuestionRecord, UserQuestionUpdate,
};
pub use snapshot::{DehydrationResult, HydrationResult, StoreSnapshot};

use std::future::Future;

use crate::intent::Intent;

/// Document database operations used by the question-answering core.
pub trait DocumentStore: Send + Sync {
    /// Returns `true` if the backend is reachable.
    fn is_available(&self) -> impl Future<Output = bool> + Send;

    /// Returns the first question record with this fingerprint, if any.
    fn find_question_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> impl Future<Output = StoreResult<Option<QuestionRecord>>> + Send;

    /// Returns every question record with the given intent, in insertion order.
    fn questions_by_intent(
        &self,
        intent: Intent,
    ) -> impl Future<Output = StoreResult<Vec<QuestionRecord>>> + Send;

    /// Returns up to `limit` question records ordered by count, highest first.
    fn most_asked_questions(
        &self,
        limit: usize,
    ) -> impl Future<Output = StoreResult<Vec<QuestionRecord>>> + Send;

    fn get_question(
        &self,
        id: &str,
    ) -> impl Future<Output = StoreResult<Option<QuestionRecord>>> + Send;

    /// Inserts a new record. The store assigns the id and both timestamps.
    fn add_question(&self, draft: QuestionDraft)
    -> impl Future<Output = StoreResult<String>> + Send;

    /// Atomically adds one to the record's count and refreshes `last_asked_at`.
    fn increment_question_count(&self, id: &str) -> impl Future<Output = StoreResult<()>> + Send;

    /// Returns chunks, restricted to `document_ids` when given.
    fn chunks(
        &self,
        document_ids: Option<&[String]>,
    ) -> impl Future<Output = StoreResult<Vec<ChunkRecord>>> + Send;

    /// Counts chunks, stopping at `limit`.
    fn count_chunks(&self, limit: usize) -> impl Future<Output = StoreResult<usize>> + Send;

    fn get_document(
        &self,
        id: &str,
    ) -> impl Future<Output = StoreResult<Option<DocumentRecord>>> + Send;

    fn add_user_question(
        &self,
        draft: UserQuestionDraft,
    ) -> impl Future<Output = StoreResult<String>> + Send;

    /// Returns the user's history entries, newest first.
    fn user_questions(
        &self,
        user_id: &str,
    ) -> impl Future<Output = StoreResult<Vec<UserQuestionRecord>>> + Send;

    fn get_user_question(
        &self,
        id: &str,
    ) -> impl Future<Output = StoreResult<Option<UserQuestionRecord>>> + Send;

    /// Applies `update` and returns the updated entry.
    fn update_user_question(
        &self,
        id: &str,
        update: UserQuestionUpdate,
    ) -> impl Future<Output = StoreResult<UserQuestionRecord>> + Send;
}
