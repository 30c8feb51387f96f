//! Per-user question history.
//!
//! Every answered question is logged against the asking user. Entries can be starred as
//! favorites and annotated with a personal note; only the owning user may change them.

mod error;


pub use error::{HistoryError, HistoryResult};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::store::{DocumentStore, UserQuestionDraft, UserQuestionRecord, UserQuestionUpdate};

/// Shown in place of an answer whose question record no longer exists.
pub const MISSING_ANSWER: &str = "Answer not found";

/// A history entry joined with the answer it refers to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub question_id: String,
    pub question_text: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
    pub favorite: bool,
    pub personal_note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HistoryRepository<S> {
    store: S,
}

impl<S: DocumentStore> HistoryRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Logs that `user_id` asked `question_text`, answered by record `question_id`.
    ///
    /// Best-effort: returns `None` if the write failed.
    pub async fn store_user_question(
        &self,
        user_id: &str,
        question_id: &str,
        question_text: &str,
    ) -> Option<String> {
        let draft = UserQuestionDraft {
            user_id: user_id.to_string(),
            question_id: question_id.to_string(),
            question_text: question_text.to_string(),
        };
        match self.store.add_user_question(draft).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(user_id, error = %e, "Failed to record user question");
                None
            }
        }
    }

    /// Returns the user's most recent entries, newest first.
    ///
    /// Store failures yield an empty history.
    #[instrument(skip(self))]
    pub async fn user_history(
        &self,
        user_id: &str,
        limit: usize,
        favorites_only: bool,
    ) -> Vec<HistoryItem> {
        let entries = match self.store.user_questions(user_id).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "History fetch failed");
                return Vec::new();
            }
        };

        let selected: Vec<UserQuestionRecord> = entries
            .into_iter()
            .filter(|e| !favorites_only || e.favorite)
            .take(limit)
            .collect();

        let mut items = Vec::with_capacity(selected.len());
        for entry in selected {
            let answer = match self.store.get_question(&entry.question_id).await {
                Ok(Some(record)) => record.answer,
                Ok(None) => MISSING_ANSWER.to_string(),
                Err(e) => {
                    debug!(question_id = %entry.question_id, error = %e, "Answer lookup failed");
                    MISSING_ANSWER.to_string()
                }
            };
            items.push(HistoryItem {
                id: entry.id,
                question_id: entry.question_id,
                question_text: entry.question_text,
                answer,
                asked_at: entry.asked_at,
                favorite: entry.favorite,
                personal_note: entry.personal_note,
            });
        }
        items
    }

    /// Flips the favorite flag and returns the new value.
    pub async fn toggle_favorite(&self, user_id: &str, history_id: &str) -> HistoryResult<bool> {
        self.owned_entry(user_id, history_id).await?;
        let updated = self
            .store
            .update_user_question(history_id, UserQuestionUpdate::ToggleFavorite)
            .await?;
        Ok(updated.favorite)
    }

    /// Sets the personal note. A blank note clears it.
    pub async fn set_note(&self, user_id: &str, history_id: &str, note: &str) -> HistoryResult<()> {
        self.owned_entry(user_id, history_id).await?;
        let note = Some(note.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        self.store
            .update_user_question(history_id, UserQuestionUpdate::Note(note))
            .await?;
        Ok(())
    }

    async fn owned_entry(&self, user_id: &str, history_id: &str) -> HistoryResult<UserQuestionRecord> {
        let entry = self
            .store
            .get_user_question(history_id)
            .await?
            .ok_or_else(|| HistoryError::NotFound {
                id: history_id.to_string(),
            })?;
        if entry.user_id != user_id {
            return Err(HistoryError::Forbidden {
                id: history_id.to_string(),
            });
        }
        Ok(entry)
    }
}
