//! Persisted record shapes.
//!
//! Field names serialize in camelCase to match the document database layout
//! (`createdAt`, `lastAskedAt`, `documentId`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::deadline::DeadlineInfo;
use crate::entities::Entities;
use crate::intent::Intent;
use crate::scoring::ConfidenceInfo;

pub const QUESTIONS_COLLECTION: &str = "questions";
pub const CHUNKS_COLLECTION: &str = "chunks";
pub const DOCUMENTS_COLLECTION: &str = "documents";
pub const USER_QUESTIONS_COLLECTION: &str = "user_questions";

/// Kind of ingested content a chunk carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    #[default]
    Text,
    Image,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    #[serde(default)]
    pub page_number: Option<u32>,
    #[serde(default)]
    pub image_id: Option<String>,
    /// Base64 PNG bytes for image chunks, when ingestion kept them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

/// One unit of ingested document content. Read-only from the core's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkRecord {
    pub id: String,
    pub document_id: String,
    pub index: u32,
    /// Text content; a placeholder label for image chunks.
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: ChunkKind,
    /// Chunks without an embedding are skipped by retrieval.
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    #[serde(default)]
    pub metadata: ChunkMetadata,
}

impl ChunkRecord {
    /// Returns the embedding when present and non-empty.
    pub fn usable_embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref().filter(|e| !e.is_empty())
    }
}

/// Metadata of an uploaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub file_url: Option<String>,
}

/// Source shown alongside an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    pub page: Option<u32>,
    #[serde(rename = "type")]
    pub kind: ChunkKind,
    pub document_id: String,
    pub document_name: String,
    pub file_url: Option<String>,
    /// Content preview, truncated with `...`.
    pub content: String,
    #[serde(default)]
    pub similarity: Option<f32>,
}

/// Question/answer payload written on a cache miss. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDraft {
    pub question: String,
    pub fingerprint: String,
    pub entities: Entities,
    pub embedding: Vec<f32>,
    pub answer: String,
    pub intent: Intent,
    pub confidence: ConfidenceInfo,
    pub sources: Vec<SourceDescriptor>,
    pub deadline: Option<DeadlineInfo>,
    pub count: u64,
}

/// Persisted cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: String,
    pub question: String,
    pub fingerprint: String,
    #[serde(default)]
    pub entities: Entities,
    /// Records without an embedding are skipped by the semantic scan.
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    pub answer: String,
    pub intent: Intent,
    #[serde(default)]
    pub confidence: ConfidenceInfo,
    #[serde(default)]
    pub sources: Vec<SourceDescriptor>,
    #[serde(default)]
    pub deadline: Option<DeadlineInfo>,
    pub count: u64,
    pub created_at: DateTime<Utc>,
    pub last_asked_at: DateTime<Utc>,
}

impl QuestionRecord {
    /// Materializes a draft with store-assigned id and timestamp.
    pub fn from_draft(id: String, draft: QuestionDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            question: draft.question,
            fingerprint: draft.fingerprint,
            entities: draft.entities,
            embedding: Some(draft.embedding),
            answer: draft.answer,
            intent: draft.intent,
            confidence: draft.confidence,
            sources: draft.sources,
            deadline: draft.deadline,
            count: draft.count.max(1),
            created_at: now,
            last_asked_at: now,
        }
    }

    pub fn usable_embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref().filter(|e| !e.is_empty())
    }

    pub fn has_visual_sources(&self) -> bool {
        self.sources.iter().any(|s| s.kind == ChunkKind::Image)
    }
}

/// History entry written each time a user asks a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuestionDraft {
    pub user_id: String,
    pub question_id: String,
    pub question_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuestionRecord {
    pub id: String,
    pub user_id: String,
    pub question_id: String,
    pub question_text: String,
    pub asked_at: DateTime<Utc>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub personal_note: Option<String>,
}

/// Field updates applicable to a history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserQuestionUpdate {
    Favorite(bool),
    /// Flips the current flag in a single write.
    ToggleFavorite,
    Note(Option<String>),
}
