//! JSON snapshot persistence for [`InMemoryStore`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::StoreResult;
use super::memory::InMemoryStore;
use super::model::{ChunkRecord, DocumentRecord, QuestionRecord, UserQuestionRecord};

/// Serialized contents of every collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
    #[serde(default)]
    pub chunks: Vec<ChunkRecord>,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
    #[serde(default)]
    pub user_questions: Vec<UserQuestionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationResult {
    Success { bytes: u64 },
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DehydrationResult {
    Success { bytes: u64 },
}

impl InMemoryStore {
    /// Replaces the store contents with the snapshot at `path`, if it exists.
    pub async fn hydrate(&self, path: &Path) -> StoreResult<HydrationResult> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "No snapshot found, starting empty");
                return Ok(HydrationResult::NotFound);
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot: StoreSnapshot = serde_json::from_slice(&bytes)?;
        info!(
            path = %path.display(),
            documents = snapshot.documents.len(),
            chunks = snapshot.chunks.len(),
            questions = snapshot.questions.len(),
            "Hydrated store from snapshot"
        );
        self.restore(snapshot);

        Ok(HydrationResult::Success {
            bytes: bytes.len() as u64,
        })
    }

    /// Writes the store contents to `path`, replacing any previous snapshot.
    pub async fn dehydrate(&self, path: &Path) -> StoreResult<DehydrationResult> {
        let bytes = serde_json::to_vec_pretty(&self.snapshot())?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, path).await?;

        info!(path = %path.display(), bytes = bytes.len(), "Dehydrated store to snapshot");
        Ok(DehydrationResult::Success {
            bytes: bytes.len() as u64,
        })
    }
}
