use serde::{Deserialize, Serialize};

use crate::cache::CacheStatus;
use crate::deadline::DeadlineInfo;
use crate::scoring::ConfidenceInfo;
use crate::store::SourceDescriptor;

pub const ANONYMOUS_USER: &str = "anonymous";

fn anonymous() -> String {
    ANONYMOUS_USER.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub question: String,
    /// Restricts retrieval to these documents. `None` or empty searches everything.
    #[serde(default)]
    pub document_ids: Option<Vec<String>>,
    #[serde(default = "anonymous")]
    pub user_id: String,
}

impl QueryRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            document_ids: None,
            user_id: anonymous(),
        }
    }

    pub fn with_documents(mut self, document_ids: Vec<String>) -> Self {
        self.document_ids = Some(document_ids);
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<SourceDescriptor>,
    pub has_visual_content: bool,
    pub cached: bool,
    /// Cache match score; absent for fresh answers.
    pub similarity: Option<f32>,
    pub deadline: Option<DeadlineInfo>,
    pub confidence: Option<ConfidenceInfo>,
    /// Reported as a response header, not in the body.
    #[serde(skip)]
    pub status: CacheStatus,
}

/// Service health summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub chunks_stored: usize,
    pub model: &'static str,
    pub store_connected: bool,
}
