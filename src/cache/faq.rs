//! Frequently-asked-question views over cached answers.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::question::QuestionCache;
use crate::constants::{FAQ_SCAN_LIMIT, FAQ_STATS_SCAN_LIMIT};
use crate::intent::Intent;
use crate::scoring::ConfidenceInfo;
use crate::store::{DocumentStore, QuestionRecord, SourceDescriptor};

/// Ordering of a FAQ listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaqSort {
    /// Most asked first.
    #[default]
    Popular,
    /// Most recently asked first.
    Recent,
    /// Grouped by intent name.
    Category,
}

impl FaqSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaqSort::Popular => "popular",
            FaqSort::Recent => "recent",
            FaqSort::Category => "category",
        }
    }
}

impl FromStr for FaqSort {
    type Err = std::convert::Infallible;

    /// Unknown values fall back to [`FaqSort::Popular`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "recent" => FaqSort::Recent,
            "category" => FaqSort::Category,
            _ => FaqSort::Popular,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqItem {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub intent: Intent,
    pub count: u64,
    pub confidence: ConfidenceInfo,
    pub sources: Vec<SourceDescriptor>,
    pub created_at: DateTime<Utc>,
    pub last_asked_at: DateTime<Utc>,
}

impl From<QuestionRecord> for FaqItem {
    fn from(record: QuestionRecord) -> Self {
        Self {
            id: record.id,
            question: record.question,
            answer: record.answer,
            intent: record.intent,
            count: record.count,
            confidence: record.confidence,
            sources: record.sources,
            created_at: record.created_at,
            last_asked_at: record.last_asked_at,
        }
    }
}

/// One page of FAQ items. `total` counts matches before the limit was applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FaqPage {
    pub faqs: Vec<FaqItem>,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FaqStats {
    pub total_questions: usize,
    pub total_asks: u64,
    pub by_category: BTreeMap<String, usize>,
    pub most_asked: Option<FaqItem>,
}

impl<S: DocumentStore> QuestionCache<S> {
    /// Lists popular questions, optionally restricted to one intent.
    ///
    /// Only the most-asked records are considered. Store failures yield an empty page.
    pub async fn faq(&self, limit: usize, intent: Option<Intent>, sort: FaqSort) -> FaqPage {
        let mut records = match self.store().most_asked_questions(FAQ_SCAN_LIMIT).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "FAQ fetch failed");
                return FaqPage::default();
            }
        };

        if let Some(intent) = intent {
            records.retain(|r| r.intent == intent);
        }

        match sort {
            FaqSort::Popular => {}
            FaqSort::Recent => records.sort_by(|a, b| b.last_asked_at.cmp(&a.last_asked_at)),
            FaqSort::Category => records.sort_by(|a, b| a.intent.as_str().cmp(b.intent.as_str())),
        }

        let total = records.len();
        records.truncate(limit);

        FaqPage {
            faqs: records.into_iter().map(FaqItem::from).collect(),
            total,
        }
    }

    /// Aggregates ask counts per intent. Store failures yield zeroed stats.
    pub async fn faq_stats(&self) -> FaqStats {
        let records = match self.store().most_asked_questions(FAQ_STATS_SCAN_LIMIT).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "FAQ stats fetch failed");
                return FaqStats::default();
            }
        };

        let mut by_category = BTreeMap::new();
        for record in &records {
            *by_category.entry(record.intent.to_string()).or_insert(0) += 1;
        }

        FaqStats {
            total_questions: records.len(),
            total_asks: records.iter().map(|r| r.count).sum(),
            by_category,
            most_asked: records.into_iter().next().map(FaqItem::from),
        }
    }
}
