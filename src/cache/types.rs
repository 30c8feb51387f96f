use crate::deadline::DeadlineInfo;
use crate::intent::Intent;
use crate::scoring::ConfidenceInfo;
use crate::store::{QuestionRecord, SourceDescriptor};

pub const CACHE_STATUS_HEADER: &str = "X-Campus-Cache";

/// How an answer was produced, reported in [`CACHE_STATUS_HEADER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheStatus {
    HitExact,
    HitSemantic,
    Miss,
}

impl CacheStatus {
    #[inline]
    pub fn as_header_value(&self) -> &'static str {
        match self {
            CacheStatus::HitExact => "HIT_EXACT",
            CacheStatus::HitSemantic => "HIT_SEMANTIC",
            CacheStatus::Miss => "MISS",
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        !matches!(self, CacheStatus::Miss)
    }
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_header_value())
    }
}

/// A reusable prior answer.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedAnswer {
    pub record: QuestionRecord,
    /// `1.0` for fingerprint matches, the cosine score for semantic matches.
    pub similarity: f32,
    pub status: CacheStatus,
}

impl CachedAnswer {
    pub fn id(&self) -> &str {
        &self.record.id
    }
}

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Hit(CachedAnswer),
    Miss,
    /// The store could not be queried; treat as a miss.
    StoreUnavailable(String),
}

impl CacheLookup {
    pub fn status(&self) -> CacheStatus {
        match self {
            CacheLookup::Hit(answer) => answer.status,
            CacheLookup::Miss | CacheLookup::StoreUnavailable(_) => CacheStatus::Miss,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    pub fn into_hit(self) -> Option<CachedAnswer> {
        match self {
            CacheLookup::Hit(answer) => Some(answer),
            _ => None,
        }
    }
}

/// A freshly generated answer to be written back to the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCachedAnswer {
    pub question: String,
    pub embedding: Vec<f32>,
    pub answer: String,
    pub intent: Intent,
    /// `None` stores the "no confidence data" placeholder.
    pub confidence: Option<ConfidenceInfo>,
    pub sources: Vec<SourceDescriptor>,
    pub deadline: Option<DeadlineInfo>,
}
