//! Question cache.
//!
//! - [`QuestionCache`] answers "has this been asked before?" via exact fingerprint match or
//!   entity-gated semantic similarity, and writes fresh answers back.
//! - [`faq`] derives popular-question listings and statistics from the same records.

pub mod faq;
pub mod question;
pub mod types;

#[cfg(test)]
mod tests;

pub use faq::{FaqItem, FaqPage, FaqSort, FaqStats};
pub use question::QuestionCache;
pub use types::{CACHE_STATUS_HEADER, CacheLookup, CacheStatus, CachedAnswer, NewCachedAnswer};
