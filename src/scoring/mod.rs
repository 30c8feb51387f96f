//! Similarity and confidence scoring.
//!
//! [`cosine_similarity`] is the single similarity primitive shared by the question cache and
//! the chunk retriever, so a threshold means the same thing in both places.
//! [`calculate_confidence`] summarizes how well an answer is supported by its sources.

pub mod confidence;
pub mod similarity;


pub use confidence::{ConfidenceInfo, ConfidenceLevel, calculate_confidence};
pub use similarity::cosine_similarity;
