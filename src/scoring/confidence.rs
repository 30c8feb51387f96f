use serde::{Deserialize, Serialize};

use crate::store::SourceDescriptor;

/// Bucketed confidence level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Buckets a 0-100 score: `>= 70` High, `>= 50` Medium, else Low.
    pub fn from_score(score: u8) -> Self {
        match score {
            70.. => ConfidenceLevel::High,
            50..=69 => ConfidenceLevel::Medium,
            _ => ConfidenceLevel::Low,
        }
    }
}

/// How well an answer is supported by its sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceInfo {
    pub level: ConfidenceLevel,
    pub score: u8,
    pub reasoning: String,
}

impl ConfidenceInfo {
    pub fn new(level: ConfidenceLevel, score: u8, reasoning: impl Into<String>) -> Self {
        Self {
            level,
            score: score.min(100),
            reasoning: reasoning.into(),
        }
    }

    /// Placeholder stored when a caller provides no confidence data.
    pub fn missing() -> Self {
        Self::new(ConfidenceLevel::Low, 0, "No confidence data")
    }

    /// Re-derives a consistent record: clamps the score and fills an empty reasoning.
    pub fn normalized(self) -> Self {
        let score = self.score.min(100);
        let reasoning = if self.reasoning.trim().is_empty() {
            "No confidence data".to_string()
        } else {
            self.reasoning
        };
        Self {
            level: self.level,
            score,
            reasoning,
        }
    }
}

impl Default for ConfidenceInfo {
    fn default() -> Self {
        Self::missing()
    }
}

/// Absorbs f32 representation error before truncating, so `0.8` averages to 80, not 79.
const SCORE_EPSILON: f64 = 1e-4;

/// Sources-only fallback when none carries a similarity value.
const PER_SOURCE_SCORE: usize = 20;
const COUNT_SCORE_CAP: usize = 60;

/// Scores an answer from the similarities of the sources it was generated from.
pub fn calculate_confidence(sources: &[SourceDescriptor]) -> ConfidenceInfo {
    if sources.is_empty() {
        return ConfidenceInfo::new(ConfidenceLevel::Low, 0, "No relevant sources found");
    }

    let similarities: Vec<f64> = sources
        .iter()
        .filter_map(|s| s.similarity)
        .map(f64::from)
        .collect();

    let score = if similarities.is_empty() {
        COUNT_SCORE_CAP.min(sources.len() * PER_SOURCE_SCORE) as u8
    } else {
        let avg = similarities.iter().sum::<f64>() / similarities.len() as f64;
        (avg * 100.0 + SCORE_EPSILON).floor().clamp(0.0, 100.0) as u8
    };

    ConfidenceInfo::new(
        ConfidenceLevel::from_score(score),
        score,
        format!(
            "Found {} relevant sources with average confidence {}%",
            sources.len(),
            score
        ),
    )
}
