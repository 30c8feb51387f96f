//! Question intent detection.
//!
//! Keyword sets are tested in a fixed priority order against the lower-cased question; the
//! first category with any matching phrase wins. Every question maps to exactly one intent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse category of question purpose. Scopes the semantic cache scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Procedure,
    Definition,
    Requirement,
    Deadline,
    General,
}

impl Intent {
    /// Keyword-matched intents in priority order. `General` is the fallback.
    const RULES: [(Intent, &'static [&'static str]); 4] = [
        (
            Intent::Procedure,
            &["how do i", "how to", "procedure", "steps"],
        ),
        (Intent::Definition, &["what is", "define", "what does"]),
        (
            Intent::Requirement,
            &["requirement", "criteria", "eligibility"],
        ),
        (
            Intent::Deadline,
            &["deadline", "when", "last date", "by when", "due date"],
        ),
    ];

    pub const ALL: [Intent; 5] = [
        Intent::Procedure,
        Intent::Definition,
        Intent::Requirement,
        Intent::Deadline,
        Intent::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Procedure => "procedure",
            Intent::Definition => "definition",
            Intent::Requirement => "requirement",
            Intent::Deadline => "deadline",
            Intent::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown intent name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown intent '{0}'")]
pub struct UnknownIntent(pub String);

impl FromStr for Intent {
    type Err = UnknownIntent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .into_iter()
            .find(|intent| intent.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownIntent(s.to_string()))
    }
}

/// Detects the intent of a question.
pub fn detect_intent(question: &str) -> Intent {
    let q = question.to_lowercase();

    Intent::RULES
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|p| q.contains(p)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::General)
}
