//! Answer generation.
//!
//! A prompt is an ordered list of [`PromptPart`]s interleaving text and inline images.
//! [`build_multimodal_prompt`] assembles one from the question and its retrieved chunks;
//! a [`GenerativeModel`] turns it into answer text.

/// `genai`-backed model.
pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod prompt;

pub use error::{GenerationError, GenerationResult};
pub use client::GenaiModel;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockModel;
pub use prompt::{PNG_MIME_TYPE, build_multimodal_prompt};

use std::future::Future;

/// One element of a multimodal prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPart {
    Text(String),
    /// Base64-encoded image bytes.
    InlineImage { mime_type: String, data: String },
}

impl PromptPart {
    pub fn text(text: impl Into<String>) -> Self {
        PromptPart::Text(text.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PromptPart::Text(t) => Some(t),
            PromptPart::InlineImage { .. } => None,
        }
    }
}

/// Multimodal prompt to answer text.
pub trait GenerativeModel: Send + Sync {
    fn generate(
        &self,
        parts: Vec<PromptPart>,
    ) -> impl Future<Output = GenerationResult<String>> + Send;
}
