use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest, ContentPart, MessageContent};
use tracing::{debug, error, instrument};

use super::error::{GenerationError, GenerationResult};
use super::{GenerativeModel, PromptPart};

/// Generative model served through the `genai` multi-provider client.
///
/// Provider credentials come from the environment (`GEMINI_API_KEY` for Gemini models).
/// In mock-provider mode no request is made and a canned answer echoing the question is
/// returned.
#[derive(Clone)]
pub struct GenaiModel {
    client: Client,
    model: String,
    temperature: f64,
    mock_provider: bool,
}

impl std::fmt::Debug for GenaiModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiModel")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("mock_provider", &self.mock_provider)
            .finish()
    }
}

impl GenaiModel {
    pub fn new(model: impl Into<String>, temperature: f64) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
            temperature,
            mock_provider: false,
        }
    }

    pub fn with_mock_provider(mut self, mock_provider: bool) -> Self {
        self.mock_provider = mock_provider;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_mock_provider(&self) -> bool {
        self.mock_provider
    }

    fn to_chat_request(parts: Vec<PromptPart>) -> ChatRequest {
        let mut content = MessageContent::default();
        for part in parts {
            content.push(match part {
                PromptPart::Text(text) => ContentPart::Text(text),
                PromptPart::InlineImage { mime_type, data } => {
                    ContentPart::from_binary_base64(mime_type, data, None)
                }
            });
        }

        ChatRequest::new(vec![ChatMessage::user(content)])
    }
}

fn mock_answer(parts: &[PromptPart]) -> String {
    let header = parts.first().and_then(PromptPart::as_text).unwrap_or_default();
    let question = header
        .strip_prefix("Question: ")
        .and_then(|rest| rest.split("\n\n").next())
        .unwrap_or(header);
    format!("Mock response for: {question}")
}

impl GenerativeModel for GenaiModel {
    #[instrument(skip(self, parts), fields(model = %self.model, parts = parts.len()))]
    async fn generate(&self, parts: Vec<PromptPart>) -> GenerationResult<String> {
        if self.mock_provider {
            return Ok(mock_answer(&parts));
        }

        let request = Self::to_chat_request(parts);
        let options = ChatOptions::default().with_temperature(self.temperature);

        let response = self
            .client
            .exec_chat(&self.model, request, Some(&options))
            .await
            .map_err(|e| {
                error!("Provider error: {}", e);
                GenerationError::Provider(e.to_string())
            })?;

        let text = response
            .first_text()
            .map(str::to_string)
            .filter(|t| !t.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        debug!(answer_len = text.len(), "Answer generated");
        Ok(text)
    }
}
