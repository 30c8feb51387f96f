use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generative model request failed: {0}")]
    Provider(String),

    #[error("generative model returned no text")]
    EmptyResponse,
}

pub type GenerationResult<T> = Result<T, GenerationError>;
