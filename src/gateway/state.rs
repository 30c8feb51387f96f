use std::sync::Arc;

use crate::embedding::EmbeddingProvider;
use crate::generation::GenerativeModel;
use crate::query::QueryEngine;
use crate::store::DocumentStore;

/// Shared state handed to every route.
pub struct HandlerState<S, E, M> {
    pub engine: Arc<QueryEngine<S, E, M>>,
}

impl<S, E, M> Clone for HandlerState<S, E, M> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<S, E, M> HandlerState<S, E, M>
where
    S: DocumentStore + Clone + 'static,
    E: EmbeddingProvider + 'static,
    M: GenerativeModel + 'static,
{
    pub fn new(engine: QueryEngine<S, E, M>) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}
