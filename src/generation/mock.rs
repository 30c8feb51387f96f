use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::error::{GenerationError, GenerationResult};
use super::{GenerativeModel, PromptPart};

/// Generative model returning a canned answer. Clones share state.
#[derive(Debug, Clone)]
pub struct MockModel {
    inner: Arc<MockInner>,
}

#[derive(Debug)]
struct MockInner {
    answer: Mutex<String>,
    calls: AtomicUsize,
    fail: AtomicBool,
    last_prompt: Mutex<Option<Vec<PromptPart>>>,
}

impl MockModel {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(MockInner {
                answer: Mutex::new(answer.into()),
                calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
                last_prompt: Mutex::new(None),
            }),
        }
    }

    pub fn set_answer(&self, answer: impl Into<String>) {
        *self.inner.answer.lock() = answer.into();
    }

    pub fn set_failing(&self, fail: bool) {
        self.inner.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<Vec<PromptPart>> {
        self.inner.last_prompt.lock().clone()
    }
}

impl GenerativeModel for MockModel {
    async fn generate(&self, parts: Vec<PromptPart>) -> GenerationResult<String> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        *self.inner.last_prompt.lock() = Some(parts);

        if self.inner.fail.load(Ordering::SeqCst) {
            return Err(GenerationError::Provider("mock model failure".to_string()));
        }
        Ok(self.inner.answer.lock().clone())
    }
}
