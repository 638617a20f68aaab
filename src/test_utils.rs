use crate::error::ExtractionError;
use crate::images_to_text::ImageData;
use crate::providers::{AiBackend, StructuredRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type Scripted<T> = Mutex<VecDeque<Result<T, ExtractionError>>>;

/// Backend that replays queued answers and counts calls
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    structured: Scripted<String>,
    search: Scripted<String>,
    images: Scripted<Option<ImageData>>,
    structured_delay: Option<Duration>,
    structured_calls: AtomicUsize,
    search_calls: AtomicUsize,
    image_calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_structured_delay(mut self, delay: Duration) -> Self {
        self.structured_delay = Some(delay);
        self
    }

    pub fn push_structured(&self, answer: Result<String, ExtractionError>) {
        self.structured.lock().unwrap().push_back(answer);
    }

    pub fn push_search(&self, answer: Result<String, ExtractionError>) {
        self.search.lock().unwrap().push_back(answer);
    }

    pub fn push_image(&self, answer: Result<Option<ImageData>, ExtractionError>) {
        self.images.lock().unwrap().push_back(answer);
    }

    pub fn structured_calls(&self) -> usize {
        self.structured_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    fn next<T>(queue: &Scripted<T>) -> Result<T, ExtractionError> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ExtractionError::network("no scripted answer left")))
    }
}

#[async_trait]
impl AiBackend for ScriptedBackend {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn generate_structured(
        &self,
        request: StructuredRequest<'_>,
    ) -> Result<String, ExtractionError> {
        self.structured_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.to_string());
        if let Some(delay) = self.structured_delay {
            tokio::time::sleep(delay).await;
        }
        Self::next(&self.structured)
    }

    async fn search_text(&self, prompt: &str) -> Result<String, ExtractionError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        Self::next(&self.search)
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<ImageData>, ExtractionError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        Self::next(&self.images)
    }
}
