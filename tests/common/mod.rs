#![allow(dead_code)]

use async_trait::async_trait;
use recipe_extract::{
    AiBackend, ExtractionError, ImageData, PipelineConfig, RecipeImporter, StructuredRequest,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-process backend that replays queued answers and records every call
#[derive(Default)]
pub struct FakeBackend {
    structured: Mutex<VecDeque<Result<String, ExtractionError>>>,
    search: Mutex<VecDeque<Result<String, ExtractionError>>>,
    images: Mutex<VecDeque<Result<Option<ImageData>, ExtractionError>>>,
    structured_delay: Option<Duration>,
    pub calls: Mutex<Vec<Call>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Structured { prompt: String, with_image: bool },
    Search(String),
    Image(String),
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every structured call sleeps this long before answering
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            structured_delay: Some(delay),
            ..Default::default()
        })
    }

    pub fn answer_structured(&self, answer: Result<String, ExtractionError>) {
        self.structured.lock().unwrap().push_back(answer);
    }

    pub fn answer_search(&self, answer: Result<String, ExtractionError>) {
        self.search.lock().unwrap().push_back(answer);
    }

    pub fn answer_image(&self, answer: Result<Option<ImageData>, ExtractionError>) {
        self.images.lock().unwrap().push_back(answer);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn structured_prompts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Structured { prompt, .. } => Some(prompt),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, kind: fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| kind(c)).count()
    }
}

pub fn is_structured(call: &Call) -> bool {
    matches!(call, Call::Structured { .. })
}

pub fn is_search(call: &Call) -> bool {
    matches!(call, Call::Search(_))
}

pub fn is_image(call: &Call) -> bool {
    matches!(call, Call::Image(_))
}

#[async_trait]
impl AiBackend for FakeBackend {
    fn provider_name(&self) -> &str {
        "fake"
    }

    async fn generate_structured(
        &self,
        request: StructuredRequest<'_>,
    ) -> Result<String, ExtractionError> {
        self.calls.lock().unwrap().push(Call::Structured {
            prompt: request.prompt.to_string(),
            with_image: request.image.is_some(),
        });
        if let Some(delay) = self.structured_delay {
            tokio::time::sleep(delay).await;
        }
        let answer = self.structured.lock().unwrap().pop_front();
        answer.unwrap_or_else(|| Err(ExtractionError::network("no structured answer queued")))
    }

    async fn search_text(&self, prompt: &str) -> Result<String, ExtractionError> {
        self.calls.lock().unwrap().push(Call::Search(prompt.to_string()));
        let answer = self.search.lock().unwrap().pop_front();
        answer.unwrap_or_else(|| Err(ExtractionError::network("no search answer queued")))
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<ImageData>, ExtractionError> {
        self.calls.lock().unwrap().push(Call::Image(prompt.to_string()));
        let answer = self.images.lock().unwrap().pop_front();
        answer.unwrap_or(Ok(None))
    }
}

/// Defaults with millisecond backoff so retrying tests stay fast
pub fn fast_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.retry.network.initial_delay_ms = 1;
    config.retry.ai_generation.initial_delay_ms = 1;
    config
}

pub fn importer(backend: &Arc<FakeBackend>) -> RecipeImporter {
    importer_with(backend, fast_config())
}

pub fn importer_with(backend: &Arc<FakeBackend>, config: PipelineConfig) -> RecipeImporter {
    RecipeImporter::builder()
        .config(config)
        .backend(backend.clone())
        .build()
        .unwrap()
}

pub fn recipe_html(json_ld: &str) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Recipe Page</title>
            <script type="application/ld+json">
                {json_ld}
            </script>
        </head>
        <body>
            <h1>Recipe</h1>
        </body>
        </html>
        "#
    )
}

/// A structured answer the normalizer will accept
pub fn pancake_json() -> String {
    serde_json::json!({
        "title": "Pancakes",
        "description": "Fluffy breakfast pancakes",
        "servings": 2,
        "ingredients": [
            {"name": "flour", "quantity": "1 cup"},
            {"name": "egg", "quantity": "1"},
            {"name": "milk", "quantity": "1 cup"}
        ],
        "instructions": ["Whisk everything together.", "Fry in a hot pan."]
    })
    .to_string()
}

pub fn png() -> ImageData {
    ImageData::new("image/png", vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
}
