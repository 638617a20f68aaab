mod factory;
mod fallback;
mod google;
mod open_ai;
pub mod prompt;

pub use factory::ProviderFactory;
pub use fallback::FallbackProvider;
pub use google::GoogleProvider;
pub use open_ai::OpenAIProvider;

use crate::error::ExtractionError;
use crate::images_to_text::ImageData;
use async_trait::async_trait;
use serde_json::Value;

/// A structured-generation call: prompt, optional photo, and the JSON schema
/// the answer must follow
#[derive(Debug, Clone, Copy)]
pub struct StructuredRequest<'a> {
    pub prompt: &'a str,
    pub schema: &'a Value,
    pub image: Option<&'a ImageData>,
}

impl<'a> StructuredRequest<'a> {
    pub fn text(prompt: &'a str, schema: &'a Value) -> Self {
        Self {
            prompt,
            schema,
            image: None,
        }
    }

    pub fn with_image(prompt: &'a str, schema: &'a Value, image: &'a ImageData) -> Self {
        Self {
            prompt,
            schema,
            image: Some(image),
        }
    }
}

/// The generative-AI capabilities the pipeline relies on.
///
/// One instance is created during process setup and shared by every pipeline
/// component; nothing in the pipeline constructs a backend on its own.
#[async_trait]
pub trait AiBackend: Send + Sync {
    /// Get the provider name (e.g., "google", "openai")
    fn provider_name(&self) -> &str;

    /// Return the raw model output for a request that asks for JSON matching
    /// `request.schema`. Parsing is left to the caller.
    async fn generate_structured(
        &self,
        request: StructuredRequest<'_>,
    ) -> Result<String, ExtractionError>;

    /// Free-text answer from a model that may search or browse the web
    async fn search_text(&self, prompt: &str) -> Result<String, ExtractionError>;

    /// Generate a photo for `prompt`. `Ok(None)` means the backend produced
    /// no image.
    async fn generate_image(&self, prompt: &str) -> Result<Option<ImageData>, ExtractionError>;
}

/// Send a prepared request and decode the JSON body, classifying failures
pub(crate) async fn send_json(
    request: reqwest::RequestBuilder,
    provider: &str,
) -> Result<Value, ExtractionError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        log::debug!("{} error body: {}", provider, body);
        return Err(ExtractionError::from_status(
            status.as_u16(),
            &format!("{provider} request failed"),
        ));
    }
    let body: Value = response.json().await?;
    log::debug!("{:?}", body);
    Ok(body)
}
