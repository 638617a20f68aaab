use crate::config::ProviderConfig;
use crate::error::ExtractionError;
use crate::images_to_text::ImageData;
use crate::providers::{send_json, AiBackend, StructuredRequest};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    image_model: Option<String>,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, String> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or("OPENAI_API_KEY not found in config or environment")?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(OpenAIProvider {
            client: Client::new(),
            api_key,
            base_url,
            model: config.model.clone(),
            image_model: config.image_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Create a provider with simple parameters, pointing at `base_url`
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        OpenAIProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
            image_model: None,
            temperature: 0.2,
            max_tokens: 4000,
        }
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ExtractionError> {
        let request = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body);
        send_json(request, "OpenAI").await
    }
}

/// Collect `output_text` items from a Responses API body
fn responses_output_text(body: &Value) -> Option<String> {
    let items = body["output"].as_array()?;
    let texts: Vec<&str> = items
        .iter()
        .filter(|item| item["type"] == "message")
        .filter_map(|item| item["content"].as_array())
        .flatten()
        .filter(|content| content["type"] == "output_text")
        .filter_map(|content| content["text"].as_str())
        .collect();

    if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n"))
    }
}

#[async_trait]
impl AiBackend for OpenAIProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn generate_structured(
        &self,
        request: StructuredRequest<'_>,
    ) -> Result<String, ExtractionError> {
        let content = match request.image {
            Some(image) => json!([
                { "type": "text", "text": request.prompt },
                { "type": "image_url", "image_url": { "url": image.to_data_url() } }
            ]),
            None => json!(request.prompt),
        };

        let body = self
            .post(
                "/v1/chat/completions",
                json!({
                    "model": self.model,
                    "messages": [{ "role": "user", "content": content }],
                    "temperature": self.temperature,
                    "max_tokens": self.max_tokens,
                    "response_format": {
                        "type": "json_schema",
                        "json_schema": { "name": "recipe", "schema": request.schema }
                    }
                }),
            )
            .await?;

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ExtractionError::parsing("Failed to extract content from response"))
    }

    async fn search_text(&self, prompt: &str) -> Result<String, ExtractionError> {
        let body = self
            .post(
                "/v1/responses",
                json!({
                    "model": self.model,
                    "tools": [{ "type": "web_search" }],
                    "input": prompt
                }),
            )
            .await?;

        responses_output_text(&body)
            .ok_or_else(|| ExtractionError::parsing("Failed to extract text from response"))
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<ImageData>, ExtractionError> {
        let Some(model) = self.image_model.as_deref() else {
            return Ok(None);
        };

        let body = self
            .post(
                "/v1/images/generations",
                json!({
                    "model": model,
                    "prompt": prompt,
                    "size": "1024x1024",
                    "n": 1
                }),
            )
            .await?;

        let Some(data) = body["data"][0]["b64_json"].as_str() else {
            return Ok(None);
        };
        let bytes = STANDARD.decode(data).map_err(|e| {
            ExtractionError::parsing("OpenAI returned undecodable image data").with_cause(e)
        })?;
        Ok(Some(ImageData::new("image/png", bytes)))
    }
}
