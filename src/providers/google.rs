use crate::config::ProviderConfig;
use crate::error::ExtractionError;
use crate::images_to_text::ImageData;
use crate::providers::{send_json, AiBackend, StructuredRequest};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GoogleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    image_model: Option<String>,
    temperature: f32,
    max_tokens: u32,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, String> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or("GOOGLE_API_KEY not found in config or environment")?;

        Ok(GoogleProvider {
            client: Client::new(),
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.clone(),
            image_model: config.image_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }

    async fn generate(&self, model: &str, body: Value) -> Result<Value, ExtractionError> {
        send_json(self.client.post(self.endpoint(model)).json(&body), "Gemini").await
    }
}

/// Concatenate the text parts of the first candidate
fn candidate_text(body: &Value) -> Option<String> {
    let parts = body["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect::<Vec<_>>()
        .join("");
    Some(text)
}

#[async_trait]
impl AiBackend for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn generate_structured(
        &self,
        request: StructuredRequest<'_>,
    ) -> Result<String, ExtractionError> {
        let mut parts = vec![json!({ "text": request.prompt })];
        if let Some(image) = request.image {
            parts.push(json!({
                "inline_data": {
                    "mime_type": image.mime_type,
                    "data": image.to_base64()
                }
            }));
        }

        let body = self
            .generate(
                &self.model,
                json!({
                    "contents": [{ "parts": parts }],
                    "generationConfig": {
                        "temperature": self.temperature,
                        "maxOutputTokens": self.max_tokens,
                        "responseMimeType": "application/json",
                        "responseJsonSchema": request.schema
                    }
                }),
            )
            .await?;

        candidate_text(&body)
            .ok_or_else(|| ExtractionError::parsing("Failed to extract content from Gemini response"))
    }

    async fn search_text(&self, prompt: &str) -> Result<String, ExtractionError> {
        let body = self
            .generate(
                &self.model,
                json!({
                    "contents": [{ "parts": [{ "text": prompt }] }],
                    "tools": [{ "google_search": {} }],
                    "generationConfig": {
                        "temperature": self.temperature,
                        "maxOutputTokens": self.max_tokens
                    }
                }),
            )
            .await?;

        candidate_text(&body)
            .ok_or_else(|| ExtractionError::parsing("Failed to extract content from Gemini response"))
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<ImageData>, ExtractionError> {
        let Some(model) = self.image_model.as_deref() else {
            return Ok(None);
        };

        let body = self
            .generate(
                model,
                json!({
                    "contents": [{ "parts": [{ "text": prompt }] }],
                    "generationConfig": { "responseModalities": ["IMAGE"] }
                }),
            )
            .await?;

        let parts = body["candidates"][0]["content"]["parts"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        for part in parts {
            let inline = &part["inlineData"];
            if let Some(data) = inline["data"].as_str() {
                let bytes = STANDARD.decode(data).map_err(|e| {
                    ExtractionError::parsing("Gemini returned undecodable image data").with_cause(e)
                })?;
                let mime_type = inline["mimeType"].as_str().unwrap_or("image/png");
                return Ok(Some(ImageData::new(mime_type, bytes)));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use mockito::{Matcher, Server};

    fn test_config(base_url: &str) -> ProviderConfig {
        ProviderConfig {
            base_url: Some(base_url.to_string()),
            api_key: Some("test-key".to_string()),
            ..ProviderConfig::for_provider("google")
        }
    }

    #[tokio::test]
    async fn test_provider_name() {
        let provider = GoogleProvider::new(&test_config(DEFAULT_BASE_URL)).unwrap();
        assert_eq!(provider.provider_name(), "google");
    }

    #[tokio::test]
    async fn test_generate_structured() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates":[{"content":{"parts":[{"text":"{\"title\":"},{"text":"\"Soup\"}"}]}}]}"#,
            )
            .create_async()
            .await;

        let provider = GoogleProvider::new(&test_config(&server.url())).unwrap();
        let schema = json!({"type": "object"});
        let text = provider
            .generate_structured(StructuredRequest::text("make soup", &schema))
            .await
            .unwrap();

        assert_eq!(text, r#"{"title":"Soup"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_uses_google_search_tool() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(json!({ "tools": [{ "google_search": {} }] })))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"ERROR"}]}}]}"#)
            .create_async()
            .await;

        let provider = GoogleProvider::new(&test_config(&server.url())).unwrap();
        let text = provider.search_text("find it").await.unwrap();

        assert_eq!(text, "ERROR");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_api_limit() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", Matcher::Any)
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(r#"{"error":{"status":"RESOURCE_EXHAUSTED"}}"#)
            .create_async()
            .await;

        let provider = GoogleProvider::new(&test_config(&server.url())).unwrap();
        let err = provider.search_text("find it").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ApiLimit);
        assert_eq!(err.http_status, Some(429));
    }

    #[tokio::test]
    async fn test_generate_image_decodes_inline_data() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash-image:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"candidates":[{"content":{"parts":[{"text":"Here you go"},{"inlineData":{"mimeType":"image/png","data":"iVBORw0K"}}]}}]}"#,
            )
            .create_async()
            .await;

        let provider = GoogleProvider::new(&test_config(&server.url())).unwrap();
        let image = provider.generate_image("soup").await.unwrap().unwrap();

        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes, vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A]);
    }

    #[tokio::test]
    async fn test_generate_image_without_model_is_none() {
        let mut config = test_config(DEFAULT_BASE_URL);
        config.image_model = None;
        let provider = GoogleProvider::new(&config).unwrap();

        assert!(provider.generate_image("soup").await.unwrap().is_none());
    }
}
